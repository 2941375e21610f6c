use std::sync::Arc;

use crate::{
    dsp::wavetable::{TablePhase, Wavetable},
    graph::node::{GraphNode, RenderCtx},
};

/// Plays a shared [`Wavetable`] at the context frequency.
///
/// The table is swapped per note by the voice that owns the node; an empty
/// node renders silence.
#[derive(Default)]
pub struct WavetableNode {
    table: Option<Arc<Wavetable>>,
    phase: TablePhase,
}

impl WavetableNode {
    pub fn new(table: Arc<Wavetable>) -> Self {
        Self {
            table: Some(table),
            phase: TablePhase::default(),
        }
    }

    pub fn set_table(&mut self, table: Arc<Wavetable>) {
        self.table = Some(table);
    }

    pub fn clear(&mut self) {
        self.table = None;
        self.phase.reset();
    }
}

impl GraphNode for WavetableNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        let Some(table) = self.table.as_deref() else {
            out.fill(0.0);
            return;
        };

        for sample in out.iter_mut() {
            *sample = self.phase.next(table, ctx.frequency, ctx.sample_rate);
        }
    }

    fn note_on(&mut self, _ctx: &RenderCtx) {
        self.phase.reset();
    }
}
