//! The shared output chain every voice plays into.
//!
//! ```text
//! voices ──→ lowpass ──→ highpass ──→ compressor ──→ reverb ──→ device
//! ```
//!
//! The lowpass is the only entry point; stages are fixed for the lifetime of
//! the engine.

use crate::{
    config::ChainConfig,
    error::Result,
    graph::{
        compressor::CompressorNode,
        extensions::NodeExt,
        filter::FilterNode,
        node::{GraphNode, RenderCtx},
        reverb::ReverbNode,
        through::Through,
    },
};

type Chain = Through<Through<Through<FilterNode, FilterNode>, CompressorNode>, ReverbNode>;

pub struct OutputGraph {
    chain: Chain,
}

impl OutputGraph {
    pub const STAGES: [&'static str; 4] = ["lowpass", "highpass", "compressor", "reverb"];

    pub fn from_config(config: &ChainConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: &ChainConfig) -> Self {
        let reverb = &config.reverb;
        let chain = FilterNode::lowpass(config.lowpass.cutoff_hz)
            .with_q(config.lowpass.q)
            .through(FilterNode::highpass(config.highpass.cutoff_hz).with_q(config.highpass.q))
            .through(CompressorNode::new(config.compressor))
            .through(ReverbNode::new(reverb.room_size, reverb.damping, reverb.mix));

        Self { chain }
    }

    /// Stage names in signal order.
    pub fn stages(&self) -> &'static [&'static str] {
        &Self::STAGES
    }

    /// Run `buffer` through every stage in place.
    pub fn process(&mut self, buffer: &mut [f32], ctx: &RenderCtx) {
        self.chain.render_block(buffer, ctx);
    }

    /// The first stage, where voice output enters.
    pub fn entry(&self) -> &FilterNode {
        self.chain.source().source().source()
    }

    pub fn highpass(&self) -> &FilterNode {
        self.chain.source().source().effect()
    }

    pub fn compressor(&self) -> &CompressorNode {
        self.chain.source().effect()
    }

    pub fn reverb(&self) -> &ReverbNode {
        self.chain.effect()
    }
}

/// The stock chain, as built from `ChainConfig::default()`.
impl Default for OutputGraph {
    fn default() -> Self {
        Self::build(&ChainConfig::default())
    }
}
