//! A short call-and-response between a lead line and its accompaniment.

use std::{thread, time::Duration};

use log::info;

use notewire::NoteDispatcher;

const LEAD: u32 = 0;
const ACCOMPANIMENT: u32 = 1;

/// Seconds per beat at 100 BPM
const BEAT: f32 = 0.6;

/// (tone, beats) pairs; tones are semitones above the role's base pitch.
const MELODY: &[(i32, f32)] = &[
    (0, 1.0),
    (4, 1.0),
    (7, 1.0),
    (12, 1.0),
    (11, 0.5),
    (7, 0.5),
    (9, 1.0),
    (7, 2.0),
    (5, 1.0),
    (4, 1.0),
    (2, 1.0),
    (0, 3.0),
];

/// One chord root per bar of four beats.
const ROOTS: &[i32] = &[0, 9, 5, 7];

pub fn play(dispatcher: &mut NoteDispatcher) {
    let bar_beats = 4.0;
    let mut melody = MELODY.iter().copied().peekable();
    let mut melody_clock = 0.0_f32;
    let mut clock = 0.0_f32;

    for (bar, &root) in ROOTS.iter().enumerate() {
        info!("Bar {}", bar + 1);
        let bar_end = (bar as f32 + 1.0) * bar_beats;

        // Accompaniment: root and fifth on every beat of the bar
        let mut beat = bar as f32 * bar_beats;
        while beat < bar_end {
            // Lead notes that fall on or before this beat
            while let Some(&(tone, beats)) = melody.peek() {
                if melody_clock > beat {
                    break;
                }
                wait_until(&mut clock, melody_clock);
                dispatcher.play_note(LEAD, "Piano", tone, beats * BEAT * 2.0);
                melody_clock += beats;
                melody.next();
            }

            wait_until(&mut clock, beat);
            let instrument = if bar % 2 == 0 { "Guitar" } else { "Marimba" };
            dispatcher.play_note(ACCOMPANIMENT, instrument, root, BEAT * 2.0);
            dispatcher.play_note(ACCOMPANIMENT, instrument, root + 7, BEAT * 2.0);
            beat += 1.0;
        }
    }

    // Remaining lead notes and the final bell
    for (tone, beats) in melody {
        wait_until(&mut clock, melody_clock);
        dispatcher.play_note(LEAD, "Piano", tone, beats * BEAT * 2.0);
        melody_clock += beats;
    }
    wait_until(&mut clock, melody_clock);
    dispatcher.play_note(LEAD, "Xylophone", 12, BEAT * 4.0);
}

fn wait_until(clock: &mut f32, beat: f32) {
    if beat > *clock {
        thread::sleep(Duration::from_secs_f32((beat - *clock) * BEAT));
        *clock = beat;
    }
}
