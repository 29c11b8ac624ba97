use crate::foundation::core::{CycleConfig, FrameIndex};
use crate::playback::mode::PlaybackMode;

/// One entry of an export cycle: which frame, and for how long.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct SequenceStep {
    /// Frame to show.
    pub frame: FrameIndex,
    /// Display time in milliseconds. Uniform across a cycle.
    pub delay_ms: f64,
}

/// Frame indices of exactly one cycle of `mode` over `total_frames` frames.
///
/// Replaying the result through the playback clock from `origin = result[0]` at `t = 0`
/// reproduces it sample for sample.
pub fn cycle_indices(mode: PlaybackMode, total_frames: u32) -> Vec<FrameIndex> {
    match mode {
        PlaybackMode::Forward => (0..total_frames).map(FrameIndex).collect(),
        PlaybackMode::Reverse => (0..total_frames).rev().map(FrameIndex).collect(),
        PlaybackMode::PingPong => {
            if total_frames <= 1 {
                return (0..total_frames).map(FrameIndex).collect();
            }
            let up = 0..total_frames;
            let down = (1..total_frames - 1).rev();
            up.chain(down).map(FrameIndex).collect()
        }
    }
}

/// [`cycle_indices`] paired with the cycle's uniform frame delay.
pub fn cycle_sequence(mode: PlaybackMode, cycle: CycleConfig) -> Vec<SequenceStep> {
    let delay_ms = cycle.frame_delay_ms();
    cycle_indices(mode, cycle.total_frames())
        .into_iter()
        .map(|frame| SequenceStep { frame, delay_ms })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/sequence/generator.rs"]
mod tests;
