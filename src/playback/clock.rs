//! Elapsed time -> frame index.
//!
//! The clock is a pure function of `(now, origin, timing, mode)`. It keeps no counters, so it
//! can be sampled at any rate: over-sampling returns the same frame, under-sampling skips
//! frames but never reorders them.

use crate::foundation::core::{CycleConfig, FrameIndex};
use crate::playback::mode::PlaybackMode;

/// Slack (in frames) absorbed before flooring `elapsed / delay`.
///
/// Sampling exactly at `k * delay` can land a few ulps under `k` for delays that are not
/// representable in binary; the slack keeps those samples on frame `k`.
const FRAME_EPSILON: f64 = 1e-7;

/// Snapshot the clock counts from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CycleOrigin {
    /// Timestamp (ms, host clock) at which `frame` was displayed.
    pub timestamp_ms: f64,
    /// Frame displayed at `timestamp_ms`.
    pub frame: FrameIndex,
}

impl CycleOrigin {
    /// Origin at `frame`, displayed at `timestamp_ms`.
    pub fn new(timestamp_ms: f64, frame: FrameIndex) -> Self {
        Self {
            timestamp_ms,
            frame,
        }
    }
}

/// Whole frame delays elapsed in `elapsed_ms`. Negative or non-finite elapsed time counts as 0.
pub fn frames_passed(elapsed_ms: f64, frame_delay_ms: f64) -> u64 {
    if elapsed_ms.is_nan() || elapsed_ms <= 0.0 || frame_delay_ms.is_nan() || frame_delay_ms <= 0.0
    {
        return 0;
    }
    let ratio = elapsed_ms / frame_delay_ms;
    if !ratio.is_finite() {
        return 0;
    }
    (ratio + FRAME_EPSILON).floor() as u64
}

/// Frame visible `frames_passed` steps after `origin_frame`.
pub fn frame_after(
    mode: PlaybackMode,
    origin_frame: FrameIndex,
    frames_passed: u64,
    total_frames: u32,
) -> FrameIndex {
    if total_frames == 0 {
        return FrameIndex(0);
    }
    let total = u64::from(total_frames);
    let origin = u64::from(origin_frame.0);

    match mode {
        PlaybackMode::Forward => FrameIndex(((origin + frames_passed % total) % total) as u32),
        PlaybackMode::Reverse => {
            // Reduce first so the subtraction stays small, then normalize into [0, total).
            let back = (frames_passed % total) as i64;
            let raw = (origin as i64 - back) % total as i64;
            let idx = if raw < 0 { raw + total as i64 } else { raw };
            FrameIndex(idx as u32)
        }
        PlaybackMode::PingPong => {
            if total_frames <= 1 {
                return FrameIndex(0);
            }
            let cycle = (total - 1) * 2;
            let pos = (origin % cycle + frames_passed % cycle) % cycle;
            let idx = if pos < total { pos } else { cycle - pos };
            FrameIndex(idx as u32)
        }
    }
}

/// Frame visible at `now_ms` for a clock started at `origin`.
pub fn frame_at(
    now_ms: f64,
    origin: CycleOrigin,
    cycle: CycleConfig,
    mode: PlaybackMode,
) -> FrameIndex {
    let passed = frames_passed(now_ms - origin.timestamp_ms, cycle.frame_delay_ms());
    frame_after(mode, origin.frame, passed, cycle.total_frames())
}

/// Bundles the inputs of [`frame_at`] so hosts can sample with a single `now`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlaybackClock {
    /// Traversal direction.
    pub mode: PlaybackMode,
    /// Timing.
    pub cycle: CycleConfig,
    /// Where counting starts.
    pub origin: CycleOrigin,
}

impl PlaybackClock {
    /// Create a clock.
    pub fn new(mode: PlaybackMode, cycle: CycleConfig, origin: CycleOrigin) -> Self {
        Self {
            mode,
            cycle,
            origin,
        }
    }

    /// Frame visible at `now_ms`.
    pub fn sample(&self, now_ms: f64) -> FrameIndex {
        frame_at(now_ms, self.origin, self.cycle, self.mode)
    }

    /// Samples at `origin + k * frame_delay` for `k` in `0..count`.
    pub fn sample_steps(&self, count: usize) -> Vec<FrameIndex> {
        let delay = self.cycle.frame_delay_ms();
        (0..count)
            .map(|k| self.sample(self.origin.timestamp_ms + k as f64 * delay))
            .collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/clock.rs"]
mod tests;
