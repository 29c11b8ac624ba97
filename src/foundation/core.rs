use crate::foundation::error::{SheetError, SheetResult};

/// Smallest accepted column/row count.
pub const GRID_MIN: u32 = 1;
/// Largest accepted column/row count.
pub const GRID_MAX: u32 = 50;
/// Shortest accepted cycle duration in seconds.
pub const DURATION_MIN_SECS: f64 = 0.1;
/// Longest accepted cycle duration in seconds.
pub const DURATION_MAX_SECS: f64 = 5.0;
/// Smallest accepted preview scale in percent.
pub const SCALE_MIN_PERCENT: u32 = 10;
/// Largest accepted preview scale in percent.
pub const SCALE_MAX_PERCENT: u32 = 500;

/// Zero-based frame position in row-major grid order.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize,
    serde::Deserialize,
)]
pub struct FrameIndex(pub u32);

/// Column/row position of a frame inside the sheet grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct FrameAddress {
    /// Column in `[0, columns)`.
    pub column: u32,
    /// Row in `[0, rows)`.
    pub row: u32,
}

/// Grid layout of a sprite sheet. Both counts are always in `[GRID_MIN, GRID_MAX]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GridConfig {
    columns: u32,
    rows: u32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            columns: 4,
            rows: 4,
        }
    }
}

impl GridConfig {
    /// Create a grid, clamping both counts into the accepted range.
    pub fn new(columns: u32, rows: u32) -> Self {
        Self {
            columns: clamp_grid_count(columns),
            rows: clamp_grid_count(rows),
        }
    }

    /// Number of columns.
    pub fn columns(self) -> u32 {
        self.columns
    }

    /// Number of rows.
    pub fn rows(self) -> u32 {
        self.rows
    }

    /// `columns * rows`, always at least 1.
    pub fn total_frames(self) -> u32 {
        self.columns * self.rows
    }

    /// Checked conversion of a raw index into a [`FrameIndex`] for this grid.
    pub fn frame(self, i: u32) -> Option<FrameIndex> {
        (i < self.total_frames()).then_some(FrameIndex(i))
    }

    /// Reduce an arbitrary index modulo `total_frames`.
    pub fn wrap(self, i: u64) -> FrameIndex {
        FrameIndex((i % u64::from(self.total_frames())) as u32)
    }

    /// Column/row of `frame`. `frame` must already be reduced modulo `total_frames`.
    pub fn address(self, frame: FrameIndex) -> FrameAddress {
        debug_assert!(frame.0 < self.total_frames());
        FrameAddress {
            column: frame.0 % self.columns,
            row: frame.0 / self.columns,
        }
    }

    /// Inverse of [`GridConfig::address`].
    pub fn index_of(self, addr: FrameAddress) -> FrameIndex {
        FrameIndex(addr.row * self.columns + addr.column)
    }
}

/// Natural pixel size of a loaded sprite sheet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct ImageDimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl ImageDimensions {
    /// Create validated dimensions (both sides non-zero).
    pub fn new(width: u32, height: u32) -> SheetResult<Self> {
        if width == 0 || height == 0 {
            return Err(SheetError::validation(
                "image dimensions must be non-zero",
            ));
        }
        Ok(Self { width, height })
    }
}

/// Cycle timing: how long one full traversal of the grid takes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CycleConfig {
    duration_seconds: f64,
    total_frames: u32,
}

impl CycleConfig {
    /// Create a cycle config. Duration is clamped and `total_frames` is raised to at least 1.
    pub fn new(duration_seconds: f64, total_frames: u32) -> Self {
        Self {
            duration_seconds: clamp_duration_secs(duration_seconds),
            total_frames: total_frames.max(1),
        }
    }

    /// Cycle duration in seconds.
    pub fn duration_seconds(self) -> f64 {
        self.duration_seconds
    }

    /// Frames in one forward pass of the grid.
    pub fn total_frames(self) -> u32 {
        self.total_frames
    }

    /// Full cycle duration in milliseconds.
    pub fn cycle_ms(self) -> f64 {
        self.duration_seconds * 1000.0
    }

    /// Display time of one frame in milliseconds. Always `> 0`.
    pub fn frame_delay_ms(self) -> f64 {
        self.cycle_ms() / f64::from(self.total_frames)
    }

    /// Rounded per-frame delay, for labels only.
    pub fn approx_frame_delay_ms(self) -> u64 {
        self.frame_delay_ms().round() as u64
    }

    /// Frames shown per second at this timing.
    pub fn effective_fps(self) -> f64 {
        f64::from(self.total_frames) / self.duration_seconds
    }
}

/// Clamp a column/row count into `[GRID_MIN, GRID_MAX]`.
pub fn clamp_grid_count(n: u32) -> u32 {
    n.clamp(GRID_MIN, GRID_MAX)
}

/// Clamp a cycle duration into `[DURATION_MIN_SECS, DURATION_MAX_SECS]`.
///
/// Non-finite input maps to the minimum.
pub fn clamp_duration_secs(secs: f64) -> f64 {
    if !secs.is_finite() {
        return DURATION_MIN_SECS;
    }
    secs.clamp(DURATION_MIN_SECS, DURATION_MAX_SECS)
}

/// Clamp a preview scale into `[SCALE_MIN_PERCENT, SCALE_MAX_PERCENT]`.
pub fn clamp_scale_percent(p: u32) -> u32 {
    p.clamp(SCALE_MIN_PERCENT, SCALE_MAX_PERCENT)
}

/// Human-readable frame counter, 1-based: `FRAME: 5 / 16`.
pub fn frame_label(current: FrameIndex, total_frames: u32) -> String {
    format!("FRAME: {} / {}", current.0 + 1, total_frames)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
