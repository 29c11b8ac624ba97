use crate::foundation::core::{FrameIndex, GridConfig, ImageDimensions};

/// Source rectangle of one frame in sheet pixel space.
///
/// Values are real-valued and never pre-rounded; rounding only happens for display labels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameRect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Cell width (`image_width / columns`).
    pub width: f64,
    /// Cell height (`image_height / rows`).
    pub height: f64,
}

impl FrameRect {
    /// Top-left corner as a point.
    pub fn origin(self) -> kurbo::Point {
        kurbo::Point::new(self.x, self.y)
    }
}

/// Compute the source rectangle of `frame`.
///
/// `frame` must already be reduced modulo `grid.total_frames()`.
pub fn frame_rect(grid: GridConfig, dims: ImageDimensions, frame: FrameIndex) -> FrameRect {
    let width = f64::from(dims.width) / f64::from(grid.columns());
    let height = f64::from(dims.height) / f64::from(grid.rows());
    let addr = grid.address(frame);
    FrameRect {
        x: f64::from(addr.column) * width,
        y: f64::from(addr.row) * height,
        width,
        height,
    }
}

/// Grid layout bound to a concrete sheet size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameGeometry {
    /// Grid layout.
    pub grid: GridConfig,
    /// Natural sheet size.
    pub dims: ImageDimensions,
}

impl FrameGeometry {
    /// Bind `grid` to `dims`.
    pub fn new(grid: GridConfig, dims: ImageDimensions) -> Self {
        Self { grid, dims }
    }

    /// Real-valued cell width.
    pub fn frame_width(self) -> f64 {
        f64::from(self.dims.width) / f64::from(self.grid.columns())
    }

    /// Real-valued cell height.
    pub fn frame_height(self) -> f64 {
        f64::from(self.dims.height) / f64::from(self.grid.rows())
    }

    /// See [`frame_rect`].
    pub fn rect(self, frame: FrameIndex) -> FrameRect {
        frame_rect(self.grid, self.dims, frame)
    }

    /// Cell size rounded to whole pixels, for labels such as `256x256`.
    pub fn display_cell_size(self) -> (u32, u32) {
        (
            self.frame_width().round() as u32,
            self.frame_height().round() as u32,
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/grid.rs"]
mod tests;
