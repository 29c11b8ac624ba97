use kurbo::{Affine, Point};

use crate::assets::decode::SpriteSheet;
use crate::foundation::core::{FrameIndex, clamp_scale_percent};
use crate::foundation::error::SheetResult;
use crate::geometry::grid::FrameRect;
use crate::render::surface::Surface;

/// Draw-time presentation of a frame. Never changes which frame or rectangle is used.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct RenderTransform {
    /// Mirror the frame about its vertical axis.
    pub flip_horizontal: bool,
    scale_percent: u32,
}

impl Default for RenderTransform {
    fn default() -> Self {
        Self {
            flip_horizontal: false,
            scale_percent: 100,
        }
    }
}

impl RenderTransform {
    /// Create a transform; `scale_percent` is clamped into `[10, 500]`.
    pub fn new(flip_horizontal: bool, scale_percent: u32) -> Self {
        Self {
            flip_horizontal,
            scale_percent: clamp_scale_percent(scale_percent),
        }
    }

    /// Display scale in percent.
    pub fn scale_percent(self) -> u32 {
        self.scale_percent
    }

    /// Same flip, scale replaced (and clamped).
    pub fn with_scale_percent(self, scale_percent: u32) -> Self {
        Self::new(self.flip_horizontal, scale_percent)
    }

    /// Same flip at 100 % scale, the size export renders at.
    pub fn unscaled(self) -> Self {
        Self::new(self.flip_horizontal, 100)
    }
}

/// Destination size for `rect` at `scale_percent`, rounded, at least 1x1.
pub fn scaled_extent(rect: FrameRect, scale_percent: u32) -> (u32, u32) {
    let k = f64::from(scale_percent) / 100.0;
    let side = |v: f64| ((v * k).round().max(1.0)) as u32;
    (side(rect.width), side(rect.height))
}

/// Maps destination pixel space onto sheet pixel space.
fn dest_to_source(rect: FrameRect, dst_w: u32, dst_h: u32, flip_horizontal: bool) -> Affine {
    let scale = Affine::scale_non_uniform(
        rect.width / f64::from(dst_w),
        rect.height / f64::from(dst_h),
    );
    let mirror = if flip_horizontal {
        Affine::new([-1.0, 0.0, 0.0, 1.0, f64::from(dst_w), 0.0])
    } else {
        Affine::IDENTITY
    };
    Affine::translate(rect.origin().to_vec2()) * scale * mirror
}

/// Resize `target` to the scaled frame size, clear it, and copy `rect` out of `sheet`.
///
/// Sampling is nearest-neighbour on pixel centres so pixel art stays crisp at any scale.
pub fn render_frame(
    target: &mut Surface,
    sheet: &SpriteSheet,
    rect: FrameRect,
    transform: RenderTransform,
) -> SheetResult<()> {
    let (w, h) = scaled_extent(rect, transform.scale_percent());
    target.resize(w, h)?;
    target.clear();

    let m = dest_to_source(rect, w, h, transform.flip_horizontal);

    // Keep samples inside the cell so rounding never bleeds a neighbour's edge in.
    let span = |start: f64, len: f64, limit: u32| {
        let max = limit - 1;
        let lo = (start.floor().max(0.0) as u32).min(max);
        let hi = ((start + len).ceil() as u32).saturating_sub(1).clamp(lo, max);
        (lo, hi)
    };
    let (x_lo, x_hi) = span(rect.x, rect.width, sheet.width());
    let (y_lo, y_hi) = span(rect.y, rect.height, sheet.height());

    for dy in 0..h {
        for dx in 0..w {
            let p = m * Point::new(f64::from(dx) + 0.5, f64::from(dy) + 0.5);
            let sx = (p.x.floor().max(0.0) as u32).clamp(x_lo, x_hi);
            let sy = (p.y.floor().max(0.0) as u32).clamp(y_lo, y_hi);
            target.put(dx, dy, sheet.pixel(sx, sy));
        }
    }
    Ok(())
}

/// Extraction seam used by export: produce one standalone frame surface.
pub trait FrameExtractor: Sync {
    /// Render `frame` (whose source rectangle is `rect`) into a new surface.
    fn extract(
        &self,
        sheet: &SpriteSheet,
        frame: FrameIndex,
        rect: FrameRect,
        transform: RenderTransform,
    ) -> SheetResult<Surface>;
}

/// The built-in CPU extractor, backed by [`render_frame`].
#[derive(Clone, Copy, Debug, Default)]
pub struct CpuExtractor;

impl FrameExtractor for CpuExtractor {
    fn extract(
        &self,
        sheet: &SpriteSheet,
        _frame: FrameIndex,
        rect: FrameRect,
        transform: RenderTransform,
    ) -> SheetResult<Surface> {
        let mut surface = Surface::default();
        render_frame(&mut surface, sheet, rect, transform)?;
        Ok(surface)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/frame.rs"]
mod tests;
