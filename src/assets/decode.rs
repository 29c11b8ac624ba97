use std::path::Path;
use std::sync::Arc;

use anyhow::Context as _;

use crate::foundation::core::ImageDimensions;
use crate::foundation::error::{SheetError, SheetResult};

/// A decoded sprite sheet: natural size plus straight-alpha RGBA8 pixels.
///
/// Pixels are shared behind an `Arc` so a sheet can be handed to an export thread while the
/// controller keeps rendering previews from it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpriteSheet {
    dims: ImageDimensions,
    rgba8: Arc<Vec<u8>>,
}

impl SpriteSheet {
    /// Wrap tightly packed RGBA8 pixels.
    pub fn from_rgba8(width: u32, height: u32, rgba8: Vec<u8>) -> SheetResult<Self> {
        let dims = ImageDimensions::new(width, height)?;
        let expected = (width as usize) * (height as usize) * 4;
        if rgba8.len() != expected {
            return Err(SheetError::validation(format!(
                "sprite sheet buffer is {} bytes, expected {expected} for {width}x{height}",
                rgba8.len()
            )));
        }
        Ok(Self {
            dims,
            rgba8: Arc::new(rgba8),
        })
    }

    /// Natural pixel size.
    pub fn dimensions(&self) -> ImageDimensions {
        self.dims
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.dims.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.dims.height
    }

    /// Tightly packed, row-major RGBA8 bytes.
    pub fn pixels(&self) -> &[u8] {
        &self.rgba8
    }

    /// RGBA of the pixel at `(x, y)`. Coordinates must be in bounds.
    pub(crate) fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = ((y as usize) * (self.dims.width as usize) + x as usize) * 4;
        let px = &self.rgba8[i..i + 4];
        [px[0], px[1], px[2], px[3]]
    }
}

/// Decode encoded image bytes (PNG, JPEG, GIF, WebP, ...) into a sprite sheet.
pub fn decode_sheet(bytes: &[u8]) -> SheetResult<SpriteSheet> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| SheetError::decode(format!("could not decode sprite sheet: {e}")))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    tracing::debug!(width, height, "decoded sprite sheet");
    SpriteSheet::from_rgba8(width, height, rgba.into_raw())
}

/// Read and decode a sprite sheet from disk.
pub fn load_sheet(path: &Path) -> SheetResult<SpriteSheet> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("read sprite sheet '{}'", path.display()))?;
    decode_sheet(&bytes)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
