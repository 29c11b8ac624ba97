use crate::foundation::error::{SheetError, SheetResult};

/// Largest accepted surface buffer, in bytes (1 GiB).
pub const MAX_SURFACE_BYTES: usize = 1 << 30;

/// A drawable RGBA8 target (straight alpha, tightly packed, row-major).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Surface {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// RGBA8 bytes, `width * height * 4` long.
    pub data: Vec<u8>,
}

impl Surface {
    /// Allocate a transparent surface.
    pub fn new(width: u32, height: u32) -> SheetResult<Self> {
        let mut s = Self::default();
        s.resize(width, height)?;
        Ok(s)
    }

    /// Change the pixel size. Contents are unspecified afterwards; call [`Surface::clear`].
    pub fn resize(&mut self, width: u32, height: u32) -> SheetResult<()> {
        if width == 0 || height == 0 {
            return Err(SheetError::render("surface width/height must be non-zero"));
        }
        let bytes = (width as usize)
            .checked_mul(height as usize)
            .and_then(|px| px.checked_mul(4))
            .filter(|&n| n <= MAX_SURFACE_BYTES)
            .ok_or_else(|| {
                SheetError::render(format!(
                    "surface {width}x{height} exceeds the {MAX_SURFACE_BYTES}-byte budget"
                ))
            })?;
        self.width = width;
        self.height = height;
        self.data.resize(bytes, 0);
        Ok(())
    }

    /// Fill with transparent black.
    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    /// RGBA of the pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = self.offset(x, y);
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }

    pub(crate) fn put(&mut self, x: u32, y: u32, px: [u8; 4]) {
        let i = self.offset(x, y);
        self.data[i..i + 4].copy_from_slice(&px);
    }

    /// Copy into an `image` buffer, e.g. for PNG output.
    pub fn to_image(&self) -> SheetResult<image::RgbaImage> {
        image::RgbaImage::from_raw(self.width, self.height, self.data.clone())
            .ok_or_else(|| SheetError::render("surface buffer does not match its size"))
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        ((y as usize) * (self.width as usize) + x as usize) * 4
    }
}
