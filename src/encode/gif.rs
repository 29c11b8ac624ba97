use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame, RgbaImage};

use crate::encode::sink::{EncodeConfig, FrameEncoder, check_frame_size};
use crate::foundation::error::{SheetError, SheetResult};
use crate::render::surface::Surface;

/// GIF logical screen sides are 16-bit.
const GIF_MAX_SIDE: u32 = u16::MAX as u32;

/// Animated GIF encoder.
///
/// Frames are buffered on `push_frame` and encoded in one pass on `finish`, which is also
/// when the GIF trailer is written.
#[derive(Default)]
pub struct GifEncoderSink {
    cfg: Option<EncodeConfig>,
    frames: Vec<Frame>,
}

impl GifEncoderSink {
    /// Create an idle encoder.
    pub fn new() -> Self {
        Self::default()
    }
}

impl FrameEncoder for GifEncoderSink {
    fn begin(&mut self, cfg: EncodeConfig) -> SheetResult<()> {
        if cfg.width == 0 || cfg.height == 0 {
            return Err(SheetError::validation(
                "gif encoder width/height must be non-zero",
            ));
        }
        if cfg.width > GIF_MAX_SIDE || cfg.height > GIF_MAX_SIDE {
            return Err(SheetError::validation(format!(
                "gif frames are limited to {GIF_MAX_SIDE}px per side, got {}x{}",
                cfg.width, cfg.height
            )));
        }
        self.frames = Vec::with_capacity(cfg.frame_count);
        self.cfg = Some(cfg);
        Ok(())
    }

    fn push_frame(&mut self, frame: &Surface, delay_ms: f64) -> SheetResult<()> {
        let cfg = self
            .cfg
            .ok_or_else(|| SheetError::encode("gif encoder not started"))?;
        check_frame_size(&cfg, frame)?;

        let mut data = frame.data.clone();
        if let Some(bg) = cfg.opts.background {
            flatten_over_background(&mut data, bg)?;
        }
        let img = RgbaImage::from_raw(frame.width, frame.height, data)
            .ok_or_else(|| SheetError::encode("frame.data size mismatch with width*height*4"))?;
        self.frames
            .push(Frame::from_parts(img, 0, 0, delay_from_ms(delay_ms)));
        Ok(())
    }

    fn finish(&mut self) -> SheetResult<Vec<u8>> {
        let cfg = self
            .cfg
            .take()
            .ok_or_else(|| SheetError::encode("gif encoder not started"))?;
        if self.frames.is_empty() {
            return Err(SheetError::encode("no frames to encode"));
        }

        let mut out = Vec::new();
        {
            let mut enc = GifEncoder::new_with_speed(&mut out, quality_to_speed(cfg.opts.quality));
            if cfg.opts.repeat_forever {
                enc.set_repeat(Repeat::Infinite)
                    .map_err(|e| SheetError::encode(format!("set gif repeat: {e}")))?;
            }
            for frame in self.frames.drain(..) {
                enc.encode_frame(frame)
                    .map_err(|e| SheetError::encode(format!("encode gif frame: {e}")))?;
            }
        }
        tracing::debug!(bytes = out.len(), "gif encoded");
        Ok(out)
    }
}

/// Map quality `[1, 100]` onto the quantizer speed `[30, 1]` (1 is slowest/best).
fn quality_to_speed(quality: u8) -> i32 {
    let q = i32::from(quality.clamp(1, 100));
    1 + (100 - q) * 29 / 99
}

fn delay_from_ms(delay_ms: f64) -> Delay {
    let micros = (delay_ms.max(0.0) * 1000.0).round() as u32;
    Delay::from_numer_denom_ms(micros, 1000)
}

/// Composite straight-alpha RGBA8 over an opaque background in place.
fn flatten_over_background(rgba: &mut [u8], bg_rgba: [u8; 4]) -> SheetResult<()> {
    if !rgba.len().is_multiple_of(4) {
        return Err(SheetError::validation(
            "flatten_over_background expects an rgba8 buffer",
        ));
    }

    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 255 {
            continue;
        }
        let inv = 255 - a;
        for c in 0..3 {
            px[c] = (mul_div255(u16::from(px[c]), a) + mul_div255(u16::from(bg_rgba[c]), inv))
                .min(255) as u8;
        }
        px[3] = 255;
    }
    Ok(())
}

fn mul_div255(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

#[cfg(test)]
#[path = "../../tests/unit/encode/gif.rs"]
mod tests;
