use crate::foundation::error::{SheetError, SheetResult};
use crate::render::surface::Surface;

/// Global options handed to an encoder collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EncoderOpts {
    /// Output quality in `[1, 100]`; higher is slower and closer to the source colors.
    pub quality: u8,
    /// Flatten alpha over this straight-alpha RGBA color. `None` keeps transparency.
    pub background: Option<[u8; 4]>,
    /// Loop the animation forever instead of playing it once.
    pub repeat_forever: bool,
}

impl Default for EncoderOpts {
    fn default() -> Self {
        Self {
            quality: 90,
            background: None,
            repeat_forever: true,
        }
    }
}

/// Configuration provided to a [`FrameEncoder`] before any frame is pushed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EncodeConfig {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Number of frames that will be pushed.
    pub frame_count: usize,
    /// Encoder options.
    pub opts: EncoderOpts,
}

/// Encoder contract for turning an ordered frame list into one binary artifact.
///
/// Ordering contract: `push_frame` is called in playback order, between one `begin` and one
/// `finish`.
pub trait FrameEncoder: Send {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: EncodeConfig) -> SheetResult<()>;
    /// Push one frame together with its display time.
    fn push_frame(&mut self, frame: &Surface, delay_ms: f64) -> SheetResult<()>;
    /// Produce the encoded artifact.
    fn finish(&mut self) -> SheetResult<Vec<u8>>;
}

/// In-memory encoder for tests and debugging.
///
/// The artifact it returns is the concatenation of every pushed frame's pixel bytes.
#[derive(Debug, Default)]
pub struct InMemoryEncoder {
    cfg: Option<EncodeConfig>,
    frames: Vec<(Surface, f64)>,
    finished: bool,
}

impl InMemoryEncoder {
    /// Create a new in-memory encoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<EncodeConfig> {
        self.cfg
    }

    /// Frames and delays in push order.
    pub fn frames(&self) -> &[(Surface, f64)] {
        &self.frames
    }

    /// Whether `finish` has been called.
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl FrameEncoder for InMemoryEncoder {
    fn begin(&mut self, cfg: EncodeConfig) -> SheetResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.finished = false;
        Ok(())
    }

    fn push_frame(&mut self, frame: &Surface, delay_ms: f64) -> SheetResult<()> {
        let cfg = self
            .cfg
            .ok_or_else(|| SheetError::encode("in-memory encoder not started"))?;
        check_frame_size(&cfg, frame)?;
        self.frames.push((frame.clone(), delay_ms));
        Ok(())
    }

    fn finish(&mut self) -> SheetResult<Vec<u8>> {
        if self.cfg.is_none() {
            return Err(SheetError::encode("in-memory encoder not started"));
        }
        self.finished = true;
        Ok(self
            .frames
            .iter()
            .flat_map(|(s, _)| s.data.iter().copied())
            .collect())
    }
}

/// Reject frames whose size differs from the configured one.
pub(crate) fn check_frame_size(cfg: &EncodeConfig, frame: &Surface) -> SheetResult<()> {
    if frame.width != cfg.width || frame.height != cfg.height {
        return Err(SheetError::encode(format!(
            "frame size mismatch: got {}x{}, expected {}x{}",
            frame.width, frame.height, cfg.width, cfg.height
        )));
    }
    Ok(())
}
