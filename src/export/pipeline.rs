//! One-cycle export: sequence -> per-frame extraction -> encoder hand-off.
//!
//! Extraction can fan out over a dedicated rayon pool; results are collected in sequence order,
//! so the encoder always sees frames in playback order. Exports can run on a background thread
//! through [`spawn_export`], which returns an [`ExportHandle`].

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;

use rayon::prelude::*;

use crate::assets::decode::SpriteSheet;
use crate::encode::sink::{EncodeConfig, EncoderOpts, FrameEncoder};
use crate::foundation::core::{CycleConfig, GridConfig};
use crate::foundation::error::{SheetError, SheetResult};
use crate::geometry::grid::FrameGeometry;
use crate::playback::mode::PlaybackMode;
use crate::render::frame::{CpuExtractor, FrameExtractor, RenderTransform};
use crate::render::surface::Surface;
use crate::sequence::generator::{SequenceStep, cycle_sequence};

/// What to do when a single frame fails to extract.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Log the failure, drop the frame, keep exporting.
    #[default]
    SkipFrame,
    /// Stop the export and return the failure.
    Abort,
}

/// Export tuning.
#[derive(Clone, Debug, Default)]
pub struct ExportOpts {
    /// Per-frame failure handling.
    pub failure_policy: FailurePolicy,
    /// Extract frames in parallel on a dedicated rayon pool.
    pub parallel: bool,
    /// Override the number of rayon worker threads. `None` uses rayon defaults.
    pub threads: Option<usize>,
    /// Options forwarded to the encoder.
    pub encoder: EncoderOpts,
}

/// Immutable snapshot of everything an export reads.
#[derive(Clone, Debug)]
pub struct ExportRequest {
    /// Source sheet.
    pub sheet: Arc<SpriteSheet>,
    /// Grid layout.
    pub grid: GridConfig,
    /// Timing; `total_frames` equals `grid.total_frames()`.
    pub cycle: CycleConfig,
    /// Playback mode to materialize.
    pub mode: PlaybackMode,
    /// Mirror frames horizontally.
    pub flip_horizontal: bool,
}

impl ExportRequest {
    /// Build a request, deriving the cycle from `grid` and `duration_seconds`.
    pub fn new(
        sheet: Arc<SpriteSheet>,
        grid: GridConfig,
        duration_seconds: f64,
        mode: PlaybackMode,
        flip_horizontal: bool,
    ) -> Self {
        Self {
            sheet,
            grid,
            cycle: CycleConfig::new(duration_seconds, grid.total_frames()),
            mode,
            flip_horizontal,
        }
    }
}

/// Export counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExportStats {
    /// Frames in the cycle.
    pub frames_total: u64,
    /// Frames handed to the encoder.
    pub frames_encoded: u64,
    /// Frames dropped by [`FailurePolicy::SkipFrame`].
    pub frames_skipped: u64,
}

/// The encoded result of an export.
#[derive(Clone, Debug)]
pub struct ExportArtifact {
    /// Encoder output, uninterpreted.
    pub bytes: Vec<u8>,
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Counters.
    pub stats: ExportStats,
}

/// Cooperative cancellation flag, checked per frame and before the encoder hand-off.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Create an un-cancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Shared "an export is in flight" flag.
#[derive(Clone, Debug, Default)]
pub struct ExportFlag(Arc<AtomicBool>);

impl ExportFlag {
    /// Whether an export currently holds the flag.
    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Take the flag, or `None` if an export already holds it.
    pub(crate) fn try_acquire(&self) -> Option<ExportGuard> {
        self.0
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| ExportGuard(self.0.clone()))
    }
}

/// Clears its [`ExportFlag`] exactly once, when dropped.
pub(crate) struct ExportGuard(Arc<AtomicBool>);

impl Drop for ExportGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Run one export synchronously.
#[tracing::instrument(
    skip_all,
    fields(mode = %req.mode, columns = req.grid.columns(), rows = req.grid.rows())
)]
pub fn export_cycle(
    req: &ExportRequest,
    opts: &ExportOpts,
    extractor: &dyn FrameExtractor,
    encoder: &mut dyn FrameEncoder,
    cancel: &CancelToken,
) -> SheetResult<ExportArtifact> {
    let steps = cycle_sequence(req.mode, req.cycle);
    let geo = FrameGeometry::new(req.grid, req.sheet.dimensions());
    // Export always renders at 100 %; preview zoom does not apply.
    let transform = RenderTransform::new(req.flip_horizontal, 100);

    let extract_one = |step: &SequenceStep| -> SheetResult<Surface> {
        if cancel.is_cancelled() {
            return Err(SheetError::Cancelled);
        }
        extractor.extract(&req.sheet, step.frame, geo.rect(step.frame), transform)
    };

    let rendered: Vec<SheetResult<Surface>> = if opts.parallel {
        let pool = build_thread_pool(opts.threads)?;
        pool.install(|| steps.par_iter().map(extract_one).collect())
    } else {
        steps.iter().map(extract_one).collect()
    };

    let mut stats = ExportStats {
        frames_total: steps.len() as u64,
        ..ExportStats::default()
    };
    let mut kept = Vec::with_capacity(steps.len());
    for (step, res) in steps.iter().zip(rendered) {
        match res {
            Ok(surface) => kept.push((surface, step.delay_ms)),
            Err(SheetError::Cancelled) => return Err(SheetError::Cancelled),
            Err(e) => match opts.failure_policy {
                FailurePolicy::SkipFrame => {
                    tracing::warn!(frame = step.frame.0, error = %e, "skipping frame that failed to extract");
                    stats.frames_skipped += 1;
                }
                FailurePolicy::Abort => return Err(e),
            },
        }
    }

    let Some((first, _)) = kept.first() else {
        return Err(SheetError::encode(
            "no frames could be extracted; nothing to encode",
        ));
    };
    let (width, height) = (first.width, first.height);

    if cancel.is_cancelled() {
        return Err(SheetError::Cancelled);
    }

    encoder.begin(EncodeConfig {
        width,
        height,
        frame_count: kept.len(),
        opts: opts.encoder,
    })?;
    for (surface, delay_ms) in &kept {
        encoder.push_frame(surface, *delay_ms)?;
        stats.frames_encoded += 1;
    }
    let bytes = encoder.finish()?;

    tracing::info!(
        frames = stats.frames_encoded,
        skipped = stats.frames_skipped,
        bytes = bytes.len(),
        "export finished"
    );
    Ok(ExportArtifact {
        bytes,
        width,
        height,
        stats,
    })
}

/// Handle to a background export.
pub struct ExportHandle {
    join: JoinHandle<SheetResult<ExportArtifact>>,
    cancel: CancelToken,
}

impl ExportHandle {
    /// Ask the export to stop at the next frame boundary.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Whether the background thread has finished.
    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Block until the export finishes and return its result.
    pub fn wait(self) -> SheetResult<ExportArtifact> {
        self.join
            .join()
            .map_err(|_| SheetError::encode("export thread panicked"))?
    }
}

/// Run [`export_cycle`] with the CPU extractor on a background thread.
pub fn spawn_export(
    req: ExportRequest,
    opts: ExportOpts,
    encoder: Box<dyn FrameEncoder>,
) -> SheetResult<ExportHandle> {
    spawn_export_guarded(req, opts, encoder, CancelToken::new(), None)
}

pub(crate) fn spawn_export_guarded(
    req: ExportRequest,
    opts: ExportOpts,
    mut encoder: Box<dyn FrameEncoder>,
    cancel: CancelToken,
    guard: Option<ExportGuard>,
) -> SheetResult<ExportHandle> {
    let thread_cancel = cancel.clone();
    let join = std::thread::Builder::new()
        .name("sheetloop-export".to_owned())
        .spawn(move || {
            // Released when this closure returns or unwinds.
            let _guard = guard;
            export_cycle(
                &req,
                &opts,
                &CpuExtractor,
                encoder.as_mut(),
                &thread_cancel,
            )
        })
        .map_err(|e| SheetError::encode(format!("failed to spawn export thread: {e}")))?;
    Ok(ExportHandle { join, cancel })
}

fn build_thread_pool(threads: Option<usize>) -> SheetResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(SheetError::validation(
            "export 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| SheetError::render(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/export/pipeline.rs"]
mod tests;
