//! Sheetloop previews and exports sprite-sheet animations.
//!
//! A sprite sheet is one image holding every frame of an animation laid out on a regular grid.
//! The crate is organised around a few steps:
//!
//! - Decode a [`SpriteSheet`] and describe its layout with a [`GridConfig`]
//! - Drive live playback through a [`PlaybackController`] (Forward, Reverse, PingPong)
//! - Draw the current frame into a [`Surface`] with flip/zoom applied
//! - Export one full cycle through a [`FrameEncoder`] such as [`GifEncoderSink`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod foundation;

mod config;
/// Encoding collaborators.
pub mod encode;
/// Export orchestration.
pub mod export;
mod geometry;
/// Live playback.
pub mod playback;
/// CPU frame rendering.
pub mod render;
mod sequence;
mod session;

pub use crate::foundation::core::{
    CycleConfig, DURATION_MAX_SECS, DURATION_MIN_SECS, FrameAddress, FrameIndex, GRID_MAX,
    GRID_MIN, GridConfig, ImageDimensions, SCALE_MAX_PERCENT, SCALE_MIN_PERCENT,
    clamp_duration_secs, clamp_grid_count, clamp_scale_percent, frame_label,
};
pub use crate::foundation::error::{SheetError, SheetResult};

pub use crate::assets::decode::{SpriteSheet, decode_sheet, load_sheet};
pub use crate::config::settings::PreviewSettings;
pub use crate::encode::gif::GifEncoderSink;
pub use crate::encode::sink::{EncodeConfig, EncoderOpts, FrameEncoder, InMemoryEncoder};
pub use crate::export::pipeline::{
    CancelToken, ExportArtifact, ExportFlag, ExportHandle, ExportOpts, ExportRequest, ExportStats,
    FailurePolicy, export_cycle, spawn_export,
};
pub use crate::geometry::grid::{FrameGeometry, FrameRect, frame_rect};
pub use crate::playback::clock::{CycleOrigin, PlaybackClock, frame_after, frame_at, frames_passed};
pub use crate::playback::controller::{PlaybackController, PlaybackState, TickTicket};
pub use crate::playback::mode::PlaybackMode;
pub use crate::playback::ticker::Ticker;
pub use crate::render::frame::{CpuExtractor, FrameExtractor, RenderTransform, render_frame, scaled_extent};
pub use crate::render::surface::{MAX_SURFACE_BYTES, Surface};
pub use crate::sequence::generator::{SequenceStep, cycle_indices, cycle_sequence};
pub use crate::session::history::{HistoryEntry, SheetHistory, SheetId};
