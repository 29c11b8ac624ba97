//! The single owner of playback state.
//!
//! Every configuration change while playing re-anchors the clock at the frame currently on
//! screen, so the animation carries on from where it visibly is. Scheduled ticks carry a
//! [`TickTicket`]; pausing, switching sheets, or shutting down bumps the generation and turns
//! any outstanding ticket into a no-op.

use std::sync::Arc;

use crate::assets::decode::{SpriteSheet, decode_sheet};
use crate::config::settings::PreviewSettings;
use crate::encode::sink::FrameEncoder;
use crate::export::pipeline::{
    CancelToken, ExportFlag, ExportHandle, ExportOpts, ExportRequest, spawn_export_guarded,
};
use crate::foundation::core::{CycleConfig, FrameIndex, GridConfig, clamp_duration_secs};
use crate::foundation::error::{SheetError, SheetResult};
use crate::geometry::grid::FrameGeometry;
use crate::playback::clock::{CycleOrigin, frame_at};
use crate::playback::mode::PlaybackMode;
use crate::render::frame::{RenderTransform, render_frame};
use crate::render::surface::Surface;
use crate::session::history::{SheetHistory, SheetId};

/// Snapshot of the playback state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlaybackState {
    /// Traversal direction.
    pub mode: PlaybackMode,
    /// Whether the clock is running.
    pub is_playing: bool,
    /// Last computed frame while playing; authoritative while paused.
    pub current_frame: FrameIndex,
    /// Host timestamp (ms) of the current cycle origin.
    pub cycle_origin_ms: f64,
    /// Frame shown at `cycle_origin_ms`.
    pub cycle_origin_frame: FrameIndex,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            mode: PlaybackMode::Forward,
            is_playing: false,
            current_frame: FrameIndex(0),
            cycle_origin_ms: 0.0,
            cycle_origin_frame: FrameIndex(0),
        }
    }
}

/// Proof that a tick was scheduled by the current playback run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickTicket {
    generation: u64,
}

/// Owns the loaded sheets, grid/timing configuration, [`PlaybackState`] and
/// [`RenderTransform`].
#[derive(Debug)]
pub struct PlaybackController {
    history: SheetHistory,
    grid: GridConfig,
    duration_seconds: f64,
    transform: RenderTransform,
    state: PlaybackState,
    generation: u64,
    exporting: ExportFlag,
    export_cancel: Option<CancelToken>,
}

impl Default for PlaybackController {
    fn default() -> Self {
        Self::new(&PreviewSettings::default())
    }
}

impl PlaybackController {
    /// Create a controller with no sheet loaded.
    pub fn new(settings: &PreviewSettings) -> Self {
        let s = settings.clamped();
        Self {
            history: SheetHistory::new(),
            grid: s.grid(),
            duration_seconds: s.duration_seconds,
            transform: s.transform(),
            state: PlaybackState {
                mode: s.mode,
                ..PlaybackState::default()
            },
            generation: 0,
            exporting: ExportFlag::default(),
            export_cancel: None,
        }
    }

    /// Current configuration, in settings form.
    pub fn settings(&self) -> PreviewSettings {
        PreviewSettings {
            columns: self.grid.columns(),
            rows: self.grid.rows(),
            duration_seconds: self.duration_seconds,
            mode: self.state.mode,
            flip_horizontal: self.transform.flip_horizontal,
            scale_percent: self.transform.scale_percent(),
        }
    }

    /// Playback state snapshot.
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Current draw-time transform.
    pub fn transform(&self) -> RenderTransform {
        self.transform
    }

    /// Current grid layout.
    pub fn grid(&self) -> GridConfig {
        self.grid
    }

    /// Current cycle timing.
    pub fn cycle(&self) -> CycleConfig {
        CycleConfig::new(self.duration_seconds, self.grid.total_frames())
    }

    /// Loaded sheets.
    pub fn history(&self) -> &SheetHistory {
        &self.history
    }

    /// The sheet being previewed.
    pub fn active_sheet(&self) -> Option<&Arc<SpriteSheet>> {
        self.history.active().map(|e| &e.sheet)
    }

    /// Grid bound to the active sheet.
    pub fn geometry(&self) -> Option<FrameGeometry> {
        self.active_sheet()
            .map(|s| FrameGeometry::new(self.grid, s.dimensions()))
    }

    /// Whether an export holds the configuration lock.
    pub fn is_exporting(&self) -> bool {
        self.exporting.is_set()
    }

    /// Add a decoded sheet to the history and preview it from frame 0, paused.
    pub fn load_sheet(&mut self, name: impl Into<String>, sheet: SpriteSheet) -> SheetId {
        let id = self.history.push(name, sheet);
        self.reset_for_new_sheet();
        id
    }

    /// Decode `bytes` and load the result. On failure nothing changes.
    pub fn load_sheet_bytes(&mut self, name: impl Into<String>, bytes: &[u8]) -> SheetResult<SheetId> {
        let sheet = decode_sheet(bytes)?;
        Ok(self.load_sheet(name, sheet))
    }

    /// Switch to a previously loaded sheet. Returns `false` if it already was active.
    pub fn select_sheet(&mut self, id: SheetId) -> SheetResult<bool> {
        if self.history.get(id).is_none() {
            return Err(SheetError::validation(format!("unknown sheet id {}", id.0)));
        }
        if !self.history.select(id) {
            return Ok(false);
        }
        self.reset_for_new_sheet();
        Ok(true)
    }

    /// Start the clock from the current frame. Playing again returns the live ticket.
    pub fn play(&mut self, now_ms: f64) -> SheetResult<TickTicket> {
        if self.active_sheet().is_none() {
            return Err(SheetError::validation("no sprite sheet loaded"));
        }
        if !self.state.is_playing {
            self.state.is_playing = true;
            self.state.cycle_origin_ms = now_ms;
            self.state.cycle_origin_frame = self.state.current_frame;
            tracing::debug!(
                frame = self.state.current_frame.0,
                now_ms,
                "playback started"
            );
        }
        Ok(TickTicket {
            generation: self.generation,
        })
    }

    /// Freeze on the frame visible at `now_ms`.
    pub fn pause(&mut self, now_ms: f64) {
        if !self.state.is_playing {
            return;
        }
        self.state.current_frame = self.displayed_frame(now_ms);
        self.state.is_playing = false;
        self.invalidate_ticks();
    }

    /// Play if paused, pause if playing. Returns the ticket when playback started.
    pub fn toggle(&mut self, now_ms: f64) -> SheetResult<Option<TickTicket>> {
        if self.state.is_playing {
            self.pause(now_ms);
            Ok(None)
        } else {
            self.play(now_ms).map(Some)
        }
    }

    /// Frame visible at `now_ms`. Pure: does not update the stored state.
    pub fn displayed_frame(&self, now_ms: f64) -> FrameIndex {
        if !self.state.is_playing {
            return self.state.current_frame;
        }
        let origin = CycleOrigin::new(self.state.cycle_origin_ms, self.state.cycle_origin_frame);
        frame_at(now_ms, origin, self.cycle(), self.state.mode)
    }

    /// Scheduled redraw callback. Stale tickets and stopped playback return `None`.
    pub fn tick(&mut self, ticket: TickTicket, now_ms: f64) -> Option<FrameIndex> {
        if ticket.generation != self.generation
            || !self.state.is_playing
            || self.active_sheet().is_none()
        {
            return None;
        }
        let frame = self.displayed_frame(now_ms);
        self.state.current_frame = frame;
        Some(frame)
    }

    /// Jump to `frame`. While playing, the cycle continues from there.
    pub fn seek(&mut self, frame: FrameIndex, now_ms: f64) -> SheetResult<()> {
        let total = self.grid.total_frames();
        if frame.0 >= total {
            return Err(SheetError::validation(format!(
                "frame {} out of range (0..{total})",
                frame.0
            )));
        }
        self.state.current_frame = frame;
        if self.state.is_playing {
            self.state.cycle_origin_ms = now_ms;
            self.state.cycle_origin_frame = frame;
        }
        Ok(())
    }

    /// Change the playback mode.
    pub fn set_mode(&mut self, mode: PlaybackMode, now_ms: f64) -> SheetResult<()> {
        self.reconfigure(now_ms, |c| c.state.mode = mode)
    }

    /// Change the grid layout (clamped).
    pub fn set_grid(&mut self, columns: u32, rows: u32, now_ms: f64) -> SheetResult<()> {
        self.reconfigure(now_ms, |c| c.grid = GridConfig::new(columns, rows))
    }

    /// Change the cycle duration (clamped).
    pub fn set_duration(&mut self, seconds: f64, now_ms: f64) -> SheetResult<()> {
        self.reconfigure(now_ms, |c| c.duration_seconds = clamp_duration_secs(seconds))
    }

    /// Toggle horizontal mirroring of the preview.
    pub fn set_flip(&mut self, flip_horizontal: bool) {
        self.transform = RenderTransform::new(flip_horizontal, self.transform.scale_percent());
    }

    /// Change the preview zoom (clamped).
    pub fn set_scale_percent(&mut self, scale_percent: u32) {
        self.transform = self.transform.with_scale_percent(scale_percent);
    }

    /// Draw the frame visible at `now_ms` into `target`.
    pub fn render_current(&self, now_ms: f64, target: &mut Surface) -> SheetResult<FrameIndex> {
        let sheet = self
            .active_sheet()
            .ok_or_else(|| SheetError::validation("no sprite sheet loaded"))?;
        let frame = self.displayed_frame(now_ms);
        let rect = FrameGeometry::new(self.grid, sheet.dimensions()).rect(frame);
        render_frame(target, sheet, rect, self.transform)?;
        Ok(frame)
    }

    /// Export one cycle of the current configuration on a background thread.
    ///
    /// Grid, duration and mode changes return [`SheetError::Busy`] until the export finishes.
    pub fn start_export(
        &mut self,
        opts: ExportOpts,
        encoder: Box<dyn FrameEncoder>,
    ) -> SheetResult<ExportHandle> {
        let sheet = self
            .active_sheet()
            .cloned()
            .ok_or_else(|| SheetError::validation("no sprite sheet loaded"))?;
        let guard = self
            .exporting
            .try_acquire()
            .ok_or_else(|| SheetError::busy("an export is already running"))?;

        let req = ExportRequest::new(
            sheet,
            self.grid,
            self.duration_seconds,
            self.state.mode,
            self.transform.flip_horizontal,
        );
        let cancel = CancelToken::new();
        self.export_cancel = Some(cancel.clone());
        spawn_export_guarded(req, opts, encoder, cancel, Some(guard))
    }

    /// Stop scheduling and cancel any in-flight export. Outstanding tickets become no-ops.
    pub fn shutdown(&mut self) {
        self.state.is_playing = false;
        self.invalidate_ticks();
        if let Some(cancel) = self.export_cancel.take() {
            cancel.cancel();
        }
    }

    fn reset_for_new_sheet(&mut self) {
        self.state.is_playing = false;
        self.state.current_frame = FrameIndex(0);
        self.state.cycle_origin_frame = FrameIndex(0);
        self.invalidate_ticks();
    }

    fn invalidate_ticks(&mut self) {
        self.generation += 1;
        tracing::debug!(generation = self.generation, "tick tickets invalidated");
    }

    #[tracing::instrument(level = "debug", skip(self, apply))]
    fn reconfigure(&mut self, now_ms: f64, apply: impl FnOnce(&mut Self)) -> SheetResult<()> {
        if self.exporting.is_set() {
            return Err(SheetError::busy(
                "configuration is locked while an export is running",
            ));
        }
        let shown = self.displayed_frame(now_ms);
        apply(self);

        let frame = self.grid.wrap(u64::from(shown.0));
        self.state.current_frame = frame;
        if self.state.is_playing {
            self.state.cycle_origin_ms = now_ms;
            self.state.cycle_origin_frame = frame;
            tracing::debug!(frame = frame.0, now_ms, "cycle origin re-anchored");
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/controller.rs"]
mod tests;
