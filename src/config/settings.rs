use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::Context as _;

use crate::foundation::core::{
    CycleConfig, GridConfig, clamp_duration_secs, clamp_grid_count, clamp_scale_percent,
};
use crate::foundation::error::{SheetError, SheetResult};
use crate::playback::mode::PlaybackMode;
use crate::render::frame::RenderTransform;

/// Preview/export settings as users write them (JSON).
///
/// Out-of-range values are clamped on load rather than rejected.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PreviewSettings {
    /// Grid columns, `[1, 50]`.
    pub columns: u32,
    /// Grid rows, `[1, 50]`.
    pub rows: u32,
    /// Cycle duration in seconds, `[0.1, 5.0]`.
    pub duration_seconds: f64,
    /// Playback mode.
    pub mode: PlaybackMode,
    /// Mirror frames horizontally.
    pub flip_horizontal: bool,
    /// Preview zoom in percent, `[10, 500]`.
    pub scale_percent: u32,
}

impl Default for PreviewSettings {
    fn default() -> Self {
        Self {
            columns: 4,
            rows: 4,
            duration_seconds: 2.0,
            mode: PlaybackMode::Forward,
            flip_horizontal: false,
            scale_percent: 100,
        }
    }
}

impl PreviewSettings {
    /// Parse settings JSON and clamp it.
    pub fn from_json_str(s: &str) -> SheetResult<Self> {
        let parsed: Self = serde_json::from_str(s)
            .map_err(|e| SheetError::validation(format!("invalid settings JSON: {e}")))?;
        Ok(parsed.clamped())
    }

    /// Read settings JSON from `path` and clamp it.
    pub fn from_path(path: &Path) -> SheetResult<Self> {
        let f = File::open(path)
            .with_context(|| format!("open settings '{}'", path.display()))?;
        let parsed: Self = serde_json::from_reader(BufReader::new(f)).map_err(|e| {
            SheetError::validation(format!("invalid settings '{}': {e}", path.display()))
        })?;
        Ok(parsed.clamped())
    }

    /// Copy with every value moved into its accepted range.
    pub fn clamped(&self) -> Self {
        Self {
            columns: clamp_grid_count(self.columns),
            rows: clamp_grid_count(self.rows),
            duration_seconds: clamp_duration_secs(self.duration_seconds),
            mode: self.mode,
            flip_horizontal: self.flip_horizontal,
            scale_percent: clamp_scale_percent(self.scale_percent),
        }
    }

    /// Grid layout.
    pub fn grid(&self) -> GridConfig {
        GridConfig::new(self.columns, self.rows)
    }

    /// Cycle timing for [`PreviewSettings::grid`].
    pub fn cycle(&self) -> CycleConfig {
        CycleConfig::new(self.duration_seconds, self.grid().total_frames())
    }

    /// Draw-time transform.
    pub fn transform(&self) -> RenderTransform {
        RenderTransform::new(self.flip_horizontal, self.scale_percent)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/settings.rs"]
mod tests;
