use crate::foundation::error::SheetError;

/// Direction in which the grid is traversed.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackMode {
    /// `0, 1, .., n-1, 0, ..`
    #[default]
    Forward,
    /// `n-1, .., 1, 0, n-1, ..`
    Reverse,
    /// `0, 1, .., n-1, n-2, .., 1, 0, 1, ..` without repeating the endpoints.
    #[serde(alias = "ping-pong", alias = "ping_pong")]
    PingPong,
}

impl PlaybackMode {
    /// Every mode, in display order.
    pub const ALL: [PlaybackMode; 3] = [Self::Forward, Self::Reverse, Self::PingPong];

    /// Stable lowercase name, matching the settings file spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Forward => "forward",
            Self::Reverse => "reverse",
            Self::PingPong => "pingpong",
        }
    }

    /// Frames in one full cycle of this mode for a grid of `total_frames`.
    pub fn cycle_len(self, total_frames: u32) -> u32 {
        match self {
            Self::Forward | Self::Reverse => total_frames,
            Self::PingPong if total_frames <= 1 => total_frames,
            Self::PingPong => (total_frames - 1) * 2,
        }
    }
}

impl std::fmt::Display for PlaybackMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PlaybackMode {
    type Err = SheetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "forward" => Ok(Self::Forward),
            "reverse" => Ok(Self::Reverse),
            "pingpong" | "ping-pong" | "ping_pong" => Ok(Self::PingPong),
            other => Err(SheetError::validation(format!(
                "unknown playback mode '{other}' (expected forward, reverse or pingpong)"
            ))),
        }
    }
}
