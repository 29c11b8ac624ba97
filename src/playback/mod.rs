//! Live playback: modes, the pure sampling clock, the state-owning controller, and a
//! background ticker for hosts without their own redraw loop.

/// Pure elapsed-time -> frame mapping.
pub mod clock;
/// Owner of playback state and the documented reset rules.
pub mod controller;
/// Playback modes.
pub mod mode;
/// Interval-driven tick thread.
pub mod ticker;
