//! Encoding collaborators.
//!
//! Encoders receive the extracted frames of one export cycle in sequence order and produce a
//! single binary artifact.

/// Animated GIF encoder built on `image::codecs::gif`.
pub mod gif;
/// Generic encoder trait and built-in encoders.
pub mod sink;
