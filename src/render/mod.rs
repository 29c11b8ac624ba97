//! CPU frame rendering.

/// Frame extraction with flip/scale transforms.
pub mod frame;
/// RGBA8 drawing surface.
pub mod surface;
