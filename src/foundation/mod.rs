/// Core value types shared by every stage: grid, frame index, cycle timing.
pub mod core;
/// Error taxonomy and result alias.
pub mod error;
