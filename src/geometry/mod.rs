/// Frame rectangles derived from sheet size and grid layout.
pub mod grid;
