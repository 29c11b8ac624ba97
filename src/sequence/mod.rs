/// Ordered frame lists for one full export cycle.
pub mod generator;
