pub mod engine;
pub mod region;

pub use engine::{Analysis, analyze, to_grayscale};
pub use region::{IntensityWindow, Region};
