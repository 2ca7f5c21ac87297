//! Individual cleanup steps

pub mod condition;
pub mod grayscale;
pub mod speckle;
pub mod threshold;
