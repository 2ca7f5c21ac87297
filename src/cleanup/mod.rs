//! Line-art cleanup
//!
//! Turns a line-probability raster (bright = line) into canonical binary
//! line art (dark lines on light paper) ready for encoding and tracing.

pub mod element;
pub mod mask;
pub mod pipeline;
pub mod steps;

pub use element::StructuringElement;
pub use mask::BinaryMask;
pub use pipeline::{CleanupConfig, CleanupResult, Pipeline};
