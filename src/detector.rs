use crate::error::VisionError;
use image::DynamicImage;

/// Trait that all line detectors must implement.
///
/// A detector turns an arbitrary upload into a line-probability raster where
/// bright pixels mean "line". Detectors are built once at startup and shared
/// read-only across requests.
pub trait LineDetector: Send + Sync {
    /// Returns the detector identifier (e.g., "mask", "sobel")
    fn name(&self) -> &'static str;

    /// Returns a human-readable description of the detector
    fn description(&self) -> &'static str;

    /// Produce a white-lines-on-black probability raster.
    /// `coarse` asks for fewer, stronger lines.
    fn detect(&self, image: &DynamicImage, coarse: bool) -> Result<DynamicImage, VisionError>;
}
