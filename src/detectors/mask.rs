//! Pass-through detector
//!
//! For clients that run the line-detection model themselves and upload its
//! probability mask directly.

use crate::detector::LineDetector;
use crate::error::VisionError;
use image::DynamicImage;

pub struct MaskDetector;

impl LineDetector for MaskDetector {
    fn name(&self) -> &'static str {
        "mask"
    }

    fn description(&self) -> &'static str {
        "Upload is already a line-probability mask (white lines on black)"
    }

    fn detect(&self, image: &DynamicImage, _coarse: bool) -> Result<DynamicImage, VisionError> {
        Ok(image.clone())
    }
}
