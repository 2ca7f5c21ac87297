//! Sobel edge-strength detector
//!
//! Classical stand-in for a learned line detector: edge magnitude is used as
//! the line probability, so strong contours come out bright.

use crate::detector::LineDetector;
use crate::error::VisionError;
use image::{DynamicImage, GrayImage, Luma};
use imageproc::filter::gaussian_blur_f32;
use imageproc::gradients::sobel_gradients;

/// Pre-smoothing applied in coarse mode
const COARSE_SIGMA: f32 = 1.5;

pub struct SobelDetector;

impl LineDetector for SobelDetector {
    fn name(&self) -> &'static str {
        "sobel"
    }

    fn description(&self) -> &'static str {
        "Sobel gradient magnitude as line probability (coarse mode pre-blurs)"
    }

    fn detect(&self, image: &DynamicImage, coarse: bool) -> Result<DynamicImage, VisionError> {
        let mut gray = image.to_luma8();
        if coarse {
            gray = gaussian_blur_f32(&gray, COARSE_SIGMA);
        }

        let gradients = sobel_gradients(&gray);
        let strength = GrayImage::from_fn(gray.width(), gray.height(), |x, y| {
            let magnitude = gradients.get_pixel(x, y).0[0];
            Luma([magnitude.min(u8::MAX as u16) as u8])
        });

        Ok(DynamicImage::ImageLuma8(strength))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn max_value(image: &DynamicImage) -> u8 {
        image.to_luma8().pixels().map(|p| p.0[0]).max().unwrap_or(0)
    }

    #[test]
    fn test_sobel_highlights_edges() {
        // Left half dark, right half light
        let img = GrayImage::from_fn(20, 10, |x, _| Luma([if x < 10 { 0 } else { 255 }]));
        let lines = SobelDetector
            .detect(&DynamicImage::ImageLuma8(img), false)
            .unwrap()
            .to_luma8();

        assert_eq!(lines.get_pixel(10, 5).0[0], 255);
        assert_eq!(lines.get_pixel(2, 5).0[0], 0);
        assert_eq!(lines.get_pixel(17, 5).0[0], 0);
    }

    #[test]
    fn test_coarse_mode_suppresses_isolated_pixels() {
        let mut img = GrayImage::new(21, 21);
        img.put_pixel(10, 10, Luma([255]));
        let input = DynamicImage::ImageLuma8(img);

        let fine = SobelDetector.detect(&input, false).unwrap();
        let coarse = SobelDetector.detect(&input, true).unwrap();

        assert_eq!(max_value(&fine), 255);
        assert!(max_value(&coarse) < max_value(&fine));
    }

    #[test]
    fn test_sobel_preserves_dimensions() {
        let img = DynamicImage::ImageLuma8(GrayImage::new(33, 17));
        let out = SobelDetector.detect(&img, true).unwrap();
        assert_eq!((out.width(), out.height()), (33, 17));
    }
}
