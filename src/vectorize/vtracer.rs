//! vtracer backend
//!
//! Pure Rust raster-to-SVG tracing via the visioncortex toolkit.

use super::{ColorMode, CurveMode, Hierarchical, TracerOptions, Vectorizer};
use crate::error::VisionError;
use image::{DynamicImage, RgbImage};
use visioncortex::{ColorImage, PathSimplifyMode};

pub struct VtracerVectorizer;

impl Vectorizer for VtracerVectorizer {
    fn name(&self) -> &'static str {
        "vtracer"
    }

    fn trace(&self, image: &RgbImage, options: &TracerOptions) -> Result<String, VisionError> {
        let rgba = DynamicImage::ImageRgb8(image.clone()).into_rgba8();
        let (width, height) = rgba.dimensions();
        let color_image = ColorImage {
            pixels: rgba.into_raw(),
            width: width as usize,
            height: height as usize,
        };

        let svg = ::vtracer::convert(color_image, to_config(options))
            .map_err(VisionError::VectorizationError)?;

        Ok(svg.to_string())
    }
}

fn to_config(options: &TracerOptions) -> ::vtracer::Config {
    ::vtracer::Config {
        color_mode: match options.color_mode {
            ColorMode::Binary => ::vtracer::ColorMode::Binary,
            ColorMode::Color => ::vtracer::ColorMode::Color,
        },
        hierarchical: match options.hierarchical {
            Hierarchical::Cutout => ::vtracer::Hierarchical::Cutout,
            Hierarchical::Stacked => ::vtracer::Hierarchical::Stacked,
        },
        filter_speckle: options.filter_speckle,
        color_precision: options.color_precision,
        layer_difference: options.layer_difference,
        mode: match options.curve_mode {
            CurveMode::Spline => PathSimplifyMode::Spline,
            CurveMode::Polygon => PathSimplifyMode::Polygon,
            CurveMode::Pixel => PathSimplifyMode::None,
        },
        corner_threshold: options.corner_threshold,
        length_threshold: options.length_threshold,
        max_iterations: options.max_iterations,
        splice_threshold: options.splice_threshold,
        path_precision: Some(options.path_precision),
    }
}
