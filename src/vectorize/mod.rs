//! Vector tracing of canonical line art
//!
//! Tracing is optional: when it fails, or no backend is compiled in, callers
//! keep the raster result and report a warning instead of failing.

#[cfg(feature = "tracer-vtracer")]
pub mod vtracer;

use crate::error::VisionError;
use clap::ValueEnum;
use image::RgbImage;
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    Binary,
    Color,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Hierarchical {
    /// Shapes are cut out of each other, no overlaps
    Cutout,
    Stacked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CurveMode {
    Spline,
    Polygon,
    Pixel,
}

/// Options handed to the tracing backend
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TracerOptions {
    pub color_mode: ColorMode,
    pub hierarchical: Hierarchical,
    pub curve_mode: CurveMode,
    /// Discard traced patches smaller than this many pixels
    pub filter_speckle: usize,
    /// Significant bits per RGB channel
    pub color_precision: i32,
    /// Color distance between gradient layers
    pub layer_difference: i32,
    /// Minimum angle (degrees) to be considered a corner
    pub corner_threshold: i32,
    /// Segments shorter than this are merged
    pub length_threshold: f64,
    pub max_iterations: usize,
    /// Minimum angle displacement (degrees) to splice a spline
    pub splice_threshold: i32,
    /// Decimal places in output coordinates
    pub path_precision: u32,
}

impl Default for TracerOptions {
    fn default() -> Self {
        Self {
            color_mode: ColorMode::Binary,
            hierarchical: Hierarchical::Cutout,
            curve_mode: CurveMode::Spline,
            filter_speckle: 20,
            color_precision: 6,
            layer_difference: 16,
            corner_threshold: 60,
            length_threshold: 5.0,
            max_iterations: 10,
            splice_threshold: 45,
            path_precision: 3,
        }
    }
}

/// Trait that all tracing backends must implement
pub trait Vectorizer: Send + Sync {
    /// Returns the backend identifier
    fn name(&self) -> &'static str;

    /// Trace `image` into an SVG document
    fn trace(&self, image: &RgbImage, options: &TracerOptions) -> Result<String, VisionError>;
}

/// Backend used when no tracer is compiled in; always fails
#[cfg_attr(feature = "tracer-vtracer", allow(dead_code))]
pub struct UnavailableVectorizer;

impl Vectorizer for UnavailableVectorizer {
    fn name(&self) -> &'static str {
        "none"
    }

    fn trace(&self, _image: &RgbImage, _options: &TracerOptions) -> Result<String, VisionError> {
        Err(VisionError::VectorizationUnavailable)
    }
}

/// Pick the best backend available in this build
pub fn default_vectorizer() -> Arc<dyn Vectorizer> {
    #[cfg(feature = "tracer-vtracer")]
    {
        Arc::new(vtracer::VtracerVectorizer)
    }

    #[cfg(not(feature = "tracer-vtracer"))]
    {
        Arc::new(UnavailableVectorizer)
    }
}

/// Run `vectorizer`, turning any failure into a warning message
pub fn trace_or_warn(
    vectorizer: &dyn Vectorizer,
    image: &RgbImage,
    options: &TracerOptions,
    warnings: &mut Vec<String>,
) -> Option<String> {
    match vectorizer.trace(image, options) {
        Ok(svg) => Some(svg),
        Err(e) => {
            tracing::warn!("Vectorization failed ({}): {}", vectorizer.name(), e);
            warnings.push(e.to_string());
            None
        }
    }
}
