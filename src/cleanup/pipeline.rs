use crate::error::VisionError;
use image::{DynamicImage, GrayImage, RgbImage};
use serde::Serialize;
use std::time::Instant;

use super::element::StructuringElement;
use super::steps;

/// Immutable cleanup parameters, fixed for the lifetime of a pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CleanupConfig {
    /// Binarization threshold; samples strictly above it are line pixels
    pub threshold: u8,
    /// Minimum 8-connected component area kept by the speckle filter
    pub min_area: u32,
    /// Kernel for the single dilation pass
    pub element: StructuringElement,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            threshold: steps::threshold::DEFAULT_THRESHOLD,
            min_area: steps::speckle::DEFAULT_MIN_AREA,
            element: StructuringElement::LINE,
        }
    }
}

/// Timing information for a single cleanup step
#[derive(Debug, Clone, Serialize)]
pub struct StepTiming {
    pub name: String,
    pub time_ms: u64,
}

/// Result of a cleanup run including timing stats
#[derive(Debug, Clone, Serialize)]
pub struct CleanupResult {
    /// Canonical 3-channel raster (not serialized)
    #[serde(skip)]
    pub image: RgbImage,
    /// Total cleanup time in milliseconds
    pub total_time_ms: u64,
    pub threshold: u8,
    pub min_area: u32,
    /// 8-connected components after binarization
    pub components_before: usize,
    /// Components that survived the speckle filter
    pub components_after: usize,
    /// Individual step timings
    pub steps: Vec<StepTiming>,
}

/// Four-stage line-art cleanup: grayscale, threshold, speckle, condition
pub struct Pipeline {
    config: CleanupConfig,
}

impl Pipeline {
    pub fn new(config: CleanupConfig) -> Self {
        Self { config }
    }

    /// Turn a line-probability raster into canonical dark-on-light line art.
    ///
    /// Fails only when the input has zero area; every stage is total
    /// over non-empty rasters.
    pub fn process(&self, image: &DynamicImage) -> Result<CleanupResult, VisionError> {
        let (width, height) = (image.width(), image.height());
        if width == 0 || height == 0 {
            return Err(VisionError::EmptyImage { width, height });
        }

        let start = Instant::now();
        let mut timings = Vec::new();
        let config = &self.config;

        let gray = run_step("grayscale", image, &mut timings, steps::grayscale::apply);
        let binary = run_step("threshold", &gray, &mut timings, |g| {
            steps::threshold::apply(g, config.threshold)
        });
        let speckle = run_step("speckle", &binary, &mut timings, |m| {
            steps::speckle::apply(m, config.min_area)
        });
        let (components_before, components_after) =
            (speckle.components_before, speckle.components_after);
        let canonical = run_step("condition", &speckle.mask, &mut timings, |m| {
            steps::condition::apply(m, &config.element)
        });

        tracing::debug!(
            width,
            height,
            components_before,
            components_after,
            "Cleanup finished"
        );

        Ok(CleanupResult {
            image: to_rgb(&canonical),
            total_time_ms: start.elapsed().as_millis() as u64,
            threshold: config.threshold,
            min_area: config.min_area,
            components_before,
            components_after,
            steps: timings,
        })
    }
}

/// Output adapter: replicate the single canonical channel into RGB.
/// All three channels are always equal.
pub fn to_rgb(gray: &GrayImage) -> RgbImage {
    DynamicImage::ImageLuma8(gray.clone()).to_rgb8()
}

fn run_step<I, O, F>(name: &str, input: I, timings: &mut Vec<StepTiming>, step_fn: F) -> O
where
    F: FnOnce(I) -> O,
{
    let step_start = Instant::now();
    let result = step_fn(input);
    let time_ms = step_start.elapsed().as_millis() as u64;
    tracing::trace!(step = name, time_ms, "Cleanup step done");
    timings.push(StepTiming {
        name: name.to_string(),
        time_ms,
    });
    result
}
