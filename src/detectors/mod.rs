//! Line detector implementations
//!
//! This module contains implementations of the LineDetector trait. All
//! detectors are pure Rust and always compiled in.

pub mod mask;
pub mod sobel;

use crate::detector::LineDetector;
use crate::error::VisionError;
use std::sync::Arc;

/// Information about an available detector
#[derive(Debug, Clone)]
pub struct DetectorInfo {
    pub name: &'static str,
    pub description: &'static str,
}

/// Registry of available line detectors
pub struct DetectorRegistry {
    detectors: Vec<Arc<dyn LineDetector>>,
    default_detector: String,
}

impl DetectorRegistry {
    /// Create a registry with every detector, using `default_name` as default
    pub fn new(default_name: &str) -> Result<Self, VisionError> {
        let detectors: Vec<Arc<dyn LineDetector>> =
            vec![Arc::new(mask::MaskDetector), Arc::new(sobel::SobelDetector)];

        if !detectors.iter().any(|d| d.name() == default_name) {
            return Err(VisionError::InitializationError(format!(
                "Unknown default detector '{}' (available: {})",
                default_name,
                detectors
                    .iter()
                    .map(|d| d.name())
                    .collect::<Vec<_>>()
                    .join(", ")
            )));
        }

        for detector in &detectors {
            tracing::info!("Registered line detector: {}", detector.name());
        }

        Ok(Self {
            detectors,
            default_detector: default_name.to_string(),
        })
    }

    /// Get a detector by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn LineDetector>> {
        self.detectors.iter().find(|d| d.name() == name).cloned()
    }

    /// Get the default detector
    pub fn default(&self) -> Option<Arc<dyn LineDetector>> {
        self.get(&self.default_detector)
    }

    /// Get the default detector name
    pub fn default_name(&self) -> &str {
        &self.default_detector
    }

    /// Get info about all available detectors
    pub fn info(&self) -> Vec<DetectorInfo> {
        self.detectors
            .iter()
            .map(|d| DetectorInfo {
                name: d.name(),
                description: d.description(),
            })
            .collect()
    }
}
