use crate::cleanup::CleanupConfig;
use crate::vectorize::TracerOptions;
use crate::Args;

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub max_file_size: usize,
    pub default_detector: String,
    /// Cleanup defaults; requests may override threshold and min area
    pub cleanup: CleanupConfig,
    pub tracer: TracerOptions,
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Self {
            host: args.host,
            port: args.port,
            max_file_size: args.max_file_size,
            default_detector: args.default_detector,
            cleanup: CleanupConfig {
                threshold: args.threshold,
                min_area: args.min_area,
                ..CleanupConfig::default()
            },
            tracer: TracerOptions {
                color_mode: args.trace_color_mode,
                hierarchical: args.trace_hierarchical,
                curve_mode: args.trace_curve_mode,
                filter_speckle: args.trace_filter_speckle,
                ..TracerOptions::default()
            },
        }
    }
}
