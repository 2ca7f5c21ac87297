use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cleanup;
mod config;
mod detector;
mod detectors;
mod encode;
mod error;
mod server;
mod vectorize;

#[derive(Parser, Debug)]
#[command(name = "lineart-cleanup-server")]
#[command(about = "Turns line-detection masks into clean, canonical line art")]
#[command(version)]
pub struct Args {
    /// Host address to bind to
    #[arg(long, env = "LINEART_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "LINEART_PORT", default_value = "7860")]
    pub port: u16,

    /// Maximum upload size in bytes (default: 50MB)
    #[arg(long, env = "LINEART_MAX_FILE_SIZE", default_value = "52428800")]
    pub max_file_size: usize,

    /// Binarization threshold; mask samples strictly above it are lines
    #[arg(long, env = "LINEART_THRESHOLD", default_value = "200")]
    pub threshold: u8,

    /// Minimum line component area in pixels; smaller specks are removed
    #[arg(long, env = "LINEART_MIN_AREA", default_value = "20")]
    pub min_area: u32,

    /// Line detector used by POST /process ("mask" or "sobel")
    #[arg(long, env = "LINEART_DETECTOR", default_value = "mask")]
    pub default_detector: String,

    /// SVG tracing: binary or color clustering
    #[arg(long, env = "LINEART_TRACE_COLOR_MODE", value_enum, default_value = "binary")]
    pub trace_color_mode: vectorize::ColorMode,

    /// SVG tracing: cutout (no overlaps) or stacked shapes
    #[arg(long, env = "LINEART_TRACE_HIERARCHICAL", value_enum, default_value = "cutout")]
    pub trace_hierarchical: vectorize::Hierarchical,

    /// SVG tracing: spline, polygon or pixel curve fitting
    #[arg(long, env = "LINEART_TRACE_CURVE_MODE", value_enum, default_value = "spline")]
    pub trace_curve_mode: vectorize::CurveMode,

    /// SVG tracing: discard traced patches smaller than this many pixels
    #[arg(long, env = "LINEART_TRACE_FILTER_SPECKLE", default_value = "20")]
    pub trace_filter_speckle: usize,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| args.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = config::Config::from(args);

    tracing::info!(
        "Starting lineart-cleanup-server v{}",
        env!("CARGO_PKG_VERSION")
    );
    tracing::info!(
        "Cleanup defaults: threshold={}, min_area={}",
        config.cleanup.threshold,
        config.cleanup.min_area
    );
    tracing::info!("Binding to {}:{}", config.host, config.port);

    server::run(config).await
}
