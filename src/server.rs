use crate::cleanup::{CleanupConfig, CleanupResult, Pipeline};
use crate::config::Config;
use crate::detector::LineDetector;
use crate::detectors::DetectorRegistry;
use crate::encode::OutputFormat;
use crate::error::VisionError;
use crate::vectorize::{self, TracerOptions, Vectorizer};
use axum::{
    body::Bytes,
    extract::{multipart::MultipartError, DefaultBodyLimit, Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Room for multipart boundaries and text fields on top of the file itself
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub detectors: Arc<DetectorRegistry>,
    pub vectorizer: Arc<dyn Vectorizer>,
    pub config: Arc<Config>,
}

/// Processing response
#[derive(Serialize)]
pub struct ProcessResponse {
    /// Canonical line art as a data URL
    pub image: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub svg: Option<String>,
    pub detector: String,
    pub width: u32,
    pub height: u32,
    pub processing_time_ms: u64,
    pub cleanup: CleanupResult,
    pub warnings: Vec<String>,
}

/// Root status response
#[derive(Serialize)]
pub struct StatusResponse {
    pub status: String,
    pub detector: String,
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Serialize)]
pub struct DetectorInfoResponse {
    pub name: String,
    pub description: String,
}

#[derive(Serialize)]
pub struct CleanupDefaults {
    pub threshold: u8,
    pub min_area: u32,
}

/// Server info response
#[derive(Serialize)]
pub struct InfoResponse {
    pub version: String,
    pub default_detector: String,
    pub available_detectors: Vec<DetectorInfoResponse>,
    pub vectorizer: String,
    pub max_file_size_bytes: usize,
    pub cleanup_defaults: CleanupDefaults,
    pub tracer: TracerOptions,
}

/// Form fields of a processing request
struct ProcessForm {
    data: Bytes,
    content_type: String,
    model_type: String,
    output_format: OutputFormat,
    threshold: Option<u8>,
    min_area: Option<u32>,
    warnings: Vec<String>,
}

/// Run the HTTP server
pub async fn run(config: Config) -> anyhow::Result<()> {
    let detectors = DetectorRegistry::new(&config.default_detector)?;
    let vectorizer = vectorize::default_vectorizer();
    tracing::info!("Vectorizer backend: {}", vectorizer.name());

    let addr = format!("{}:{}", config.host, config.port);
    let state = AppState {
        detectors: Arc::new(detectors),
        vectorizer,
        config: Arc::new(config),
    };

    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    let max_file_size = state.config.max_file_size;

    Router::new()
        .route("/", get(handle_status))
        .route("/process", post(handle_process))
        .route("/process/:detector", post(handle_process_with_detector))
        .route("/health", get(handle_health))
        .route("/info", get(handle_info))
        .layer(DefaultBodyLimit::max(max_file_size.saturating_add(MULTIPART_OVERHEAD)))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Handle processing with the default detector
async fn handle_process(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ProcessResponse>, VisionError> {
    let detector = state
        .detectors
        .default()
        .ok_or_else(|| VisionError::Internal("Default detector missing".to_string()))?;
    process(state, detector, multipart).await
}

/// Handle processing with an explicitly named detector
async fn handle_process_with_detector(
    State(state): State<AppState>,
    Path(name): Path<String>,
    multipart: Multipart,
) -> Result<Json<ProcessResponse>, VisionError> {
    let detector = state
        .detectors
        .get(&name)
        .ok_or(VisionError::UnknownDetector(name))?;
    process(state, detector, multipart).await
}

async fn process(
    state: AppState,
    detector: Arc<dyn LineDetector>,
    multipart: Multipart,
) -> Result<Json<ProcessResponse>, VisionError> {
    let start = Instant::now();
    let form = read_form(multipart, state.config.max_file_size).await?;

    if form.data.len() > state.config.max_file_size {
        return Err(VisionError::ImageTooLarge {
            size: form.data.len(),
            max: state.config.max_file_size,
        });
    }

    if !form.content_type.starts_with("image/") {
        tracing::warn!("Received file with content type: {}", form.content_type);
    }

    let input = image::load_from_memory(&form.data)
        .map_err(|e| VisionError::DecodeError(e.to_string()))?;

    let cleanup = CleanupConfig {
        threshold: form.threshold.unwrap_or(state.config.cleanup.threshold),
        min_area: form.min_area.unwrap_or(state.config.cleanup.min_area),
        ..state.config.cleanup
    };
    let coarse = form.model_type == "anime";
    let output_format = form.output_format;
    let vectorizer = Arc::clone(&state.vectorizer);
    let tracer = state.config.tracer.clone();
    let detector_name = detector.name();
    let form_warnings = form.warnings;

    // Detection, cleanup, encoding and tracing are CPU-bound
    let (result, image, svg, warnings) = tokio::task::spawn_blocking(move || {
        let lines = detector.detect(&input, coarse)?;
        let result = Pipeline::new(cleanup).process(&lines)?;
        let image = output_format.encode_data_url(&result.image)?;

        let mut warnings = form_warnings;
        let svg = if output_format.wants_vector() {
            vectorize::trace_or_warn(vectorizer.as_ref(), &result.image, &tracer, &mut warnings)
        } else {
            None
        };

        Ok::<_, VisionError>((result, image, svg, warnings))
    })
    .await
    .map_err(|e| VisionError::Internal(format!("Processing task failed: {}", e)))??;

    let processing_time_ms = start.elapsed().as_millis() as u64;
    let (width, height) = result.image.dimensions();

    tracing::info!(
        "Processed {}x{} with '{}' in {}ms, components: {} -> {}, svg: {}",
        width,
        height,
        detector_name,
        processing_time_ms,
        result.components_before,
        result.components_after,
        svg.is_some()
    );

    Ok(Json(ProcessResponse {
        image,
        svg,
        detector: detector_name.to_string(),
        width,
        height,
        processing_time_ms,
        cleanup: result,
        warnings,
    }))
}

/// Parse the multipart form
async fn read_form(mut multipart: Multipart, max_file_size: usize) -> Result<ProcessForm, VisionError> {
    let mut file_data: Option<Bytes> = None;
    let mut content_type: Option<String> = None;
    let mut model_type: Option<String> = None;
    let mut output_format = OutputFormat::default();
    let mut threshold: Option<u8> = None;
    let mut min_area: Option<u32> = None;
    let mut warnings = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, max_file_size, "Failed to parse multipart"))?
    {
        let name = field.name().unwrap_or_default().to_string();

        match name.as_str() {
            "file" => {
                content_type = field.content_type().map(|s| s.to_string());
                file_data = Some(
                    field
                        .bytes()
                        .await
                        .map_err(|e| multipart_error(e, max_file_size, "Failed to read file data"))?,
                );
            }
            "model_type" => {
                model_type = Some(text_field(field, "model_type").await?);
            }
            "output_format" => {
                let value = text_field(field, "output_format").await?;
                output_format = OutputFormat::from_str(&value).unwrap_or_else(|| {
                    tracing::warn!("Unknown output_format '{}', falling back to webp", value);
                    warnings.push(format!("Unknown output_format '{}', returned webp", value));
                    OutputFormat::default()
                });
            }
            "threshold" => {
                let value = text_field(field, "threshold").await?;
                threshold = Some(value.trim().parse().map_err(|_| {
                    VisionError::InvalidRequest(format!("threshold must be 0-255, got {}", value))
                })?);
            }
            "min_area" => {
                let value = text_field(field, "min_area").await?;
                min_area = Some(value.trim().parse().map_err(|_| {
                    VisionError::InvalidRequest(format!("Invalid min_area: {}", value))
                })?);
            }
            _ => {
                // Ignore unknown fields
            }
        }
    }

    Ok(ProcessForm {
        data: file_data.ok_or(VisionError::MissingFile)?,
        content_type: content_type.unwrap_or_else(|| "application/octet-stream".to_string()),
        model_type: model_type.unwrap_or_else(|| "anime".to_string()),
        output_format,
        threshold,
        min_area,
        warnings,
    })
}

/// Bodies cut off by the request limit are reported as oversized uploads
fn multipart_error(e: MultipartError, max_file_size: usize, context: &str) -> VisionError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        VisionError::BodyTooLarge { max: max_file_size }
    } else {
        VisionError::InvalidRequest(format!("{}: {}", context, e))
    }
}

async fn text_field(
    field: axum::extract::multipart::Field<'_>,
    name: &str,
) -> Result<String, VisionError> {
    field
        .text()
        .await
        .map_err(|e| VisionError::InvalidRequest(format!("Invalid {}: {}", name, e)))
}

/// Handle root status requests
async fn handle_status(State(state): State<AppState>) -> impl IntoResponse {
    Json(StatusResponse {
        status: "Line-art cleanup server online".to_string(),
        detector: state.detectors.default_name().to_string(),
    })
}

/// Handle health check requests
async fn handle_health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Handle info requests
async fn handle_info(State(state): State<AppState>) -> impl IntoResponse {
    Json(InfoResponse {
        version: env!("CARGO_PKG_VERSION").to_string(),
        default_detector: state.detectors.default_name().to_string(),
        available_detectors: state
            .detectors
            .info()
            .into_iter()
            .map(|d| DetectorInfoResponse {
                name: d.name.to_string(),
                description: d.description.to_string(),
            })
            .collect(),
        vectorizer: state.vectorizer.name().to_string(),
        max_file_size_bytes: state.config.max_file_size,
        cleanup_defaults: CleanupDefaults {
            threshold: state.config.cleanup.threshold,
            min_area: state.config.cleanup.min_area,
        },
        tracer: state.config.tracer.clone(),
    })
}
