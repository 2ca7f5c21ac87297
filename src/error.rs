use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VisionError {
    #[error("Failed to initialize line detector: {0}")]
    InitializationError(String),

    #[error("Failed to decode image: {0}")]
    DecodeError(String),

    #[error("Image has zero area ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },

    #[error("Failed to encode image: {0}")]
    EncodingError(String),

    #[cfg_attr(not(feature = "tracer-vtracer"), allow(dead_code))]
    #[error("Vectorization failed: {0}")]
    VectorizationError(String),

    #[error("No vectorizer compiled in (build with --features tracer-vtracer)")]
    VectorizationUnavailable,

    #[error("Image too large: {size} bytes (max: {max} bytes)")]
    ImageTooLarge { size: usize, max: usize },

    #[error("Request body too large (max: {max} bytes)")]
    BodyTooLarge { max: usize },

    #[error("Unknown line detector: {0}")]
    UnknownDetector(String),

    #[error("Missing file in request")]
    MissingFile,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl VisionError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            VisionError::InitializationError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INIT_ERROR"),
            VisionError::DecodeError(_) => (StatusCode::BAD_REQUEST, "DECODE_ERROR"),
            VisionError::EmptyImage { .. } => (StatusCode::BAD_REQUEST, "EMPTY_IMAGE"),
            VisionError::EncodingError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "ENCODING_ERROR"),
            VisionError::VectorizationError(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "VECTORIZATION_ERROR")
            }
            VisionError::VectorizationUnavailable => {
                (StatusCode::NOT_IMPLEMENTED, "VECTORIZATION_UNAVAILABLE")
            }
            VisionError::ImageTooLarge { .. } | VisionError::BodyTooLarge { .. } => {
                (StatusCode::PAYLOAD_TOO_LARGE, "IMAGE_TOO_LARGE")
            }
            VisionError::UnknownDetector(_) => (StatusCode::NOT_FOUND, "UNKNOWN_DETECTOR"),
            VisionError::MissingFile => (StatusCode::BAD_REQUEST, "MISSING_FILE"),
            VisionError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "INVALID_REQUEST"),
            VisionError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for VisionError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let body = Json(ErrorResponse {
            error: self.to_string(),
            code: code.to_string(),
        });

        (status, body).into_response()
    }
}
