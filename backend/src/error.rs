//! Error handling for the Evacuation Map Platform
//!
//! Provides consistent JSON error responses for the map API

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shared::GeoError;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Validation errors
    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),

    // Zone retrieval errors
    #[error("Failed to fetch evacuation zones: {0}")]
    ZoneListingFailed(String),

    #[error("Server is shutting down")]
    ShuttingDown,

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<GeoError> for AppError {
    fn from(err: GeoError) -> Self {
        AppError::InvalidCoordinate(err.to_string())
    }
}

/// Failure reported by a zone data source
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SourceError {
    /// The store does not offer the proximity query
    #[error("proximity query unavailable: {0}")]
    CapabilityUnavailable(String),

    #[error("{0}")]
    Query(String),
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_detail) = match &self {
            AppError::InvalidCoordinate(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "INVALID_COORDINATE".to_string(),
                    message: msg.clone(),
                    field: Some("lat,lng".to_string()),
                },
            ),
            AppError::ZoneListingFailed(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorDetail {
                    code: "ZONE_LISTING_FAILED".to_string(),
                    message: msg.clone(),
                    field: None,
                },
            ),
            AppError::ShuttingDown => (
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorDetail {
                    code: "SHUTTING_DOWN".to_string(),
                    message: "Server is shutting down".to_string(),
                    field: None,
                },
            ),
            AppError::Configuration(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "CONFIGURATION_ERROR".to_string(),
                    message: format!("Configuration error: {}", msg),
                    field: None,
                },
            ),
        };

        if status.is_server_error() {
            tracing::error!("Error: {:?}", self);
        } else {
            tracing::debug!("Rejected request: {}", self);
        }

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
