//! Domain-specific error types for bizplan

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::generator::GeneratorError;

/// Main error type for plan resolution
#[derive(Error, Debug)]
pub enum PlanError {
    /// The catalog dataset could not be loaded or violates its schema.
    /// Fatal at startup.
    #[error("Data load error: {message}")]
    DataLoad { message: String },

    /// Caller passed a blank industry label.
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    /// The model backend failed after the adapter's bounded retry.
    #[error("Generator unavailable: {message}")]
    GeneratorUnavailable { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Serialization error: {message}")]
    Serialization { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl PlanError {
    /// Short label used in API error bodies
    pub fn label(&self) -> &'static str {
        match self {
            PlanError::DataLoad { .. } => "data_load",
            PlanError::InvalidRequest { .. } => "invalid_request",
            PlanError::GeneratorUnavailable { .. } => "generator_unavailable",
            PlanError::Config { .. } => "config",
            PlanError::Serialization { .. } => "serialization",
            PlanError::Internal { .. } => "internal",
        }
    }

    fn details(&self) -> &str {
        match self {
            PlanError::DataLoad { message }
            | PlanError::InvalidRequest { message }
            | PlanError::GeneratorUnavailable { message }
            | PlanError::Config { message }
            | PlanError::Serialization { message }
            | PlanError::Internal { message } => message,
        }
    }

    /// HTTP status for the API surface
    pub fn status_code(&self) -> StatusCode {
        match self {
            PlanError::InvalidRequest { .. } => StatusCode::BAD_REQUEST,
            PlanError::GeneratorUnavailable { .. } => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<anyhow::Error> for PlanError {
    fn from(err: anyhow::Error) -> Self {
        PlanError::Internal {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for PlanError {
    fn from(err: serde_json::Error) -> Self {
        PlanError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<csv::Error> for PlanError {
    fn from(err: csv::Error) -> Self {
        PlanError::DataLoad {
            message: format!("CSV error: {}", err),
        }
    }
}

impl From<std::io::Error> for PlanError {
    fn from(err: std::io::Error) -> Self {
        PlanError::DataLoad {
            message: format!("I/O error: {}", err),
        }
    }
}

impl From<toml::de::Error> for PlanError {
    fn from(err: toml::de::Error) -> Self {
        PlanError::Config {
            message: err.to_string(),
        }
    }
}

impl From<GeneratorError> for PlanError {
    fn from(err: GeneratorError) -> Self {
        PlanError::GeneratorUnavailable {
            message: err.to_string(),
        }
    }
}

/// Convert PlanError to a JSON API response
impl IntoResponse for PlanError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = json!({
            "error": self.label(),
            "details": self.details(),
        });
        (status, Json(body)).into_response()
    }
}

/// Result type alias for bizplan operations
pub type Result<T> = std::result::Result<T, PlanError>;
