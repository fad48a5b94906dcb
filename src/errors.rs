// src/errors.rs
use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use thiserror::Error;

use crate::models::Provider;

#[derive(Error, Debug)]
pub enum BeforeAfterError {
    #[error("Unsupported provider: {0}")]
    UnsupportedProvider(String),

    #[error("{0}")]
    InputArity(String),

    #[error("{provider} API key not provided")]
    CredentialMissing { provider: Provider },

    #[error("{provider} call failed: {cause}")]
    UpstreamCallFailed { provider: Provider, cause: String },

    #[error("Failed to parse model response: {0}")]
    ParseFailure(String),

    #[error("Image processing error: {0}")]
    ImageProcessing(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl BeforeAfterError {
    pub fn upstream(provider: Provider, cause: impl Into<String>) -> Self {
        BeforeAfterError::UpstreamCallFailed {
            provider,
            cause: cause.into(),
        }
    }

    fn label(&self) -> &'static str {
        match self {
            BeforeAfterError::UnsupportedProvider(_) => "Invalid provider",
            BeforeAfterError::InputArity(_) => "Invalid number of files",
            BeforeAfterError::CredentialMissing { .. } => "Missing credentials",
            BeforeAfterError::UpstreamCallFailed { .. } => "AI service error",
            BeforeAfterError::ParseFailure(_) => "Data processing error",
            BeforeAfterError::ImageProcessing(_) => "Image processing error",
            BeforeAfterError::Validation(_) => "Validation error",
            BeforeAfterError::Config(_) => "Configuration error",
        }
    }
}

impl ResponseError for BeforeAfterError {
    fn status_code(&self) -> StatusCode {
        match self {
            BeforeAfterError::UnsupportedProvider(_)
            | BeforeAfterError::InputArity(_)
            | BeforeAfterError::ImageProcessing(_)
            | BeforeAfterError::Validation(_) => StatusCode::BAD_REQUEST,
            BeforeAfterError::CredentialMissing { .. }
            | BeforeAfterError::UpstreamCallFailed { .. } => StatusCode::SERVICE_UNAVAILABLE,
            BeforeAfterError::ParseFailure(_) | BeforeAfterError::Config(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": self.label(),
            "message": self.to_string()
        }))
    }
}
