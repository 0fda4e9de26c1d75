//! Application error type and its HTTP mapping.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

use crate::domain::repositories::StoreError;
use crate::utils::url_validator::ValidationError;

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

/// Errors returned by [`crate::application::services::LinkService`].
///
/// # Status Codes
///
/// | Variant | Status |
/// |---|---|
/// | `Validation` | 400 |
/// | `NotFound` | 404 (malformed and unknown codes look the same) |
/// | `AliasConflict` | 409 |
/// | `Expired` | 410 |
/// | `AllocationExhausted` | 500 |
/// | `Store` | 500 |
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("Invalid request body: {0}")]
    BadRequest(String),

    #[error("Alias already taken")]
    AliasConflict,

    #[error("Could not allocate a unique code")]
    AllocationExhausted,

    #[error("Not found")]
    NotFound,

    #[error("Link expired")]
    Expired,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl AppError {
    /// HTTP status for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::AliasConflict => StatusCode::CONFLICT,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Expired => StatusCode::GONE,
            Self::AllocationExhausted | Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message shown to clients. Storage details stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            Self::Store(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let Self::Store(ref e) = self {
            error!(error = %e, "Storage failure while handling request");
        }

        let body = ErrorBody {
            error: self.public_message(),
        };

        (self.status_code(), Json(body)).into_response()
    }
}
