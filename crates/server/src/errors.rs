use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use service::ServiceError;
use thiserror::Error;
use tracing::{debug, error};

/// JSON error body: `{"error": "...", "message": "..."}`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub body: ErrorBody,
}

impl JsonApiError {
    pub fn new(status: StatusCode, error: &str, message: Option<String>) -> Self {
        Self { status, body: ErrorBody { error: error.to_string(), message } }
    }

    /// Map a service error onto the HTTP taxonomy.
    ///
    /// `failure` is the generic text returned for store failures; the store's
    /// own message is logged, never sent to the client.
    pub fn from_service(err: ServiceError, failure: &'static str) -> Self {
        match err {
            ServiceError::InvalidId { entity, .. } => {
                Self::new(StatusCode::BAD_REQUEST, "Bad Request", Some(format!("Invalid {entity} ID")))
            }
            ServiceError::MissingParam(_) | ServiceError::Validation(_) => {
                let msg = capitalize(&err.to_string());
                Self::new(StatusCode::BAD_REQUEST, "Bad Request", Some(msg))
            }
            ServiceError::NotFound(ref what) => {
                Self::new(StatusCode::NOT_FOUND, "Not Found", Some(capitalize(what)))
            }
            ServiceError::Db(ref detail) => {
                error!(error = %detail, failure, "store operation failed");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, failure, None)
            }
        }
    }
}

impl From<JsonRejection> for JsonApiError {
    fn from(rejection: JsonRejection) -> Self {
        debug!(status = %rejection.status(), reason = %rejection.body_text(), "request body rejected");
        Self::new(StatusCode::BAD_REQUEST, "Bad Request", Some(rejection.body_text()))
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("document store unavailable: {0}")]
    Store(String),
}
