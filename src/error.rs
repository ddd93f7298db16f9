use axum::{http::StatusCode, response::IntoResponse, response::Response, Json};
use sea_orm::DbErr;
use serde_json::json;
use thiserror::Error;

/// Service-level error taxonomy. Every failure a handler can produce maps to
/// exactly one of these variants, and the `IntoResponse` impl is the single
/// place where they are translated into client-facing status + message.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    NotFound(String),
    #[error("Upstream service failure: {0}")]
    Upstream(String),
    #[error("{0}")]
    Internal(String),
    #[error("Database error: {0}")]
    Db(#[from] DbErr),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
            Self::Internal(_) | Self::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let message = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |err| match &err.message {
                    Some(msg) => msg.to_string(),
                    None => format!("Invalid value for field {}", field),
                })
            })
            .collect::<Vec<_>>()
            .join(", ");
        Self::InvalidInput(message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        // Internal details stay in the log, not in the response body.
        let message = match &self {
            Self::Db(err) => {
                tracing::error!(error = %err, "Database error");
                "Internal server error".to_string()
            }
            Self::Internal(reason) => {
                tracing::error!(reason = %reason, "Internal error");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
