//! Mapping from service errors to HTTP responses.
//!
//! Every failure is a JSON object with either an `error` string or an
//! `errors` list.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::Error;
use crate::ai::AugmentError;

pub const MALFORMED_BODY: &str = "Cuerpo de la petición vacío o JSON inválido";
pub const TASK_NOT_FOUND: &str = "Tarea no encontrada";

/// An error ready to be sent to the client.
#[derive(Debug)]
pub enum ApiError {
    /// Body missing, empty, not JSON, or not a non-empty object (400)
    MalformedBody,
    /// Field-level rule violations (400, `errors` list)
    Validation(Vec<String>),
    /// Unknown task id (404)
    NotFound,
    /// Request is missing inputs an operation needs (400)
    BadRequest(String),
    /// Model, parsing, or internal failure (500)
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MalformedBody | ApiError::Validation(_) | ApiError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Map an augmentation failure, prefixing model failures with `context`.
    pub fn from_augment(err: AugmentError, context: &str) -> Self {
        match err {
            AugmentError::MissingFields(_) => ApiError::BadRequest(err.to_string()),
            AugmentError::Model(_) => ApiError::Internal(format!("{}: {}", context, err)),
            _ => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::NotFound(_) => ApiError::NotFound,
            Error::Validation(errors) => ApiError::Validation(errors),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = ?self, "request failed");
        } else {
            tracing::warn!(status = status.as_u16(), error = ?self, "request rejected");
        }

        let body = match self {
            ApiError::MalformedBody => json!({ "error": MALFORMED_BODY }),
            ApiError::Validation(errors) => json!({ "errors": errors }),
            ApiError::NotFound => json!({ "error": TASK_NOT_FOUND }),
            ApiError::BadRequest(message) | ApiError::Internal(message) => {
                json!({ "error": message })
            }
        };
        (status, Json(body)).into_response()
    }
}
