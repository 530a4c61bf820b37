//! Rendering of [`Error`] as an HTTP response.
//!
//! | Error        | Status | Body                                  |
//! |--------------|--------|---------------------------------------|
//! | `Validation` | 400    | `{"errors": {field: message}}`        |
//! | `Conflict`   | 400    | `{"error": message, "field": name}`   |
//! | `NotFound`   | 404    | `{"message": "<Kind> not found"}`     |
//! | anything else| 500    | `{"error": message}`                  |

use crate::errors::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::{debug, error};

impl Error {
    /// Status code this error is reported with.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Validation { .. } | Self::Conflict { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Config { .. } | Self::Database(_) | Self::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            Self::Validation { errors } => json!({ "errors": errors }),
            Self::Conflict { field, message } => json!({ "error": message, "field": field }),
            Self::NotFound { kind, .. } => json!({ "message": format!("{kind} not found") }),
            Self::Config { .. } | Self::Database(_) | Self::Io(_) => {
                error!(error = %self, "Request failed");
                json!({ "error": self.to_string() })
            }
        };
        if status != StatusCode::INTERNAL_SERVER_ERROR {
            debug!(%status, error = %self, "Request rejected");
        }
        (status, Json(body)).into_response()
    }
}
