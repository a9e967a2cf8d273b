use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use venture_planner::{CompletionError, PlannerError};

/// An error body `{"error": "<message>"}` with the status it would carry
/// when statuses are mapped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    /// `legacy` collapses every status to 200 for clients that only read bodies.
    pub fn respond(self, legacy: bool) -> Response {
        let status = if legacy { StatusCode::OK } else { self.status };
        (status, Json(json!({ "error": self.message }))).into_response()
    }
}

impl From<&PlannerError> for ApiError {
    fn from(error: &PlannerError) -> Self {
        let status = match error {
            PlannerError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            PlannerError::Store(_) => StatusCode::SERVICE_UNAVAILABLE,
            PlannerError::Prompt(_) => StatusCode::INTERNAL_SERVER_ERROR,
            PlannerError::Completion(CompletionError::Timeout) => StatusCode::GATEWAY_TIMEOUT,
            PlannerError::Completion(_) | PlannerError::MalformedReply(_) => StatusCode::BAD_GATEWAY,
        };
        Self {
            status,
            message: error.to_string(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}
