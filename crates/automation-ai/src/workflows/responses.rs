//! Response helpers shared by the workflow routers.

use std::fmt;

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use super::validation::ValidationError;

impl IntoResponse for ValidationError {
    fn into_response(self) -> Response {
        (StatusCode::BAD_REQUEST, Json(self.body())).into_response()
    }
}

pub(crate) fn bad_json(rejection: JsonRejection) -> Response {
    ValidationError::Malformed(rejection.body_text()).into_response()
}

pub(crate) fn not_found(resource: &str) -> Response {
    let payload = json!({ "error": format!("{resource} not found") });
    (StatusCode::NOT_FOUND, Json(payload)).into_response()
}

/// Log the detail and answer with a generic 500.
pub(crate) fn internal_error(error: &dyn fmt::Display) -> Response {
    tracing::error!(error = %error, "request failed");
    let payload = json!({ "error": "internal server error" });
    (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
}
