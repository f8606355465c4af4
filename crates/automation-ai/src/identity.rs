//! Acting-user resolution.
//!
//! Authentication happens upstream; the identity provider forwards the authenticated user
//! in the `x-user-id` header and every owned resource is scoped to that value.

use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;

pub const USER_HEADER: &str = "x-user-id";

/// Identity of the user that owns assessments, reports, and analyses.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OwnerId(pub String);

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Rejection returned when the upstream identity header is absent or unusable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unauthenticated;

impl IntoResponse for Unauthenticated {
    fn into_response(self) -> Response {
        let payload = json!({ "error": "authentication required" });
        (StatusCode::UNAUTHORIZED, Json(payload)).into_response()
    }
}

pub fn acting_user(headers: &HeaderMap) -> Result<OwnerId, Unauthenticated> {
    headers
        .get(USER_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(|value| OwnerId(value.to_string()))
        .ok_or(Unauthenticated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn reads_trimmed_header_value() {
        let mut headers = HeaderMap::new();
        headers.insert(USER_HEADER, HeaderValue::from_static("  analyst-7 "));
        assert_eq!(
            acting_user(&headers),
            Ok(OwnerId("analyst-7".to_string()))
        );
    }

    #[test]
    fn missing_or_blank_header_is_rejected() {
        assert_eq!(acting_user(&HeaderMap::new()), Err(Unauthenticated));

        let mut headers = HeaderMap::new();
        headers.insert(USER_HEADER, HeaderValue::from_static("   "));
        assert_eq!(acting_user(&headers), Err(Unauthenticated));
        assert_eq!(
            Unauthenticated.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
    }
}
