pub mod admin;
pub mod auth;
pub mod credits;
pub mod session;
pub mod user;

use crate::error::ApiError;
use crate::state::SharedState;
use axum::{routing::get, Router};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

async fn health() -> &'static str {
    "OK"
}

pub fn routes(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(auth::router(state.clone()))
        .merge(admin::router(state.clone()))
        .merge(user::router(state.clone()))
        .merge(credits::router(state))
}

/// Presence check for a required JSON string field. Absent, empty, and
/// whitespace-only all count as missing; the value comes back trimmed.
pub(crate) fn required<'a>(value: &'a Option<String>, name: &str) -> Result<&'a str, ApiError> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::validation(format!("{name} is required")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_accepts_present_values() {
        let value = Some("  alice  ".to_string());
        assert_eq!(required(&value, "user_name").unwrap(), "alice");
    }

    #[test]
    fn required_rejects_missing_and_blank() {
        for value in [None, Some(String::new()), Some("   ".to_string())] {
            let err = required(&value, "user_name").unwrap_err();
            assert!(matches!(err, ApiError::Validation(msg) if msg == "user_name is required"));
        }
    }

    #[test]
    fn message_response_shape() {
        let body = serde_json::to_value(MessageResponse { message: "ok" }).unwrap();
        assert_eq!(body, serde_json::json!({ "message": "ok" }));
    }
}
