//! HTTP route handlers for Vigil.

use axum::{
    Json, Router,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use janus_common::JanusError;
use janus_common::constants::headers::X_SESSION_ID;

mod health;
mod verify;
mod widget;

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health & Status
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/metrics", get(health::metrics))
        // Verification endpoints
        .route("/widget", get(widget::widget_context))
        .route("/verify", post(verify::verify))
        .route("/verify/simple", post(verify::verify_simple))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// `JanusError` rendered as an HTTP response
pub struct ApiError(pub JanusError);

impl From<JanusError> for ApiError {
    fn from(err: JanusError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        tracing::error!(error = %self.0, "Request failed");

        let body = Json(serde_json::json!({ "error": self.0.to_string() }));

        (status, body).into_response()
    }
}

/// Extract the session identifier forwarded by the calling application
pub(crate) fn session_id(headers: &HeaderMap) -> Result<String, ApiError> {
    headers
        .get(X_SESSION_ID)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            ApiError(JanusError::InvalidInput(format!(
                "missing {} header",
                X_SESSION_ID
            )))
        })
}
