//! Verification endpoints.

use axum::{Form, Json, extract::State, http::HeaderMap};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::Ordering;

use super::{ApiError, session_id};
use crate::recaptcha::{can_use, decide};
use crate::state::AppState;
use janus_common::{JanusError, RecaptchaMode, SiteverifyResponse, VerifyOutcome};

#[derive(Serialize)]
pub struct VerifyResponse {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    mode: Option<RecaptchaMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<SiteverifyResponse>,
}

impl VerifyResponse {
    fn exempt() -> Self {
        Self {
            status: "exempt",
            mode: None,
            result: None,
        }
    }
}

/// Dual-mode verification of a gated form submission.
///
/// Token fields are read under their configured names; the session flag
/// is consumed exactly once to make the mode decision for this request.
pub async fn verify(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<HashMap<String, String>>,
) -> Result<Json<VerifyResponse>, ApiError> {
    let recaptcha = &state.config.recaptcha;

    let action = form.get("action").map(String::as_str).unwrap_or("");
    if !can_use(action, &recaptcha.actions) {
        return Ok(Json(VerifyResponse::exempt()));
    }

    let session_id = session_id(&headers)?;

    let v3_token = form.get(&recaptcha.field).cloned().unwrap_or_default();
    let v2_token = form
        .get(&recaptcha.v2_token_field())
        .cloned()
        .unwrap_or_default();

    let flagged = state.fallback_store.consume(&session_id).await?;
    let decision = decide(flagged, !v2_token.is_empty());

    let outcome = state
        .verifier
        .verify(decision, &session_id, &v3_token, &v2_token)
        .await
        .map_err(|e| track_error(&state, e))?;

    let response = match outcome {
        VerifyOutcome::Passed => {
            state.counters.passed.fetch_add(1, Ordering::Relaxed);

            tracing::info!(
                session_id = %session_id,
                action = %action,
                mode = decision.mode.as_str(),
                "Verification passed"
            );

            VerifyResponse {
                status: "passed",
                mode: Some(decision.mode),
                result: None,
            }
        }
        VerifyOutcome::Failed => {
            state.counters.failed.fetch_add(1, Ordering::Relaxed);

            VerifyResponse {
                status: "failed",
                mode: Some(decision.mode),
                result: None,
            }
        }
        VerifyOutcome::FallbackRequired { result } => {
            state.counters.fallbacks_triggered.fetch_add(1, Ordering::Relaxed);

            VerifyResponse {
                status: "fallback_required",
                mode: Some(decision.mode),
                result: Some(result),
            }
        }
    };

    Ok(Json(response))
}

/// Single-mode (v3 only) verification; no fallback, no session state.
pub async fn verify_simple(
    State(state): State<AppState>,
    Form(form): Form<HashMap<String, String>>,
) -> Result<Json<VerifyResponse>, ApiError> {
    let recaptcha = &state.config.recaptcha;

    let action = form.get("action").map(String::as_str).unwrap_or("");
    if !can_use(action, &recaptcha.actions) {
        return Ok(Json(VerifyResponse::exempt()));
    }

    let token = form.get(&recaptcha.field).cloned().unwrap_or_default();

    let passed = state
        .simple_verifier
        .verify(&token)
        .await
        .map_err(|e| track_error(&state, e))?;

    let status = if passed {
        state.counters.passed.fetch_add(1, Ordering::Relaxed);
        "passed"
    } else {
        state.counters.failed.fetch_add(1, Ordering::Relaxed);
        "failed"
    };

    Ok(Json(VerifyResponse {
        status,
        mode: Some(RecaptchaMode::V3),
        result: None,
    }))
}

fn track_error(state: &AppState, err: JanusError) -> ApiError {
    if matches!(err, JanusError::Transport(_)) {
        state.counters.transport_errors.fetch_add(1, Ordering::Relaxed);
    }

    ApiError(err)
}
