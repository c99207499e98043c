//! Widget context endpoint for the rendering side.

use axum::{
    Json,
    extract::{Query, State},
    http::HeaderMap,
};
use serde::{Deserialize, Serialize};

use super::{ApiError, session_id};
use crate::recaptcha::{can_use, decide};
use crate::render::WidgetContext;
use crate::state::AppState;
use janus_common::RecaptchaMode;

#[derive(Deserialize)]
pub struct WidgetQuery {
    /// Action about to be rendered
    action: String,
}

#[derive(Serialize)]
pub struct WidgetResponse {
    required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    widget: Option<WidgetPayload>,
}

#[derive(Serialize)]
pub struct WidgetPayload {
    mode: RecaptchaMode,
    site_key: String,
    field: String,
    v2_token_field: String,
    class_v2: String,
    script_src: String,
    hidden_field: String,
    checkbox: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    script_block: Option<String>,
}

/// Resolve the widget to render for an action.
///
/// Consumes the session fallback flag: a v3 failure recorded on the
/// previous request switches this render (and only this render) to the
/// v2 checkbox.
pub async fn widget_context(
    State(state): State<AppState>,
    Query(query): Query<WidgetQuery>,
    headers: HeaderMap,
) -> Result<Json<WidgetResponse>, ApiError> {
    let recaptcha = &state.config.recaptcha;

    if !can_use(&query.action, &recaptcha.actions) {
        return Ok(Json(WidgetResponse {
            required: false,
            widget: None,
        }));
    }

    let session_id = session_id(&headers)?;

    let flagged = state.fallback_store.consume(&session_id).await?;
    let decision = decide(flagged, false);

    let ctx = WidgetContext::new(recaptcha, decision.mode)?;

    tracing::debug!(
        session_id = %session_id,
        action = %query.action,
        mode = ctx.mode().as_str(),
        consumed_flag = decision.consumed_flag,
        "Resolved widget context"
    );

    Ok(Json(WidgetResponse {
        required: true,
        widget: Some(WidgetPayload {
            mode: ctx.mode(),
            site_key: ctx.site_key().to_string(),
            field: recaptcha.field.clone(),
            v2_token_field: recaptcha.v2_token_field(),
            class_v2: recaptcha.class_v2.clone(),
            script_src: ctx.script_src(),
            hidden_field: ctx.hidden_field(),
            checkbox: ctx.checkbox(""),
            script_block: ctx.script_block(),
        }),
    }))
}
