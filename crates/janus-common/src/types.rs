//! Core types shared across Janus components.

use serde::{Deserialize, Serialize};

/// reCAPTCHA generation used for a given request.
///
/// - `V3`: frictionless, score-based (0.0-1.0, higher = more likely human)
/// - `V2`: explicit interactive checkbox, used as fallback when v3
///   fails or scores too low
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecaptchaMode {
    V2,
    V3,
}

impl RecaptchaMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::V2 => "v2",
            Self::V3 => "v3",
        }
    }
}

/// Outcome of the per-request mode decision.
///
/// Decided once per request and carried through both verification and
/// widget rendering, so the two sides never disagree on the mode.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ModeDecision {
    /// Which widget/secret pair to use for this request
    pub mode: RecaptchaMode,

    /// Whether the one-shot session fallback flag was set (and cleared)
    /// when this decision was made
    pub consumed_flag: bool,
}

/// Parsed response from the siteverify endpoint.
///
/// `status` is set only when the transport call itself failed (non-2xx);
/// in that case no body is parsed and `success`/`score` carry their
/// failure defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteverifyResponse {
    pub success: bool,

    /// v3 score; absent in v2 responses, defaulted to 0.0
    #[serde(default)]
    pub score: f64,

    #[serde(rename = "error-codes", skip_serializing_if = "Option::is_none")]
    pub error_codes: Option<Vec<String>>,

    /// Timestamp of the challenge load (ISO 8601, passed through)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub challenge_ts: Option<String>,

    /// Hostname of the site where the challenge was solved
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,

    /// v3 action name reported by the client-side call
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,

    /// HTTP status of the failed transport call
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl SiteverifyResponse {
    /// Normalized result for a non-2xx transport response.
    /// The body is not parsed; only the HTTP status is recorded.
    pub fn transport_failure(status: u16) -> Self {
        Self {
            success: false,
            score: 0.0,
            error_codes: None,
            challenge_ts: None,
            hostname: None,
            action: None,
            status: Some(status),
        }
    }

    /// v3 pass check: verified AND score at or above the threshold
    /// (inclusive lower bound)
    pub fn passes(&self, threshold: f64) -> bool {
        self.success && self.score >= threshold
    }
}

/// Result of a dual-mode verification attempt.
///
/// `FallbackRequired` is expected control flow, not an error: v3 failed
/// or scored below threshold while a v2 secret is configured, so the
/// caller should re-render with the v2 checkbox. Carries the full
/// siteverify payload for diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum VerifyOutcome {
    Passed,
    Failed,
    FallbackRequired { result: SiteverifyResponse },
}

impl VerifyOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::Failed => "failed",
            Self::FallbackRequired { .. } => "fallback_required",
        }
    }

    pub fn is_passed(&self) -> bool {
        matches!(self, Self::Passed)
    }
}

/// Verification counters for monitoring
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VerifyMetrics {
    /// Verifications that passed (either mode)
    pub passed: u64,

    /// Verifications that definitively failed
    pub failed: u64,

    /// v3 failures that triggered the v2 fallback
    pub fallbacks_triggered: u64,

    /// siteverify calls that could not be completed
    pub transport_errors: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_passes_threshold_is_inclusive() {
        let resp = SiteverifyResponse {
            success: true,
            score: 0.5,
            error_codes: None,
            challenge_ts: None,
            hostname: None,
            action: None,
            status: None,
        };
        assert!(resp.passes(0.5));
        assert!(!resp.passes(0.51));

        let low = SiteverifyResponse { score: 0.49, ..resp.clone() };
        assert!(!low.passes(0.5));

        // a high score never passes without success
        let unverified = SiteverifyResponse { success: false, score: 0.9, ..resp };
        assert!(!unverified.passes(0.5));
    }

    #[test]
    fn test_transport_failure_shape() {
        let resp = SiteverifyResponse::transport_failure(503);
        assert!(!resp.success);
        assert_eq!(resp.score, 0.0);
        assert_eq!(resp.status, Some(503));
        assert!(resp.error_codes.is_none());
    }

    #[test]
    fn test_siteverify_json_field_names() {
        // v3 failure body as Google returns it
        let body = r#"{"success": false, "error-codes": ["timeout-or-duplicate"]}"#;
        let resp: SiteverifyResponse = serde_json::from_str(body).unwrap();
        assert!(!resp.success);
        assert_eq!(resp.score, 0.0);
        assert_eq!(
            resp.error_codes.as_deref(),
            Some(&["timeout-or-duplicate".to_string()][..])
        );

        // v2 success body carries no score
        let body = r#"{"success": true, "hostname": "example.org"}"#;
        let resp: SiteverifyResponse = serde_json::from_str(body).unwrap();
        assert!(resp.success);
        assert_eq!(resp.score, 0.0);
        assert_eq!(resp.hostname.as_deref(), Some("example.org"));
    }

    #[test]
    fn test_mode_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&RecaptchaMode::V2).unwrap(), "\"v2\"");
        assert_eq!(serde_json::to_string(&RecaptchaMode::V3).unwrap(), "\"v3\"");
    }
}
