//! reCAPTCHA verification: mode decision, siteverify transport, and the
//! dual-mode (v3 with v2 fallback) and single-mode verifiers.

mod simple;
mod transport;
mod verifier;

pub use simple::SimpleVerifier;
pub use transport::{Siteverify, SiteverifyClient};
pub use verifier::DualVerifier;

use janus_common::{ModeDecision, RecaptchaMode};

/// Decide which mode to use for this request.
///
/// Pure over its two inputs: the consumed session fallback flag and the
/// presence of a v2 token in the submission. The flag read is one-shot
/// (`FallbackStore::consume`), so call this once per request and carry
/// the decision through verification and widget rendering.
pub fn decide(fallback_flagged: bool, has_v2_token: bool) -> ModeDecision {
    let mode = if fallback_flagged || has_v2_token {
        RecaptchaMode::V2
    } else {
        RecaptchaMode::V3
    };

    ModeDecision {
        mode,
        consumed_flag: fallback_flagged,
    }
}

/// Is this action gated behind reCAPTCHA?
///
/// Exact, case-sensitive membership in the configured allow-list.
pub fn can_use(action: &str, allowed: &[String]) -> bool {
    allowed.iter().any(|a| a == action)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decide_defaults_to_v3() {
        let decision = decide(false, false);
        assert_eq!(decision.mode, RecaptchaMode::V3);
        assert!(!decision.consumed_flag);
    }

    #[test]
    fn test_decide_uses_v2_when_flag_was_set() {
        let decision = decide(true, false);
        assert_eq!(decision.mode, RecaptchaMode::V2);
        assert!(decision.consumed_flag);
    }

    #[test]
    fn test_decide_uses_v2_when_token_present() {
        let decision = decide(false, true);
        assert_eq!(decision.mode, RecaptchaMode::V2);
        assert!(!decision.consumed_flag);
    }

    #[test]
    fn test_can_use_is_exact_and_case_sensitive() {
        let allowed = vec!["index".to_string(), "contact".to_string()];

        assert!(can_use("index", &allowed));
        assert!(can_use("contact", &allowed));

        assert!(!can_use("Index", &allowed));
        assert!(!can_use("ind", &allowed));
        assert!(!can_use("indexes", &allowed));
        assert!(!can_use("login", &allowed));
        assert!(!can_use("", &allowed));
    }
}
