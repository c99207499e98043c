//! Shared constants for Janus components.

/// Google reCAPTCHA verification endpoint
pub const SITEVERIFY_URL: &str = "https://www.google.com/recaptcha/api/siteverify";

/// Google reCAPTCHA client-side script URL
pub const RECAPTCHA_JS_URL: &str = "https://www.google.com/recaptcha/api.js";

/// Default Redis connection URL
pub const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379";

/// Default Vigil HTTP listen address
pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8787";

/// Default minimum v3 score to pass (inclusive)
pub const DEFAULT_SCORE_THRESHOLD: f64 = 0.5;

/// Default form field name carrying the v3 token
pub const DEFAULT_TOKEN_FIELD: &str = "recaptchaToken";

/// Default widget class for the v2 checkbox; the v2 token field
/// name is derived from it (`{class}-response`)
pub const DEFAULT_CLASS_V2: &str = "g-recaptcha";

/// Suffix appended to the v2 class to form the v2 token field name
pub const V2_RESPONSE_SUFFIX: &str = "-response";

/// Fallback flag expiry in Redis (10 minutes)
pub const DEFAULT_FALLBACK_TTL_SECS: u64 = 600;

/// Redis key prefixes
pub mod redis_keys {
    /// One-shot v3 fallback flag: fallback:{session_id}
    pub const FALLBACK_PREFIX: &str = "fallback:";
}

/// HTTP header names
pub mod headers {
    /// Session identifier forwarded by the calling application
    pub const X_SESSION_ID: &str = "X-Session-Id";
}
