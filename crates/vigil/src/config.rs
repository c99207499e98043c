//! Configuration management for Vigil.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use janus_common::JanusError;
use janus_common::constants::{
    DEFAULT_CLASS_V2, DEFAULT_FALLBACK_TTL_SECS, DEFAULT_LISTEN_ADDR, DEFAULT_REDIS_URL,
    DEFAULT_SCORE_THRESHOLD, DEFAULT_TOKEN_FIELD, V2_RESPONSE_SUFFIX,
};

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Redis connection URL
    #[serde(default = "default_redis_url")]
    pub redis_url: String,

    /// HTTP listen address
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// This node's unique ID (auto-generated if not set)
    #[serde(default = "generate_node_id")]
    pub node_id: String,

    /// reCAPTCHA configuration
    #[serde(default)]
    pub recaptcha: RecaptchaConfig,
}

/// reCAPTCHA-specific configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RecaptchaConfig {
    /// Actions gated behind reCAPTCHA (exact, case-sensitive names)
    #[serde(default = "default_actions")]
    pub actions: Vec<String>,

    /// Minimum v3 score to pass (inclusive lower bound)
    #[serde(default = "default_score")]
    pub score: f64,

    /// Hidden form field name carrying the v3 token
    #[serde(default = "default_field")]
    pub field: String,

    /// Widget class for the v2 checkbox; the v2 token field name is
    /// derived from it
    #[serde(default = "default_class_v2")]
    pub class_v2: String,

    /// Server-side secret for v3 (required)
    #[serde(default)]
    pub secret_key_v3: String,

    /// Server-side secret for v2; an empty value disables the fallback path
    #[serde(default)]
    pub secret_key_v2: String,

    /// Public site key embedded in v3 markup
    #[serde(default)]
    pub site_key_v3: String,

    /// Public site key embedded in v2 markup
    #[serde(default)]
    pub site_key_v2: String,

    /// Fallback flag expiry in seconds
    #[serde(default = "default_fallback_ttl")]
    pub fallback_ttl_secs: u64,
}

impl RecaptchaConfig {
    /// Form field name the v2 checkbox posts its token under
    pub fn v2_token_field(&self) -> String {
        format!("{}{}", self.class_v2, V2_RESPONSE_SUFFIX)
    }

    /// Startup validation. A missing v3 secret is fatal: the service
    /// must not run half-configured.
    pub fn validate(&self) -> Result<(), JanusError> {
        if self.secret_key_v3.is_empty() {
            return Err(JanusError::Config(
                "reCAPTCHA v3 secret key is not set".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for RecaptchaConfig {
    fn default() -> Self {
        Self {
            actions: default_actions(),
            score: default_score(),
            field: default_field(),
            class_v2: default_class_v2(),
            secret_key_v3: String::new(),
            secret_key_v2: String::new(),
            site_key_v3: String::new(),
            site_key_v2: String::new(),
            fallback_ttl_secs: default_fallback_ttl(),
        }
    }
}

// Default value functions
fn default_redis_url() -> String { DEFAULT_REDIS_URL.to_string() }
fn default_listen_addr() -> String { DEFAULT_LISTEN_ADDR.to_string() }
fn default_actions() -> Vec<String> { vec!["index".to_string()] }
fn default_score() -> f64 { DEFAULT_SCORE_THRESHOLD }
fn default_field() -> String { DEFAULT_TOKEN_FIELD.to_string() }
fn default_class_v2() -> String { DEFAULT_CLASS_V2.to_string() }
fn default_fallback_ttl() -> u64 { DEFAULT_FALLBACK_TTL_SECS }

fn generate_node_id() -> String {
    use rand::Rng;
    let mut rng = rand::rng();
    format!("vigil-{:08x}", rng.random::<u32>())
}

impl AppConfig {
    /// Load configuration from file, with CLI overrides
    pub fn load(config_path: &str, args: &super::Args) -> Result<Self> {
        let mut config = if Path::new(config_path).exists() {
            let settings = config::Config::builder()
                .add_source(config::File::with_name(config_path))
                .build()
                .context("Failed to load config file")?;

            settings
                .try_deserialize()
                .context("Failed to parse config")?
        } else {
            // Use defaults if config file doesn't exist
            tracing::warn!("Config file not found, using defaults");
            Self::default()
        };

        // Apply CLI overrides
        if let Some(ref redis_url) = args.redis_url {
            config.redis_url = redis_url.clone();
        }
        if let Some(ref listen) = args.listen {
            config.listen_addr = listen.clone();
        }
        if let Some(ref secret) = args.v3_secret {
            config.recaptcha.secret_key_v3 = secret.clone();
        }
        if let Some(ref secret) = args.v2_secret {
            config.recaptcha.secret_key_v2 = secret.clone();
        }
        if let Some(ref key) = args.v3_site_key {
            config.recaptcha.site_key_v3 = key.clone();
        }
        if let Some(ref key) = args.v2_site_key {
            config.recaptcha.site_key_v2 = key.clone();
        }

        Ok(config)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            redis_url: default_redis_url(),
            listen_addr: default_listen_addr(),
            node_id: generate_node_id(),
            recaptcha: RecaptchaConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recaptcha_defaults() {
        let config = RecaptchaConfig::default();
        assert_eq!(config.actions, vec!["index".to_string()]);
        assert_eq!(config.score, 0.5);
        assert_eq!(config.field, "recaptchaToken");
        assert_eq!(config.class_v2, "g-recaptcha");
        assert_eq!(config.fallback_ttl_secs, 600);
    }

    #[test]
    fn test_v2_token_field_derives_from_class() {
        let config = RecaptchaConfig::default();
        assert_eq!(config.v2_token_field(), "g-recaptcha-response");

        let custom = RecaptchaConfig {
            class_v2: "my-recaptcha".to_string(),
            ..RecaptchaConfig::default()
        };
        assert_eq!(custom.v2_token_field(), "my-recaptcha-response");
    }

    #[test]
    fn test_missing_v3_secret_fails_validation() {
        let config = RecaptchaConfig::default();
        assert!(matches!(config.validate(), Err(JanusError::Config(_))));

        let configured = RecaptchaConfig {
            secret_key_v3: "secret".to_string(),
            ..RecaptchaConfig::default()
        };
        assert!(configured.validate().is_ok());
    }
}
