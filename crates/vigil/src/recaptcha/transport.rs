//! siteverify transport: the one outbound HTTP call Janus makes.

use async_trait::async_trait;
use reqwest::Client;

use janus_common::constants::SITEVERIFY_URL;
use janus_common::{JanusError, SiteverifyResponse};

static APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Verification transport seam.
///
/// Implemented by [`SiteverifyClient`] in production and by scripted
/// stubs in verifier tests.
#[async_trait]
pub trait Siteverify: Send + Sync {
    async fn verify(&self, secret: &str, token: &str) -> Result<SiteverifyResponse, JanusError>;
}

/// HTTP client for the Google siteverify endpoint
pub struct SiteverifyClient {
    http: Client,
    url: String,
}

impl SiteverifyClient {
    pub fn new() -> Result<Self, JanusError> {
        Self::with_url(SITEVERIFY_URL)
    }

    /// Point at a different endpoint (integration testing against a
    /// local double)
    pub fn with_url(url: impl Into<String>) -> Result<Self, JanusError> {
        let http = Client::builder()
            .user_agent(APP_USER_AGENT)
            .build()
            .map_err(|e| JanusError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            url: url.into(),
        })
    }
}

#[async_trait]
impl Siteverify for SiteverifyClient {
    /// One POST, no retries.
    ///
    /// A non-2xx response is normalized to a failed result carrying the
    /// status, without reading the body. A network-level failure
    /// propagates as an error, never as `success=false`.
    async fn verify(&self, secret: &str, token: &str) -> Result<SiteverifyResponse, JanusError> {
        let response = self
            .http
            .post(&self.url)
            .form(&[("secret", secret), ("response", token)])
            .send()
            .await
            .map_err(|e| JanusError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "siteverify returned non-2xx");
            return Ok(SiteverifyResponse::transport_failure(status.as_u16()));
        }

        let result: SiteverifyResponse = response
            .json()
            .await
            .map_err(|e| JanusError::Transport(e.to_string()))?;

        tracing::debug!(
            success = result.success,
            score = result.score,
            error_codes = ?result.error_codes,
            "siteverify response"
        );

        Ok(result)
    }
}
