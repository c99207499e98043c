//! Dual-mode verification with v3 -> v2 fallback.

use std::sync::Arc;

use janus_common::{JanusError, ModeDecision, RecaptchaMode, VerifyOutcome};

use super::Siteverify;
use crate::config::RecaptchaConfig;
use crate::session::FallbackStore;

/// Verifies submissions in the mode chosen by [`super::decide`],
/// falling back from v3 to v2 when the score is too low or the
/// verification fails.
pub struct DualVerifier {
    secret_v3: String,
    secret_v2: String,
    threshold: f64,
    transport: Arc<dyn Siteverify>,
    store: Arc<dyn FallbackStore>,
}

impl DualVerifier {
    /// Fails when no v3 secret is configured.
    pub fn new(
        config: &RecaptchaConfig,
        transport: Arc<dyn Siteverify>,
        store: Arc<dyn FallbackStore>,
    ) -> Result<Self, JanusError> {
        config.validate()?;

        Ok(Self {
            secret_v3: config.secret_key_v3.clone(),
            secret_v2: config.secret_key_v2.clone(),
            threshold: config.score,
            transport,
            store,
        })
    }

    /// Verify a submission under an already-made mode decision.
    ///
    /// The decision must be the one made at the start of this request;
    /// the session flag was consumed exactly once to produce it.
    pub async fn verify(
        &self,
        decision: ModeDecision,
        session_id: &str,
        v3_token: &str,
        v2_token: &str,
    ) -> Result<VerifyOutcome, JanusError> {
        match decision.mode {
            RecaptchaMode::V2 => self.verify_v2(v2_token).await,
            RecaptchaMode::V3 => self.verify_v3(session_id, v3_token).await,
        }
    }

    /// v2 checkbox verification; no fallback beyond this.
    ///
    /// An empty token (or an unset v2 secret on a v2-committed path)
    /// still goes to the transport and fails upstream.
    async fn verify_v2(&self, token: &str) -> Result<VerifyOutcome, JanusError> {
        let result = self.transport.verify(&self.secret_v2, token).await?;

        if result.success {
            return Ok(VerifyOutcome::Passed);
        }

        tracing::debug!(error_codes = ?result.error_codes, "v2 verification failed");

        Ok(VerifyOutcome::Failed)
    }

    /// v3 score verification. An empty token is a normal attempt; the
    /// transport reports the failure.
    async fn verify_v3(&self, session_id: &str, token: &str) -> Result<VerifyOutcome, JanusError> {
        let result = self.transport.verify(&self.secret_v3, token).await?;

        if result.passes(self.threshold) {
            return Ok(VerifyOutcome::Passed);
        }

        if self.has_v2_fallback() {
            // Remember the failure so the next request is challenged with v2
            self.store.flag(session_id).await?;

            tracing::info!(
                session_id = %session_id,
                success = result.success,
                score = result.score,
                "v3 verification failed, falling back to v2"
            );

            return Ok(VerifyOutcome::FallbackRequired { result });
        }

        tracing::debug!(
            success = result.success,
            score = result.score,
            "v3 verification failed"
        );

        Ok(VerifyOutcome::Failed)
    }

    fn has_v2_fallback(&self) -> bool {
        !self.secret_v2.is_empty()
    }
}
