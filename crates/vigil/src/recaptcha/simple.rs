//! Single-mode (v3 only) verification.

use std::sync::Arc;

use janus_common::JanusError;

use super::Siteverify;

/// Score-based verification with no fallback and no session interaction.
pub struct SimpleVerifier {
    secret: String,
    threshold: f64,
    transport: Arc<dyn Siteverify>,
}

impl SimpleVerifier {
    /// Fails when the secret is empty.
    pub fn new(
        secret: String,
        threshold: f64,
        transport: Arc<dyn Siteverify>,
    ) -> Result<Self, JanusError> {
        if secret.is_empty() {
            return Err(JanusError::Config(
                "reCAPTCHA secret key is not set".to_string(),
            ));
        }

        Ok(Self {
            secret,
            threshold,
            transport,
        })
    }

    /// True iff verified and the score clears the threshold (inclusive).
    pub async fn verify(&self, token: &str) -> Result<bool, JanusError> {
        let result = self.transport.verify(&self.secret, token).await?;

        if !result.passes(self.threshold) {
            tracing::debug!(
                success = result.success,
                score = result.score,
                "verification failed"
            );
            return Ok(false);
        }

        Ok(true)
    }
}
