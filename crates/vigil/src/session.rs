//! Session-scoped fallback flag storage.
//!
//! One boolean per session: "the previous v3 attempt failed or scored
//! too low." This is the only state in the system that spans requests.

use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;

use janus_common::JanusError;
use janus_common::constants::redis_keys::FALLBACK_PREFIX;

/// One-shot fallback flag store, keyed by session.
///
/// `consume` returns the stored value (or false) and clears it in the
/// same call; a second consume without an intervening `flag` reads false.
#[async_trait]
pub trait FallbackStore: Send + Sync {
    /// Record that the v3 attempt for this session failed
    async fn flag(&self, session_id: &str) -> Result<(), JanusError>;

    /// Read and clear the flag
    async fn consume(&self, session_id: &str) -> Result<bool, JanusError>;
}

/// Redis-backed store. Flags carry a TTL so abandoned sessions decay.
pub struct RedisFallbackStore {
    redis: ConnectionManager,
    ttl_secs: u64,
}

impl RedisFallbackStore {
    pub fn new(redis: ConnectionManager, ttl_secs: u64) -> Self {
        Self { redis, ttl_secs }
    }

    fn key(session_id: &str) -> String {
        format!("{}{}", FALLBACK_PREFIX, session_id)
    }
}

#[async_trait]
impl FallbackStore for RedisFallbackStore {
    async fn flag(&self, session_id: &str) -> Result<(), JanusError> {
        let mut conn = self.redis.clone();
        let payload = serde_json::json!({
            "flagged_at": chrono::Utc::now().timestamp(),
        });

        conn.set_ex::<_, _, ()>(&Self::key(session_id), payload.to_string(), self.ttl_secs)
            .await
            .map_err(|e| JanusError::Store(e.to_string()))?;

        tracing::debug!(session_id = %session_id, "Fallback flag set");

        Ok(())
    }

    async fn consume(&self, session_id: &str) -> Result<bool, JanusError> {
        let mut conn = self.redis.clone();
        let key = Self::key(session_id);

        // Use GET + DEL for Redis 3.x compatibility (GETDEL requires Redis 6.2+)
        let stored: Option<String> = conn
            .get(&key)
            .await
            .map_err(|e| JanusError::Store(e.to_string()))?;
        let _: () = conn
            .del(&key)
            .await
            .map_err(|e| JanusError::Store(e.to_string()))?;

        Ok(stored.is_some())
    }
}

/// In-process store for verifier tests
#[cfg(test)]
#[derive(Default)]
pub struct MemoryFallbackStore {
    flags: tokio::sync::Mutex<std::collections::HashSet<String>>,
}

#[cfg(test)]
#[async_trait]
impl FallbackStore for MemoryFallbackStore {
    async fn flag(&self, session_id: &str) -> Result<(), JanusError> {
        self.flags.lock().await.insert(session_id.to_string());
        Ok(())
    }

    async fn consume(&self, session_id: &str) -> Result<bool, JanusError> {
        Ok(self.flags.lock().await.remove(session_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_consume_is_one_shot() {
        let store = MemoryFallbackStore::default();

        assert!(!store.consume("s1").await.unwrap());

        store.flag("s1").await.unwrap();
        assert!(store.consume("s1").await.unwrap());

        // cleared by the first consume
        assert!(!store.consume("s1").await.unwrap());
    }

    #[tokio::test]
    async fn test_flags_are_per_session() {
        let store = MemoryFallbackStore::default();

        store.flag("s1").await.unwrap();

        assert!(!store.consume("s2").await.unwrap());
        assert!(store.consume("s1").await.unwrap());
    }
}
