//! Application state and shared resources.

use anyhow::{Context, Result};
use redis::aio::ConnectionManager;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::config::AppConfig;
use crate::recaptcha::{DualVerifier, SimpleVerifier, SiteverifyClient};
use crate::session::{FallbackStore, RedisFallbackStore};
use janus_common::VerifyMetrics;

/// Verification counters, snapshot on demand for `/metrics`
#[derive(Default)]
pub struct Counters {
    pub passed: AtomicU64,
    pub failed: AtomicU64,
    pub fallbacks_triggered: AtomicU64,
    pub transport_errors: AtomicU64,
}

impl Counters {
    pub fn snapshot(&self) -> VerifyMetrics {
        VerifyMetrics {
            passed: self.passed.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            fallbacks_triggered: self.fallbacks_triggered.load(Ordering::Relaxed),
            transport_errors: self.transport_errors.load(Ordering::Relaxed),
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,

    /// Redis connection manager (auto-reconnecting)
    pub redis: ConnectionManager,

    /// Node identifier for logs/metrics
    pub node_id: String,

    /// Session-scoped fallback flag store
    pub fallback_store: Arc<dyn FallbackStore>,

    /// Dual-mode (v3 with v2 fallback) verifier
    pub verifier: Arc<DualVerifier>,

    /// Single-mode (v3 only) verifier
    pub simple_verifier: Arc<SimpleVerifier>,

    /// Verification counters
    pub counters: Arc<Counters>,
}

impl AppState {
    /// Create new application state, connecting to Redis
    pub async fn new(config: AppConfig) -> Result<Self> {
        // Connect to Redis with connection manager (handles reconnection)
        let client = redis::Client::open(config.redis_url.as_str())
            .context("Failed to create Redis client")?;

        let redis = ConnectionManager::new(client)
            .await
            .context("Failed to connect to Redis")?;

        let node_id = config.node_id.clone();

        // Initialize services
        let transport =
            Arc::new(SiteverifyClient::new().context("Failed to build siteverify client")?);
        let fallback_store: Arc<dyn FallbackStore> = Arc::new(RedisFallbackStore::new(
            redis.clone(),
            config.recaptcha.fallback_ttl_secs,
        ));

        let verifier = Arc::new(DualVerifier::new(
            &config.recaptcha,
            transport.clone(),
            fallback_store.clone(),
        )?);
        let simple_verifier = Arc::new(SimpleVerifier::new(
            config.recaptcha.secret_key_v3.clone(),
            config.recaptcha.score,
            transport,
        )?);

        Ok(Self {
            config,
            redis,
            node_id,
            fallback_store,
            verifier,
            simple_verifier,
            counters: Arc::new(Counters::default()),
        })
    }
}
