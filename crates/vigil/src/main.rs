//! # Vigil - Janus Verification Engine
//!
//! Gates configured form actions behind Google reCAPTCHA: v3 score-based
//! verification with a one-shot fallback to the v2 checkbox when the
//! score is too low or v3 fails.
//!
//! ## Architecture
//! ```text
//! Web app → Vigil → siteverify (Google)
//!              ↓
//!           Redis (fallback flags)
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod config;
mod recaptcha;
mod render;
mod routes;
mod session;
mod state;

use config::AppConfig;
use state::AppState;

/// Janus Vigil - reCAPTCHA verification engine
#[derive(Parser, Debug)]
#[command(name = "vigil")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config/vigil.toml")]
    config: String,

    /// Redis URL (overrides config)
    #[arg(long, env = "REDIS_URL")]
    redis_url: Option<String>,

    /// Listen address (overrides config)
    #[arg(short, long, env = "LISTEN_ADDR")]
    listen: Option<String>,

    /// reCAPTCHA v3 secret key (overrides config)
    #[arg(long, env = "RECAPTCHA_V3_SECRET")]
    v3_secret: Option<String>,

    /// reCAPTCHA v2 secret key (overrides config; enables fallback)
    #[arg(long, env = "RECAPTCHA_V2_SECRET")]
    v2_secret: Option<String>,

    /// reCAPTCHA v3 site key (overrides config)
    #[arg(long, env = "RECAPTCHA_V3_SITE_KEY")]
    v3_site_key: Option<String>,

    /// reCAPTCHA v2 site key (overrides config)
    #[arg(long, env = "RECAPTCHA_V2_SITE_KEY")]
    v2_site_key: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "LOG_LEVEL")]
    log_level: String,

    /// Enable JSON logging output
    #[arg(long, default_value = "false")]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Pick up a local .env before reading env-backed arguments
    dotenvy::dotenv().ok();

    // Parse CLI arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(&args.log_level, args.json_logs)?;

    info!("🚪 Starting Janus Vigil v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = AppConfig::load(&args.config, &args)?;
    info!("📋 Configuration loaded from {}", args.config);

    // Fail fast on a half-configured verifier
    config.recaptcha.validate().context("Invalid reCAPTCHA configuration")?;

    // Initialize application state
    let state = AppState::new(config.clone()).await?;
    info!("✅ Redis connected: {}", config.redis_url);

    if config.recaptcha.secret_key_v2.is_empty() {
        info!("v2 secret not configured, running v3-only (no fallback)");
    }

    // Build router
    let app = routes::create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    info!("🚀 Vigil listening on {}", config.listen_addr);

    // Handle graceful shutdown
    let shutdown_signal = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
        info!("🛑 Shutdown signal received");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await
        .context("Server error")?;

    info!("👋 Vigil shutdown complete");
    Ok(())
}

/// Initialize structured logging with tracing
fn init_logging(level: &str, json: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_thread_ids(true))
            .init();
    }

    Ok(())
}
