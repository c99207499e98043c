//! # Janus Common
//!
//! Shared types, errors, and constants used across Janus components.
//!
//! ## Modules
//! - `types` - Core data structures (RecaptchaMode, SiteverifyResponse, etc.)
//! - `error` - Common error types
//! - `constants` - Shared configuration constants

pub mod constants;
pub mod error;
pub mod types;

pub use error::JanusError;
pub use types::*;
