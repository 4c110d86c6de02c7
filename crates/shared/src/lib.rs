//! Shared library for the moe-meta metadata clients.
//!
//! This crate provides common functionality used by both API clients:
//! - Configuration management
//! - Logging infrastructure
//! - The shared error taxonomy
//! - Media records and the offset/limit paging cursor

pub mod config;
pub mod error;
pub mod logging;
pub mod models;

// Re-export commonly used types
pub use config::{AnilistConfig, Config, HttpConfig, MalConfig};
pub use error::{ApiError, ApiResult};
pub use logging::LogConfig;
pub use models::*;
