//! MyAnimeList API v2 client implementation.
//!
//! This module provides the REST client and the typed request options and
//! response envelopes it works with.

pub mod client;
pub mod types;

pub use client::MalClient;
pub use types::*;
