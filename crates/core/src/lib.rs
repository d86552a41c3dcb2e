//! Core types and shared functionality for cryptotrack.
//!
//! This crate provides:
//! - In-memory TTL cache for upstream market-data payloads
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;

pub use cache::TtlCache;
pub use config::{AppConfig, ConfigError, TtlConfig};
pub use error::Error;
