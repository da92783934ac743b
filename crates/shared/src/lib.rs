//! Shared configuration and error types for Photodrop.
//!
//! This crate provides common types used across all other crates:
//! - Layered application configuration (files + environment)
//! - Application-wide error types mapped to HTTP status codes

pub mod config;
pub mod error;

pub use config::{AppConfig, CorsConfig, MediaConfig, ServerConfig, StorageBackend, StorageConfig};
pub use error::{AppError, AppResult};
