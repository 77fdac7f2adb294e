//! Shared utilities, configuration, and error handling for Slotline
//!
//! This crate provides common functionality used across the Slotline services:
//! - Configuration management following 12-factor principles
//! - Error types and their HTTP mapping
//! - The `{status, data}` response envelope
//! - Request extractors (validated JSON, pagination, API version)

pub mod config;
pub mod db;
pub mod envelope;
pub mod error;
pub mod extractors;

pub use db::RepositoryError;
pub use envelope::{ApiResponse, ApiStatus};
pub use error::{Error, Result};
pub use extractors::{ApiVersion, Pagination, ValidatedJson, API_VERSION_HEADER, SUPPORTED_API_VERSIONS};
