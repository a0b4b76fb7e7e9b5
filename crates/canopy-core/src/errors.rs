//! Error types for the Canopy pipeline.
//!
//! Per-node problems are not errors: they are recorded as [`crate::Diagnostics`]
//! and processing continues. The enums here cover failures that stop a
//! document, a file, or a whole run.

use std::time::Duration;
use thiserror::Error;

/// Top-level error type for Canopy.
#[derive(Debug, Error)]
pub enum CanopyError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Output(#[from] OutputError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors reading the source document.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Invalid source document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Node not found: {id}")]
    NodeNotFound { id: String },

    #[error("Invalid token table: {0}")]
    InvalidTokens(String),
}

/// Errors from the document fetch collaborator.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Upstream request failed{}: {message}", .status.map(|s| format!(" with status {s}")).unwrap_or_default())]
    Upstream { status: Option<u16>, message: String },

    #[error("Rate limited{}", .retry_after.map(|d| format!(", retry after {}s", d.as_secs())).unwrap_or_default())]
    RateLimited { retry_after: Option<Duration> },

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Gave up after {attempts} attempts: {last}")]
    RetriesExhausted { attempts: u32, last: Box<FetchError> },
}

impl FetchError {
    /// Whether another attempt may succeed.
    ///
    /// Rate limits and server-side (5xx or transport) failures are retryable.
    /// Authentication failures never are.
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::RateLimited { .. } => true,
            FetchError::Upstream { status, .. } => status.map_or(true, |s| s >= 500),
            FetchError::Auth(_) | FetchError::RetriesExhausted { .. } => false,
        }
    }

    /// Server-provided wait hint, if any.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            FetchError::RateLimited { retry_after } => *retry_after,
            _ => None,
        }
    }
}

/// Errors from the persistence collaborator. Fatal for one file only.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to read {path}: {message}")]
    ReadFailed { path: String, message: String },

    #[error("Failed to write {path}: {message}")]
    WriteFailed { path: String, message: String },
}

/// Errors in conversion options.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}
