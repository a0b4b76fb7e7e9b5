//! Error types for code generation.

use canopy_core::errors::{ConfigError, SourceError};
use thiserror::Error;

/// Result type alias for codegen operations.
pub type Result<T> = std::result::Result<T, CodegenError>;

/// Errors that can occur during code generation.
#[derive(Error, Debug)]
pub enum CodegenError {
    /// Template rendering error.
    #[error("Template error: {0}")]
    TemplateError(#[from] handlebars::RenderError),

    /// Invalid template.
    #[error("Invalid template: {0}")]
    InvalidTemplate(#[from] handlebars::TemplateError),

    /// Invalid or unreadable source document.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// Invalid conversion options.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A component produced no output.
    #[error("Component '{name}' failed: {message}")]
    ComponentFailed { name: String, message: String },
}
