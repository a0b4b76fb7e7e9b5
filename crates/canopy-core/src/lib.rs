//! Core types for the Canopy design-to-code compiler.
//!
//! This crate provides the foundational types used across all other canopy crates:
//! - The source document model delivered by the design tool
//! - The neutral intermediate representation (IR) tree
//! - The design token table
//! - Diagnostics and error types
//! - The document fetch collaborator interface
//! - Generated file artifacts

pub mod diagnostics;
pub mod errors;
pub mod fetch;
pub mod ir;
pub mod output;
pub mod source;
pub mod tokens;

pub use diagnostics::{Diagnostic, DiagnosticCode, Diagnostics, Severity};
pub use errors::*;
pub use fetch::{fetch_with_retry, DocumentSource, RetryPolicy};
pub use ir::*;
pub use output::{FileKind, GeneratedFile};
pub use source::{SourceChild, SourceDocument, SourceNode};
pub use tokens::{DesignTokens, TokenPath, TypographyToken};
