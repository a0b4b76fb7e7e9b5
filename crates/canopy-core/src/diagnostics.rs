//! Diagnostics accumulated during a conversion run.
//!
//! Diagnostics are first-class output, kept apart from generated artifacts so
//! callers can assert a clean run instead of scraping logs.

use serde::Serialize;
use std::fmt;

/// Severity of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Warning,
    Error,
}

/// Machine-readable diagnostic category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticCode {
    /// A referenced node or component could not be found.
    NodeNotFound,
    /// A source node could not be parsed; a placeholder was emitted.
    NodeParseFailure,
    /// A style feature has no direct representation; a fallback was applied.
    UnsupportedStyle,
    /// A container positions its children manually.
    NoAutoLayout,
    /// The node probably needs interactive behavior wired by hand.
    InteractionHint,
    /// A user block start marker has no matching end marker.
    UnterminatedBlock,
    /// A generated file could not be written.
    OutputWriteFailed,
    /// A whole component failed to generate.
    ComponentFailed,
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::NodeNotFound => "node-not-found",
            Self::NodeParseFailure => "node-parse-failure",
            Self::UnsupportedStyle => "unsupported-style",
            Self::NoAutoLayout => "no-auto-layout",
            Self::InteractionHint => "interaction-hint",
            Self::UnterminatedBlock => "unterminated-block",
            Self::OutputWriteFailed => "output-write-failed",
            Self::ComponentFailed => "component-failed",
        };
        f.write_str(s)
    }
}

/// A single diagnostic.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: DiagnosticCode,
    /// Source node the diagnostic refers to, when there is one.
    pub node_id: Option<String>,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        match &self.node_id {
            Some(id) => write!(f, "{level}[{}] {id}: {}", self.code, self.message),
            None => write!(f, "{level}[{}]: {}", self.code, self.message),
        }
    }
}

/// Ordered collection of diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a warning.
    pub fn warn(&mut self, code: DiagnosticCode, node_id: Option<&str>, message: impl Into<String>) {
        self.push(Severity::Warning, code, node_id, message.into());
    }

    /// Record an error.
    pub fn error(&mut self, code: DiagnosticCode, node_id: Option<&str>, message: impl Into<String>) {
        self.push(Severity::Error, code, node_id, message.into());
    }

    fn push(&mut self, severity: Severity, code: DiagnosticCode, node_id: Option<&str>, message: String) {
        self.entries.push(Diagnostic {
            severity,
            code,
            node_id: node_id.map(str::to_string),
            message,
        });
    }

    /// Append all diagnostics from another collection.
    pub fn extend(&mut self, other: Diagnostics) {
        self.entries.extend(other.entries);
    }

    /// True when nothing was recorded.
    pub fn is_clean(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().filter(|d| d.severity == Severity::Warning)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().filter(|d| d.severity == Severity::Error)
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    /// Number of diagnostics with the given code.
    pub fn count(&self, code: DiagnosticCode) -> usize {
        self.entries.iter().filter(|d| d.code == code).count()
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
