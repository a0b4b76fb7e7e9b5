//! Generated artifacts.

use serde::{Deserialize, Serialize};

/// Role of a generated file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileKind {
    Component,
    Types,
    Stylesheet,
    Index,
    Theme,
}

/// One generated file, with a path relative to the output root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedFile {
    pub path: String,
    pub content: String,
    pub kind: FileKind,
}

impl GeneratedFile {
    pub fn new(path: impl Into<String>, content: impl Into<String>, kind: FileKind) -> Self {
        Self { path: path.into(), content: content.into(), kind }
    }
}
