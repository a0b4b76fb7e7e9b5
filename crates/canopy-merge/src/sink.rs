//! Persistence of generated files.

use crate::strategy::{plan_update, UpdateAction};
use canopy_core::diagnostics::{DiagnosticCode, Diagnostics};
use canopy_core::errors::OutputError;
use canopy_core::output::GeneratedFile;
use indexmap::IndexMap;
use serde::Serialize;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

/// Where generated files are read from and written to.
pub trait OutputSink {
    /// Current content at `path`, or `None` when there is no file.
    fn read(&self, path: &str) -> Result<Option<String>, OutputError>;

    fn write(&mut self, path: &str, content: &str) -> Result<(), OutputError>;
}

/// In-memory sink.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    files: IndexMap<String, String>,
    read_only: Vec<String>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: impl Into<String>, content: impl Into<String>) -> Self {
        self.files.insert(path.into(), content.into());
        self
    }

    /// Make writes to `path` fail.
    pub fn deny_writes(mut self, path: impl Into<String>) -> Self {
        self.read_only.push(path.into());
        self
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.files.get(path).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl OutputSink for MemorySink {
    fn read(&self, path: &str) -> Result<Option<String>, OutputError> {
        Ok(self.files.get(path).cloned())
    }

    fn write(&mut self, path: &str, content: &str) -> Result<(), OutputError> {
        if self.read_only.iter().any(|p| p == path) {
            return Err(OutputError::WriteFailed { path: path.to_string(), message: "read-only".into() });
        }
        self.files.insert(path.to_string(), content.to_string());
        Ok(())
    }
}

/// Sink rooted at a directory on disk.
#[derive(Debug, Clone)]
pub struct FsSink {
    root: PathBuf,
}

impl FsSink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl OutputSink for FsSink {
    fn read(&self, path: &str) -> Result<Option<String>, OutputError> {
        match fs::read_to_string(self.root.join(path)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(OutputError::ReadFailed { path: path.to_string(), message: e.to_string() }),
        }
    }

    fn write(&mut self, path: &str, content: &str) -> Result<(), OutputError> {
        let target = self.root.join(path);
        let fail = |e: std::io::Error| OutputError::WriteFailed { path: path.to_string(), message: e.to_string() };
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(fail)?;
        }
        fs::write(&target, content).map_err(fail)
    }
}

/// Outcome for one file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileOutcome {
    pub path: String,
    pub action: UpdateAction,
    /// Set when reading or writing the file failed.
    pub error: Option<String>,
}

/// Outcome of writing a set of files.
#[derive(Debug, Clone, Default, Serialize)]
pub struct WriteReport {
    pub outcomes: Vec<FileOutcome>,
    pub diagnostics: Diagnostics,
}

impl WriteReport {
    pub fn count(&self, action: UpdateAction) -> usize {
        self.outcomes.iter().filter(|o| o.action == action && o.error.is_none()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.error.is_some()).count()
    }
}

/// Plan and write every file. A failure affects only its own file.
pub fn apply_updates<S: OutputSink + ?Sized>(sink: &mut S, files: &[GeneratedFile]) -> WriteReport {
    let mut report = WriteReport::default();
    for file in files {
        let previous = match sink.read(&file.path) {
            Ok(previous) => previous,
            Err(e) => {
                record_failure(&mut report, &file.path, UpdateAction::Overwrite, e);
                continue;
            }
        };
        let plan = plan_update(previous.as_deref(), &file.content);
        report.diagnostics.extend(plan.diagnostics);

        let result = match &plan.content {
            Some(content) => sink.write(&file.path, content),
            None => Ok(()),
        };
        match result {
            Ok(()) => {
                log::debug!("{:?} {}", plan.action, file.path);
                report.outcomes.push(FileOutcome { path: file.path.clone(), action: plan.action, error: None });
            }
            Err(e) => record_failure(&mut report, &file.path, plan.action, e),
        }
    }
    report
}

fn record_failure(report: &mut WriteReport, path: &str, action: UpdateAction, error: OutputError) {
    log::warn!("{}", error);
    report.diagnostics.error(DiagnosticCode::OutputWriteFailed, None, error.to_string());
    report.outcomes.push(FileOutcome { path: path.to_string(), action, error: Some(error.to_string()) });
}
