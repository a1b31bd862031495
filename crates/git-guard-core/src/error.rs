use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GuardError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("`git {command}` failed: {stderr}")]
    Git { command: String, stderr: String },

    #[error("Not inside a git working tree: {}", .0.display())]
    NotARepository(PathBuf),

    #[error("Malformed ref update line: {0:?}")]
    InvalidRefUpdate(String),

    #[error("Manifest error: {0}")]
    Manifest(String),

    #[error("{0}")]
    Other(String),
}

/// Which check produced a [`Failure`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckKind {
    BranchProtection,
    StagedFiles,
    ForbiddenMarker,
    SecretLeak,
    Extension,
    Revisions,
    ManifestVersion,
}

impl CheckKind {
    pub fn name(&self) -> &'static str {
        match self {
            CheckKind::BranchProtection => "branch-protection",
            CheckKind::StagedFiles => "staged-files",
            CheckKind::ForbiddenMarker => "forbidden-marker",
            CheckKind::SecretLeak => "secret-leak",
            CheckKind::Extension => "extension",
            CheckKind::Revisions => "revisions",
            CheckKind::ManifestVersion => "manifest-version",
        }
    }
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// A single finding recorded by a check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub check: CheckKind,
    pub severity: Severity,
    pub message: String,
    pub path: Option<PathBuf>,
}

impl Failure {
    pub fn error(check: CheckKind, message: impl Into<String>) -> Self {
        Self {
            check,
            severity: Severity::Error,
            message: message.into(),
            path: None,
        }
    }

    pub fn warning(check: CheckKind, message: impl Into<String>) -> Self {
        Self {
            check,
            severity: Severity::Warning,
            message: message.into(),
            path: None,
        }
    }

    pub fn with_path(mut self, path: impl AsRef<Path>) -> Self {
        self.path = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// Append-only accumulator threaded through one hook run.
///
/// Checks only ever push into the report; the pass/fail decision is taken
/// once by the caller via [`GuardReport::passed`].
#[derive(Debug, Clone, Default)]
pub struct GuardReport {
    pub failures: Vec<Failure>,
}

impl GuardReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, failure: Failure) {
        self.failures.push(failure);
    }

    /// Records a collaborator error hit while running `check`.
    pub fn record_error(&mut self, check: CheckKind, err: &GuardError) {
        self.push(Failure::error(check, format!("{check} check could not run: {err}")));
    }

    pub fn has_errors(&self) -> bool {
        self.failures.iter().any(Failure::is_error)
    }

    pub fn passed(&self) -> bool {
        !self.has_errors()
    }

    pub fn error_count(&self) -> usize {
        self.failures.iter().filter(|f| f.is_error()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.failures.len() - self.error_count()
    }

    pub fn errors(&self) -> impl Iterator<Item = &Failure> {
        self.failures.iter().filter(|f| f.is_error())
    }

    /// Error messages of the given check, in the order they were recorded.
    pub fn messages_for(&self, check: CheckKind) -> Vec<&str> {
        self.errors()
            .filter(|f| f.check == check)
            .map(|f| f.message.as_str())
            .collect()
    }
}
