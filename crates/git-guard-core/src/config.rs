//! Repository discovery and guard configuration.
//!
//! Per-clone files (override sentinel, allow-list, extension script) live in
//! `<git-dir>/guard/` so they never travel with the repository. Shared
//! settings can be committed in an optional `.git-guard.json` at the
//! work-tree root.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::GuardError;
use crate::git::GitCli;

pub const CONFIG_FILE: &str = ".git-guard.json";
pub const GUARD_DIR: &str = "guard";
pub const OVERRIDE_FILE: &str = "allow-default-branch";
pub const ALLOWLIST_FILE: &str = "secret-allowlist";
pub const EXTENSION_FILE: &str = "pre-commit-extension";

/// Where the repository lives on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoLayout {
    pub root: PathBuf,
    pub git_dir: PathBuf,
}

impl RepoLayout {
    /// Locates the enclosing work tree of `start_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`GuardError::NotARepository`] when `start_dir` is not inside a
    /// git work tree (bare repositories included).
    pub fn discover(start_dir: &Path) -> Result<Self, GuardError> {
        let cli = GitCli::new(start_dir);
        let not_a_repo = || GuardError::NotARepository(start_dir.to_path_buf());

        let root = cli
            .try_run(&["rev-parse", "--show-toplevel"])?
            .filter(|r| !r.is_empty())
            .ok_or_else(not_a_repo)?;
        let git_dir = cli
            .try_run(&["rev-parse", "--git-common-dir"])?
            .filter(|d| !d.is_empty())
            .ok_or_else(not_a_repo)?;

        let git_dir = PathBuf::from(git_dir);
        let git_dir = if git_dir.is_absolute() {
            git_dir
        } else {
            start_dir.join(git_dir)
        };

        let layout = RepoLayout {
            root: PathBuf::from(root),
            git_dir,
        };
        debug!(root = %layout.root.display(), git_dir = %layout.git_dir.display(), "discovered repository");
        Ok(layout)
    }

    pub fn guard_dir(&self) -> PathBuf {
        self.git_dir.join(GUARD_DIR)
    }

    pub fn override_path(&self) -> PathBuf {
        self.guard_dir().join(OVERRIDE_FILE)
    }

    pub fn allowlist_path(&self) -> PathBuf {
        self.guard_dir().join(ALLOWLIST_FILE)
    }

    pub fn extension_path(&self) -> PathBuf {
        self.guard_dir().join(EXTENSION_FILE)
    }
}

/// Settings shared by both hooks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GuardConfig {
    /// Remote whose `HEAD` names the default branch.
    pub remote: String,
    /// Version manifest at the repository root.
    pub manifest: String,
    /// Extensions (with leading dot) scanned for secrets.
    pub secret_extensions: Vec<String>,
    /// File names skipped by the marker scan.
    pub marker_exclude: Vec<String>,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            remote: "origin".to_string(),
            manifest: "pom.xml".to_string(),
            secret_extensions: [".properties", ".yml", ".yaml", ".json"]
                .into_iter()
                .map(String::from)
                .collect(),
            marker_exclude: vec!["pre-commit".to_string(), "pre-push".to_string()],
        }
    }
}

impl GuardConfig {
    /// Loads `.git-guard.json` from `root`, falling back to defaults when the
    /// file is absent.
    pub fn load(root: &Path) -> Result<Self, GuardError> {
        let path = root.join(CONFIG_FILE);
        if !path.is_file() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(&path)?;
        let mut config: GuardConfig = serde_json::from_str(&content)?;
        config.normalize();
        debug!(path = %path.display(), ?config, "loaded guard config");
        Ok(config)
    }

    fn normalize(&mut self) {
        for ext in &mut self.secret_extensions {
            let lowered = ext.trim().to_ascii_lowercase();
            *ext = if lowered.starts_with('.') {
                lowered
            } else {
                format!(".{lowered}")
            };
        }
    }

    pub fn scans_for_secrets(&self, extension: &str) -> bool {
        self.secret_extensions.iter().any(|e| e == extension)
    }
}

/// Reads a per-clone list file: one entry per line, blank lines and `#`
/// comments ignored. A missing file is an empty list.
pub fn read_list_file(path: &Path) -> Result<Vec<String>, GuardError> {
    if !path.is_file() {
        return Ok(Vec::new());
    }
    let content = fs::read_to_string(path)?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(str::to_string)
        .collect())
}
