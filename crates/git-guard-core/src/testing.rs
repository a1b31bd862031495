//! Shared fixtures for unit tests: real scratch repositories and an
//! in-memory [`Vcs`].

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::process::Command;

use crate::error::GuardError;
use crate::git::{Vcs, EMPTY_TREE};
use crate::types::staged::StagedChange;

pub fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("failed to spawn git");
    assert!(
        output.status.success(),
        "git {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// `git init` on branch `main` with a local identity.
pub fn init_repo(dir: &Path) {
    git(dir, &["init", "-q"]);
    git(dir, &["symbolic-ref", "HEAD", "refs/heads/main"]);
    git(dir, &["config", "user.name", "Guard Test"]);
    git(dir, &["config", "user.email", "guard@example.com"]);
    git(dir, &["config", "commit.gpgsign", "false"]);
}

pub fn commit_all(dir: &Path, message: &str) {
    git(dir, &["add", "-A"]);
    git(dir, &["commit", "-q", "--no-verify", "-m", message]);
}

#[derive(Debug, Default)]
pub struct FakeVcs {
    pub default_branch: Option<String>,
    pub current_branch: Option<String>,
    pub revisions: HashSet<String>,
    pub staged: Vec<StagedChange>,
    pub staged_diffs: HashMap<String, String>,
    /// Keyed by `(from, to)`.
    pub diffs: HashMap<(String, String), String>,
    pub unpushed: Vec<String>,
    /// Keyed by `(rev, path)`.
    pub files: HashMap<(String, String), String>,
}

impl FakeVcs {
    pub fn with_revision(mut self, rev: &str) -> Self {
        self.revisions.insert(rev.to_string());
        self
    }

    pub fn with_staged_diff(mut self, path: &str, diff: &str) -> Self {
        self.staged_diffs.insert(path.to_string(), diff.to_string());
        self
    }

    pub fn with_file(mut self, rev: &str, path: &str, content: &str) -> Self {
        self.files
            .insert((rev.to_string(), path.to_string()), content.to_string());
        self
    }
}

impl Vcs for FakeVcs {
    fn default_branch(&self, _remote: &str) -> Result<Option<String>, GuardError> {
        Ok(self.default_branch.clone())
    }

    fn current_branch(&self) -> Result<Option<String>, GuardError> {
        Ok(self.current_branch.clone())
    }

    fn empty_tree(&self) -> Result<String, GuardError> {
        Ok(EMPTY_TREE.to_string())
    }

    fn resolve(&self, rev: &str) -> Result<Option<String>, GuardError> {
        Ok(self.revisions.get(rev).cloned())
    }

    fn staged_changes(&self, _baseline: &str) -> Result<Vec<StagedChange>, GuardError> {
        Ok(self.staged.clone())
    }

    fn staged_diff(&self, _baseline: &str, path: &str) -> Result<String, GuardError> {
        Ok(self.staged_diffs.get(path).cloned().unwrap_or_default())
    }

    fn diff(&self, from: &str, to: &str, _paths: &[&str]) -> Result<String, GuardError> {
        Ok(self
            .diffs
            .get(&(from.to_string(), to.to_string()))
            .cloned()
            .unwrap_or_default())
    }

    fn unpushed_revisions(&self, _tips: &[String]) -> Result<Vec<String>, GuardError> {
        Ok(self.unpushed.clone())
    }

    fn file_at(&self, rev: &str, path: &str) -> Result<Option<String>, GuardError> {
        Ok(self.files.get(&(rev.to_string(), path.to_string())).cloned())
    }
}

/// A one-hunk unified diff adding `added` and removing `removed` in `path`.
pub fn unified(path: &str, added: &[&str], removed: &[&str]) -> String {
    let mut diff = format!("diff --git a/{path} b/{path}\n--- a/{path}\n+++ b/{path}\n@@ -1 +1 @@\n");
    for line in removed {
        diff.push_str(&format!("-{line}\n"));
    }
    for line in added {
        diff.push_str(&format!("+{line}\n"));
    }
    diff
}
