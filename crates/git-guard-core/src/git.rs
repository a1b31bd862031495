//! The version-control collaborator.
//!
//! Every repository query the guards need goes through the [`Vcs`] trait.
//! [`GitCli`] answers those queries by running the `git` binary; tests swap
//! in an in-memory implementation.

use std::path::PathBuf;
use std::process::{Command, Output};

use tracing::debug;

use crate::error::GuardError;
use crate::types::staged::{parse_name_status, StagedChange};

/// Hash of the empty tree in a SHA-1 repository.
pub const EMPTY_TREE: &str = "4b825dc642cb6eb9a060e54bf8d69288fbee4904";

/// Object id git uses for "no object" in hook input.
pub const ZERO_OID: &str = "0000000000000000000000000000000000000000";

pub trait Vcs {
    /// Short name of the branch `refs/remotes/<remote>/HEAD` points at.
    fn default_branch(&self, remote: &str) -> Result<Option<String>, GuardError>;

    /// Checked-out branch name, `None` when HEAD is detached.
    fn current_branch(&self) -> Result<Option<String>, GuardError>;

    /// Id of the empty tree in this repository's object format, the diff
    /// baseline before the first commit.
    fn empty_tree(&self) -> Result<String, GuardError>;

    /// Resolves a revision to an object id, `None` if it does not exist.
    fn resolve(&self, rev: &str) -> Result<Option<String>, GuardError>;

    /// Changes staged in the index relative to `baseline`.
    fn staged_changes(&self, baseline: &str) -> Result<Vec<StagedChange>, GuardError>;

    /// Unified diff of one path between `baseline` and the index.
    fn staged_diff(&self, baseline: &str, path: &str) -> Result<String, GuardError>;

    /// Unified diff of `paths` between two revisions.
    fn diff(&self, from: &str, to: &str, paths: &[&str]) -> Result<String, GuardError>;

    /// Commits reachable from `tips` but from no remote-tracking ref, newest first.
    fn unpushed_revisions(&self, tips: &[String]) -> Result<Vec<String>, GuardError>;

    /// Content of `path` as of `rev`, `None` if either does not exist.
    fn file_at(&self, rev: &str, path: &str) -> Result<Option<String>, GuardError>;
}

/// [`Vcs`] backed by the `git` command line.
#[derive(Debug, Clone)]
pub struct GitCli {
    workdir: PathBuf,
}

impl GitCli {
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
        }
    }

    fn output(&self, args: &[&str]) -> Result<Output, GuardError> {
        debug!(args = ?args, "running git");
        Command::new("git")
            .args(args)
            .current_dir(&self.workdir)
            .output()
            .map_err(|e| GuardError::Other(format!("Failed to run git: {e}")))
    }

    /// Runs git and returns stdout, failing on a non-zero exit.
    pub fn run(&self, args: &[&str]) -> Result<String, GuardError> {
        let output = self.output(args)?;
        if !output.status.success() {
            return Err(GuardError::Git {
                command: args.join(" "),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Runs git and returns trimmed stdout, or `None` on a non-zero exit.
    pub fn try_run(&self, args: &[&str]) -> Result<Option<String>, GuardError> {
        let output = self.output(args)?;
        if !output.status.success() {
            return Ok(None);
        }
        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Ok(Some(stdout))
    }

    /// Resolves a `git rev-parse --git-path` style path against the workdir.
    pub fn git_path(&self, name: &str) -> Result<PathBuf, GuardError> {
        let raw = self.run(&["rev-parse", "--git-path", name])?;
        let path = PathBuf::from(raw.trim());
        if path.is_absolute() {
            Ok(path)
        } else {
            Ok(self.workdir.join(path))
        }
    }
}

impl Vcs for GitCli {
    fn default_branch(&self, remote: &str) -> Result<Option<String>, GuardError> {
        let symref = format!("refs/remotes/{remote}/HEAD");
        let target = self.try_run(&["symbolic-ref", "-q", &symref])?;
        let prefix = format!("refs/remotes/{remote}/");
        Ok(target
            .and_then(|t| t.strip_prefix(&prefix).map(str::to_string))
            .filter(|b| !b.is_empty()))
    }

    fn current_branch(&self) -> Result<Option<String>, GuardError> {
        let head = self.try_run(&["symbolic-ref", "-q", "--short", "HEAD"])?;
        Ok(head.filter(|b| !b.is_empty()))
    }

    fn empty_tree(&self) -> Result<String, GuardError> {
        let oid = self.run(&["hash-object", "-t", "tree", "/dev/null"])?;
        Ok(oid.trim().to_string())
    }

    fn resolve(&self, rev: &str) -> Result<Option<String>, GuardError> {
        let spec = format!("{rev}^{{commit}}");
        let oid = self.try_run(&["rev-parse", "--verify", "-q", &spec])?;
        Ok(oid.filter(|o| !o.is_empty()))
    }

    fn staged_changes(&self, baseline: &str) -> Result<Vec<StagedChange>, GuardError> {
        let raw = self.run(&[
            "diff",
            "--cached",
            "--name-status",
            "-z",
            "-M",
            "--no-color",
            baseline,
        ])?;
        parse_name_status(&raw)
    }

    fn staged_diff(&self, baseline: &str, path: &str) -> Result<String, GuardError> {
        self.run(&[
            "diff",
            "--cached",
            "--no-color",
            "--no-ext-diff",
            "--unified=0",
            baseline,
            "--",
            path,
        ])
    }

    fn diff(&self, from: &str, to: &str, paths: &[&str]) -> Result<String, GuardError> {
        let mut args = vec![
            "diff",
            "--no-color",
            "--no-ext-diff",
            "--unified=0",
            from,
            to,
            "--",
        ];
        args.extend_from_slice(paths);
        self.run(&args)
    }

    fn unpushed_revisions(&self, tips: &[String]) -> Result<Vec<String>, GuardError> {
        if tips.is_empty() {
            return Ok(Vec::new());
        }
        let mut args = vec!["rev-list", "--topo-order"];
        args.extend(tips.iter().map(String::as_str));
        args.extend(["--not", "--remotes"]);
        let raw = self.run(&args)?;
        Ok(raw
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect())
    }

    fn file_at(&self, rev: &str, path: &str) -> Result<Option<String>, GuardError> {
        let spec = format!("{rev}:{path}");
        let output = self.output(&["show", &spec])?;
        if !output.status.success() {
            return Ok(None);
        }
        Ok(Some(String::from_utf8_lossy(&output.stdout).into_owned()))
    }
}
