//! Extension API for project-specific pre-commit checks.
//!
//! An [`Extension`] receives the staged set and the failures recorded so far
//! and returns extra failure messages. [`ScriptExtension`] adapts an
//! executable in the clone's guard directory to this contract:
//!
//! - the script runs in the repository root,
//! - staged paths are written to its stdin, one per line,
//! - `GIT_GUARD_HOOK` and `GIT_GUARD_FAILURES` are set in its environment,
//! - every non-empty stdout line becomes a failure,
//! - a non-zero exit without output becomes a single failure.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::debug;

use crate::error::{CheckKind, Failure, GuardError, GuardReport};
use crate::types::staged::StagedSet;

/// State an extension may inspect.
pub struct ExtensionContext<'a> {
    pub hook: &'a str,
    pub repo_root: &'a Path,
    pub staged: &'a StagedSet,
    pub failures: &'a [Failure],
}

pub trait Extension {
    fn name(&self) -> &str;

    /// Returns additional failure messages; an empty list means the extension
    /// is satisfied.
    fn check(&self, ctx: &ExtensionContext<'_>) -> Result<Vec<String>, GuardError>;
}

/// Runs each extension and appends what it reports.
///
/// Extension errors are recorded like any other failure.
pub fn run_extensions(
    extensions: &[Box<dyn Extension>],
    hook: &str,
    repo_root: &Path,
    staged: &StagedSet,
    report: &mut GuardReport,
) {
    for extension in extensions {
        let ctx = ExtensionContext {
            hook,
            repo_root,
            staged,
            failures: &report.failures,
        };
        let outcome = extension.check(&ctx);
        match outcome {
            Ok(messages) => {
                debug!(extension = extension.name(), count = messages.len(), "extension finished");
                for message in messages {
                    report.push(Failure::error(CheckKind::Extension, message));
                }
            }
            Err(e) => report.push(Failure::error(
                CheckKind::Extension,
                format!("Extension '{}' failed: {e}", extension.name()),
            )),
        }
    }
}

/// An executable extension script.
#[derive(Debug, Clone)]
pub struct ScriptExtension {
    path: PathBuf,
}

impl ScriptExtension {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the extension when a file exists at `path`.
    pub fn discover(path: &Path) -> Option<Self> {
        path.is_file().then(|| Self::new(path))
    }
}

impl Extension for ScriptExtension {
    fn name(&self) -> &str {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("extension")
    }

    fn check(&self, ctx: &ExtensionContext<'_>) -> Result<Vec<String>, GuardError> {
        let mut stdin_data = String::new();
        for path in ctx.staged.all_paths() {
            stdin_data.push_str(path);
            stdin_data.push('\n');
        }

        let error_count = ctx.failures.iter().filter(|f| f.is_error()).count();
        let mut child = Command::new(&self.path)
            .current_dir(ctx.repo_root)
            .env("GIT_GUARD_HOOK", ctx.hook)
            .env("GIT_GUARD_FAILURES", error_count.to_string())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| {
                GuardError::Other(format!("cannot run {}: {e}", self.path.display()))
            })?;

        // stdin is fed from its own thread while stdout is drained here, so a
        // script may write before it reads without filling both pipes.
        let stdin = child.stdin.take();
        let (output, written) = std::thread::scope(|scope| {
            let writer = scope.spawn(move || -> std::io::Result<()> {
                let Some(mut stdin) = stdin else {
                    return Ok(());
                };
                // A script that ignores its input may close stdin early.
                match stdin.write_all(stdin_data.as_bytes()) {
                    Err(e) if e.kind() != std::io::ErrorKind::BrokenPipe => Err(e),
                    _ => Ok(()),
                }
            });
            let output = child.wait_with_output();
            let written = writer.join().unwrap_or_else(|_| {
                Err(std::io::Error::other("stdin writer thread panicked"))
            });
            (output, written)
        });
        let output = output?;
        written?;
        let mut messages: Vec<String> = String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect();

        if !output.status.success() && messages.is_empty() {
            let status = output
                .status
                .code()
                .map(|c| c.to_string())
                .unwrap_or_else(|| "signal".to_string());
            messages.push(format!("Extension '{}' exited with status {status}", self.name()));
        }

        Ok(messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    struct Fixed(Vec<&'static str>);

    impl Extension for Fixed {
        fn name(&self) -> &str {
            "fixed"
        }

        fn check(&self, ctx: &ExtensionContext<'_>) -> Result<Vec<String>, GuardError> {
            assert_eq!(ctx.hook, "pre-commit");
            Ok(self.0.iter().map(|s| s.to_string()).collect())
        }
    }

    struct Broken;

    impl Extension for Broken {
        fn name(&self) -> &str {
            "broken"
        }

        fn check(&self, _ctx: &ExtensionContext<'_>) -> Result<Vec<String>, GuardError> {
            Err(GuardError::Other("boom".into()))
        }
    }

    fn staged() -> StagedSet {
        StagedSet {
            files: vec!["a.yml".into(), "b.txt".into()],
            renames: Vec::new(),
        }
    }

    #[test]
    fn messages_and_errors_are_appended() {
        let extensions: Vec<Box<dyn Extension>> =
            vec![Box::new(Fixed(vec!["one", "two"])), Box::new(Broken)];
        let mut report = GuardReport::new();
        run_extensions(&extensions, "pre-commit", Path::new("."), &staged(), &mut report);

        let messages = report.messages_for(CheckKind::Extension);
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0], "one");
        assert!(messages[2].contains("'broken' failed: boom"));
    }

    #[test]
    fn discover_requires_a_file() {
        let tmp = TempDir::new().unwrap();
        assert!(ScriptExtension::discover(&tmp.path().join("nope")).is_none());
    }

    #[cfg(unix)]
    fn write_script(dir: &Path, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;
        let path = dir.join("pre-commit-extension");
        fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[cfg(unix)]
    #[test]
    fn script_receives_staged_paths_and_reports_lines() {
        let tmp = TempDir::new().unwrap();
        let script = write_script(
            tmp.path(),
            r#"while read -r f; do case "$f" in *.txt) echo "no text files: $f";; esac; done
echo "hook=$GIT_GUARD_HOOK failures=$GIT_GUARD_FAILURES""#,
        );
        let extension = ScriptExtension::discover(&script).unwrap();
        let staged = staged();
        let ctx = ExtensionContext {
            hook: "pre-commit",
            repo_root: tmp.path(),
            staged: &staged,
            failures: &[],
        };

        let messages = extension.check(&ctx).unwrap();
        assert_eq!(messages, vec!["no text files: b.txt", "hook=pre-commit failures=0"]);
    }

    #[cfg(unix)]
    #[test]
    fn silent_non_zero_exit_is_a_failure() {
        let tmp = TempDir::new().unwrap();
        let script = write_script(tmp.path(), "exit 3");
        let staged = staged();
        let ctx = ExtensionContext {
            hook: "pre-commit",
            repo_root: tmp.path(),
            staged: &staged,
            failures: &[],
        };

        let messages = ScriptExtension::new(script).check(&ctx).unwrap();
        assert_eq!(
            messages,
            vec!["Extension 'pre-commit-extension' exited with status 3"]
        );
    }

    #[cfg(unix)]
    #[test]
    fn script_may_write_before_reading_a_large_staged_list() {
        let tmp = TempDir::new().unwrap();
        let script = write_script(
            tmp.path(),
            "yes finding | head -n 20000\ncat > /dev/null",
        );
        let staged = StagedSet {
            files: (0..20_000).map(|i| format!("module/src/file-{i:05}.yml")).collect(),
            renames: Vec::new(),
        };
        let ctx = ExtensionContext {
            hook: "pre-commit",
            repo_root: tmp.path(),
            staged: &staged,
            failures: &[],
        };

        let messages = ScriptExtension::new(script).check(&ctx).unwrap();
        assert_eq!(messages.len(), 20_000);
        assert!(messages.iter().all(|m| m == "finding"));
    }

    #[cfg(unix)]
    #[test]
    fn silent_success_adds_nothing() {
        let tmp = TempDir::new().unwrap();
        let script = write_script(tmp.path(), "exit 0");
        let staged = staged();
        let ctx = ExtensionContext {
            hook: "pre-commit",
            repo_root: tmp.path(),
            staged: &staged,
            failures: &[],
        };
        assert!(ScriptExtension::new(script).check(&ctx).unwrap().is_empty());
    }
}
