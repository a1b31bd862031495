//! Native hook shim installation.
//!
//! Writes small `sh` scripts into the repository's hooks directory that hand
//! over to `git-guard`. Hooks written by someone else are left alone unless
//! the caller forces an overwrite.

use std::fs;
use std::path::Path;

use crate::error::GuardError;

/// Marker line identifying a shim written by git-guard.
const SHIM_MARKER: &str = "# installed by git-guard";

fn shim(hook: &str) -> String {
    let args = if hook == "pre-push" { " \"$@\"" } else { "" };
    format!("#!/bin/sh\n{SHIM_MARKER}\nexec git-guard {hook}{args}\n")
}

/// Installs the pre-commit and pre-push shims into `hooks_dir`.
///
/// Returns a human-readable description of what was done.
///
/// # Errors
///
/// Returns [`GuardError::Other`] if a hook not written by git-guard already
/// exists and `force` is not set; IO errors are propagated.
pub fn install_hooks(hooks_dir: &Path, force: bool) -> Result<String, GuardError> {
    fs::create_dir_all(hooks_dir)?;

    let mut actions = Vec::new();

    for hook_name in ["pre-commit", "pre-push"] {
        let hook_path = hooks_dir.join(hook_name);
        let content = shim(hook_name);

        if hook_path.exists() {
            let existing = fs::read_to_string(&hook_path)?;
            if existing == content {
                actions.push(format!("Already installed: {}", hook_path.display()));
                continue;
            }
            if !existing.contains(SHIM_MARKER) && !force {
                return Err(GuardError::Other(format!(
                    "{} already exists and was not written by git-guard (use --force to replace it)",
                    hook_path.display()
                )));
            }
        }

        fs::write(&hook_path, &content)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = fs::Permissions::from_mode(0o755);
            fs::set_permissions(&hook_path, perms)?;
        }

        actions.push(format!("Created {}", hook_path.display()));
    }

    Ok(format!("Installed git hooks:\n  {}", actions.join("\n  ")))
}
