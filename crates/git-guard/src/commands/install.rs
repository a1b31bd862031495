//! CLI handler for `git-guard install`.

use git_guard_core::hooks::install_hooks;
use git_guard_core::GitCli;

use super::open_repository;
use crate::output::Reporter;

/// Installs hook shims into the repository's hooks directory, honouring
/// `core.hooksPath`.
pub fn run_install(force: bool, reporter: &mut Reporter) -> bool {
    let Some((layout, _config)) = open_repository(reporter) else {
        return false;
    };

    let hooks_dir = match GitCli::new(&layout.root).git_path("hooks") {
        Ok(dir) => dir,
        Err(e) => {
            reporter.error(&format!("Cannot locate the hooks directory: {e}"));
            return false;
        }
    };

    match install_hooks(&hooks_dir, force) {
        Ok(msg) => {
            reporter.success(&msg);
            true
        }
        Err(e) => {
            reporter.error(&format!("Failed to install hooks: {e}"));
            false
        }
    }
}
