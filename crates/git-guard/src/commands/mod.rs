pub mod completions;
pub mod install;
pub mod pre_commit;
pub mod pre_push;

use git_guard_core::{GuardConfig, RepoLayout};

use crate::output::Reporter;

/// Locates the repository around the current directory and loads its config,
/// reporting an error if either fails.
pub(crate) fn open_repository(reporter: &mut Reporter) -> Option<(RepoLayout, GuardConfig)> {
    let cwd = match std::env::current_dir() {
        Ok(c) => c,
        Err(e) => {
            reporter.error(&format!("Cannot get current directory: {e}"));
            return None;
        }
    };

    let layout = match RepoLayout::discover(&cwd) {
        Ok(l) => l,
        Err(e) => {
            reporter.error(&format!("{e}"));
            return None;
        }
    };

    match GuardConfig::load(&layout.root) {
        Ok(config) => Some((layout, config)),
        Err(e) => {
            reporter.error(&format!("Failed to load {}: {e}", git_guard_core::config::CONFIG_FILE));
            None
        }
    }
}
