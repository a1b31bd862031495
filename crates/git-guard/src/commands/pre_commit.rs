//! CLI handler for `git-guard pre-commit`.

use git_guard_core::checks::HookContext;
use git_guard_core::extension::{Extension, ScriptExtension};
use git_guard_core::hooks::pre_commit::HOOK_NAME;
use git_guard_core::GitCli;

use super::open_repository;
use crate::output::Reporter;

const BYPASS_HINT: &str = "Fix the problems above and re-stage your changes with `git add` before \
                           committing again, or bypass these checks with `git commit --no-verify`.";

/// Runs the pre-commit guard against the current repository.
///
/// Returns `true` when every check passed.
pub fn run_pre_commit(reporter: &mut Reporter) -> bool {
    let Some((layout, config)) = open_repository(reporter) else {
        return false;
    };

    let vcs = GitCli::new(&layout.root);
    let extensions: Vec<Box<dyn Extension>> = ScriptExtension::discover(&layout.extension_path())
        .map(|e| Box::new(e) as Box<dyn Extension>)
        .into_iter()
        .collect();

    reporter.info("Running pre-commit checks");

    let ctx = HookContext {
        vcs: &vcs,
        layout: &layout,
        config: &config,
    };
    let report = git_guard_core::hooks::run_pre_commit(&ctx, &extensions);
    reporter.report_guard(HOOK_NAME, &report, BYPASS_HINT);

    report.passed()
}
