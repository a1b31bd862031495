//! CLI handler for `git-guard pre-push <remote> <url>`.

use std::io::Read;

use git_guard_core::checks::HookContext;
use git_guard_core::hooks::pre_push::HOOK_NAME;
use git_guard_core::GitCli;
use tracing::debug;

use super::open_repository;
use crate::output::Reporter;

const BYPASS_HINT: &str =
    "Fix the problems above and push again, or bypass these checks with `git push --no-verify`.";

/// Runs the pre-push guard, reading ref updates from stdin.
///
/// Returns `true` when every check passed.
pub fn run_pre_push(remote: &str, url: Option<&str>, reporter: &mut Reporter) -> bool {
    let Some((layout, config)) = open_repository(reporter) else {
        return false;
    };

    let mut input = String::new();
    if let Err(e) = std::io::stdin().read_to_string(&mut input) {
        reporter.error(&format!("Cannot read ref updates from stdin: {e}"));
        return false;
    }
    debug!(remote, ?url, lines = input.lines().count(), "pre-push input");

    reporter.info(&format!("Running pre-push checks for {remote}"));

    let vcs = GitCli::new(&layout.root);
    let ctx = HookContext {
        vcs: &vcs,
        layout: &layout,
        config: &config,
    };
    let report = git_guard_core::hooks::run_pre_push(&ctx, remote, &input);
    reporter.report_guard(HOOK_NAME, &report, BYPASS_HINT);

    report.passed()
}
