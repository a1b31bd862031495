//! Pre-push guard: revision examination and manifest version enforcement.

use tracing::debug;

use crate::checks::{check_manifest_version, examine_revisions, HookContext};
use crate::error::{CheckKind, GuardReport};
use crate::types::push::parse_ref_updates;

pub const HOOK_NAME: &str = "pre-push";

/// Runs every pre-push check over the ref updates read from stdin.
///
/// `remote` is the remote name git passes as the hook's first argument.
pub fn run_pre_push(ctx: &HookContext<'_>, remote: &str, input: &str) -> GuardReport {
    let mut report = GuardReport::new();

    let (updates, errors) = parse_ref_updates(input);
    for e in &errors {
        report.record_error(CheckKind::Revisions, e);
    }

    let plans = examine_revisions(&updates);
    debug!(remote, updates = plans.len(), "revisions examined");

    if let Err(e) = check_manifest_version(ctx, remote, &updates, &mut report) {
        report.record_error(CheckKind::ManifestVersion, &e);
    }

    report
}
