use tracing::debug;

use crate::checks::HookContext;
use crate::error::{CheckKind, Failure, GuardError, GuardReport};

/// Refuses commits made directly on the remote's default branch.
///
/// The check is disabled for a clone by creating the override sentinel
/// (`<git-dir>/guard/allow-default-branch`). When the default branch cannot
/// be resolved a warning is recorded and nothing else happens.
pub fn check_branch_protection(
    ctx: &HookContext<'_>,
    report: &mut GuardReport,
) -> Result<(), GuardError> {
    let sentinel = ctx.layout.override_path();
    if sentinel.exists() {
        debug!(path = %sentinel.display(), "branch protection disabled by override");
        return Ok(());
    }

    let Some(default_branch) = ctx.vcs.default_branch(&ctx.config.remote)? else {
        report.push(Failure::warning(
            CheckKind::BranchProtection,
            format!(
                "Default branch of remote '{}' is unknown; branch protection skipped \
                 (run `git remote set-head {} --auto`)",
                ctx.config.remote, ctx.config.remote
            ),
        ));
        return Ok(());
    };

    let current = ctx.vcs.current_branch()?;
    debug!(%default_branch, ?current, "branch protection");

    if current.as_deref() == Some(default_branch.as_str()) {
        report.push(Failure::error(
            CheckKind::BranchProtection,
            format!(
                "Committing directly to the default branch '{default_branch}' is not allowed. \
                 Create a topic branch, or create {} to disable this check for this clone.",
                sentinel.display()
            ),
        ));
    }

    Ok(())
}
