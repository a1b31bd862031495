//! Version-bump enforcement for the root manifest.
//!
//! Every push that introduces commits must raise the manifest version above
//! a baseline. On the default branch the baseline is the manifest just
//! before the pushed sequence (the parent of its oldest commit). On any other
//! branch it is the manifest on the default branch's remote-tracking tip.

use tracing::debug;

use crate::checks::HookContext;
use crate::error::{CheckKind, Failure, GuardError, GuardReport};
use crate::types::push::RefUpdate;
use crate::version::{parse_manifest_version, VersionTriple};

/// Where the comparison baseline was read from, for messages.
struct Baseline {
    version: VersionTriple,
    source: String,
}

pub fn check_manifest_version(
    ctx: &HookContext<'_>,
    remote: &str,
    updates: &[RefUpdate],
    report: &mut GuardReport,
) -> Result<(), GuardError> {
    let manifest = ctx.config.manifest.as_str();
    if !ctx.layout.root.join(manifest).is_file() {
        debug!(manifest, "no manifest at repository root, version check skipped");
        return Ok(());
    }

    let tips: Vec<String> = updates
        .iter()
        .filter(|u| !u.is_delete())
        .map(|u| u.local_oid.clone())
        .collect();
    let revisions = ctx.vcs.unpushed_revisions(&tips)?;
    let (Some(newest), Some(oldest)) = (revisions.first(), revisions.last()) else {
        debug!("push introduces no new commits, version check passes");
        return Ok(());
    };
    debug!(%newest, %oldest, count = revisions.len(), "unpushed revisions");

    let Some(content) = ctx.vcs.file_at(newest, manifest)? else {
        report.push(Failure::warning(
            CheckKind::ManifestVersion,
            format!("{manifest} does not exist in {newest}; version check skipped"),
        ));
        return Ok(());
    };
    let new_version = match parse_manifest_version(&content) {
        Ok(v) => v,
        Err(e) => {
            report.push(
                Failure::error(
                    CheckKind::ManifestVersion,
                    format!("Cannot read the version from {manifest} in {newest}: {e}"),
                )
                .with_path(manifest),
            );
            return Ok(());
        }
    };

    let Some(baseline) = baseline(ctx, remote, oldest, report)? else {
        return Ok(());
    };

    debug!(%new_version, baseline = %baseline.version, source = %baseline.source, "comparing versions");
    if !new_version.is_bump_over(&baseline.version) {
        report.push(
            Failure::error(
                CheckKind::ManifestVersion,
                format!(
                    "Version {new_version} in {manifest} must be greater than {} ({}). \
                     Bump the major, minor or patch version in {manifest}, commit, and push again.",
                    baseline.version, baseline.source
                ),
            )
            .with_path(manifest),
        );
    }

    Ok(())
}

fn baseline(
    ctx: &HookContext<'_>,
    remote: &str,
    oldest: &str,
    report: &mut GuardReport,
) -> Result<Option<Baseline>, GuardError> {
    let manifest = ctx.config.manifest.as_str();

    let Some(default_branch) = ctx.vcs.default_branch(remote)? else {
        report.push(Failure::warning(
            CheckKind::ManifestVersion,
            format!("Default branch of remote '{remote}' is unknown; version check skipped"),
        ));
        return Ok(None);
    };
    let on_default = ctx.vcs.current_branch()?.as_deref() == Some(default_branch.as_str());

    let (rev, source) = if on_default {
        (
            format!("{oldest}^"),
            format!("version before this push on {default_branch}"),
        )
    } else {
        (
            format!("refs/remotes/{remote}/{default_branch}"),
            format!("version on {remote}/{default_branch}"),
        )
    };

    let Some(content) = ctx.vcs.file_at(&rev, manifest)? else {
        report.push(Failure::warning(
            CheckKind::ManifestVersion,
            format!("{manifest} has no baseline ({source}); treating its version as new"),
        ));
        return Ok(None);
    };

    match parse_manifest_version(&content) {
        Ok(version) => Ok(Some(Baseline { version, source })),
        Err(e) => {
            report.push(Failure::warning(
                CheckKind::ManifestVersion,
                format!("Cannot read the baseline version of {manifest} ({source}): {e}; version check skipped"),
            ));
            Ok(None)
        }
    }
}
