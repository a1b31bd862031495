//! Pre-commit guard: branch protection, marker scan, secret scan and
//! extensions over the staged change set.

use tracing::debug;

use crate::checks::{check_branch_protection, check_forbidden_markers, check_secrets, HookContext};
use crate::config::read_list_file;
use crate::error::{CheckKind, Failure, GuardError, GuardReport};
use crate::extension::{run_extensions, Extension};
use crate::git::Vcs;
use crate::types::diff::FileDiff;
use crate::types::staged::StagedSet;

pub const HOOK_NAME: &str = "pre-commit";

/// The staged set together with the tree it was diffed against.
#[derive(Debug, Clone, Default)]
pub struct StagedInput {
    pub baseline: String,
    pub set: StagedSet,
}

/// Diffs the index against `HEAD`, or against the empty tree in a repository
/// without commits.
pub fn gather_staged(vcs: &dyn Vcs) -> Result<StagedInput, GuardError> {
    let baseline = if vcs.resolve("HEAD")?.is_some() {
        "HEAD".to_string()
    } else {
        vcs.empty_tree()?
    };
    let changes = vcs.staged_changes(&baseline)?;
    let set = StagedSet::from_changes(&changes);
    debug!(%baseline, files = set.files.len(), renames = set.renames.len(), "staged changes");
    Ok(StagedInput { baseline, set })
}

/// Revisions whose diff shows content carried by renamed files: the last
/// two commits, or the empty tree and `HEAD` when there is only one.
fn rename_range(vcs: &dyn Vcs) -> Result<Option<(String, String)>, GuardError> {
    if vcs.resolve("HEAD~1")?.is_some() {
        Ok(Some(("HEAD~1".to_string(), "HEAD".to_string())))
    } else if vcs.resolve("HEAD")?.is_some() {
        Ok(Some((vcs.empty_tree()?, "HEAD".to_string())))
    } else {
        Ok(None)
    }
}

/// Loads the added lines of every staged and renamed file into memory.
///
/// A file whose diff cannot be read is reported and left out.
pub fn collect_diffs(vcs: &dyn Vcs, input: &StagedInput, report: &mut GuardReport) -> Vec<FileDiff> {
    let mut diffs = Vec::with_capacity(input.set.files.len() + input.set.renames.len());

    for path in &input.set.files {
        match vcs.staged_diff(&input.baseline, path) {
            Ok(raw) => diffs.push(FileDiff::from_unified(path.as_str(), &raw)),
            Err(e) => report.push(
                Failure::error(CheckKind::StagedFiles, format!("Cannot diff '{path}': {e}"))
                    .with_path(path),
            ),
        }
    }

    if input.set.renames.is_empty() {
        return diffs;
    }

    let range = match rename_range(vcs) {
        Ok(Some(range)) => range,
        Ok(None) => return diffs,
        Err(e) => {
            report.record_error(CheckKind::StagedFiles, &e);
            return diffs;
        }
    };

    for pair in &input.set.renames {
        let paths = [pair.old_path.as_str(), pair.new_path.as_str()];
        match vcs.diff(&range.0, &range.1, &paths) {
            Ok(raw) => diffs.push(FileDiff::from_unified(pair.new_path.as_str(), &raw)),
            Err(e) => report.push(
                Failure::error(
                    CheckKind::StagedFiles,
                    format!("Cannot diff '{}' -> '{}': {e}", pair.old_path, pair.new_path),
                )
                .with_path(&pair.new_path),
            ),
        }
    }

    diffs
}

/// Runs every pre-commit check and returns the aggregated report.
pub fn run_pre_commit(ctx: &HookContext<'_>, extensions: &[Box<dyn Extension>]) -> GuardReport {
    let mut report = GuardReport::new();

    if let Err(e) = check_branch_protection(ctx, &mut report) {
        report.record_error(CheckKind::BranchProtection, &e);
    }

    let input = match gather_staged(ctx.vcs) {
        Ok(input) => input,
        Err(e) => {
            report.record_error(CheckKind::StagedFiles, &e);
            StagedInput::default()
        }
    };

    let diffs = collect_diffs(ctx.vcs, &input, &mut report);

    check_forbidden_markers(&diffs, ctx.config, &mut report);

    match read_list_file(&ctx.layout.allowlist_path()) {
        Ok(allowlist) => check_secrets(&diffs, ctx.config, &allowlist, &mut report),
        Err(e) => report.record_error(CheckKind::SecretLeak, &e),
    }

    run_extensions(extensions, HOOK_NAME, &ctx.layout.root, &input.set, &mut report);

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GuardConfig, RepoLayout};
    use crate::git::EMPTY_TREE;
    use crate::testing::{unified, FakeVcs};
    use crate::types::staged::{ChangeStatus, StagedChange};
    use std::fs;
    use tempfile::TempDir;

    fn change(path: &str, status: ChangeStatus, previous: Option<&str>) -> StagedChange {
        StagedChange {
            path: path.into(),
            status,
            previous_path: previous.map(String::from),
        }
    }

    fn layout(tmp: &TempDir) -> RepoLayout {
        RepoLayout {
            root: tmp.path().to_path_buf(),
            git_dir: tmp.path().join(".git"),
        }
    }

    fn run(vcs: &FakeVcs, layout: &RepoLayout) -> GuardReport {
        let config = GuardConfig::default();
        let ctx = HookContext {
            vcs,
            layout,
            config: &config,
        };
        run_pre_commit(&ctx, &[])
    }

    #[test]
    fn fresh_repository_diffs_against_empty_tree() {
        let vcs = FakeVcs::default();
        let input = gather_staged(&vcs).unwrap();
        assert_eq!(input.baseline, EMPTY_TREE);

        let vcs = FakeVcs::default().with_revision("HEAD");
        assert_eq!(gather_staged(&vcs).unwrap().baseline, "HEAD");
    }

    #[test]
    fn clean_stage_passes() {
        let tmp = TempDir::new().unwrap();
        let vcs = FakeVcs {
            staged: vec![change("app.yml", ChangeStatus::Added, None)],
            ..Default::default()
        }
        .with_staged_diff("app.yml", &unified("app.yml", &["name: demo"], &[]));

        let report = run(&vcs, &layout(&tmp));
        assert!(report.passed());
    }

    #[test]
    fn every_violation_is_reported_together() {
        let tmp = TempDir::new().unwrap();
        let vcs = FakeVcs {
            default_branch: Some("main".into()),
            current_branch: Some("main".into()),
            staged: vec![
                change("notes.txt", ChangeStatus::Modified, None),
                change("app.yaml", ChangeStatus::Added, None),
                change("gone.yaml", ChangeStatus::Deleted, None),
            ],
            ..Default::default()
        }
        .with_revision("HEAD")
        .with_staged_diff("notes.txt", &unified("notes.txt", &["DONT COMMIT"], &[]))
        .with_staged_diff("app.yaml", &unified("app.yaml", &["password: hunter2"], &[]))
        .with_staged_diff("gone.yaml", &unified("gone.yaml", &["password: x"], &[]));

        let report = run(&vcs, &layout(&tmp));
        assert_eq!(report.messages_for(CheckKind::BranchProtection).len(), 1);
        assert_eq!(report.messages_for(CheckKind::ForbiddenMarker).len(), 1);
        let secrets = report.messages_for(CheckKind::SecretLeak);
        assert_eq!(secrets.len(), 1);
        assert!(secrets[0].contains("app.yaml"));
    }

    #[test]
    fn renamed_files_use_the_last_two_commits() {
        let tmp = TempDir::new().unwrap();
        let mut vcs = FakeVcs {
            staged: vec![change("new.yml", ChangeStatus::Renamed, Some("old.yml"))],
            ..Default::default()
        }
        .with_revision("HEAD")
        .with_revision("HEAD~1")
        // The staged view of a pure rename carries no content.
        .with_staged_diff("new.yml", "");
        vcs.diffs.insert(
            ("HEAD~1".into(), "HEAD".into()),
            unified("old.yml", &["secret: abc", "# do not commit"], &[]),
        );

        let report = run(&vcs, &layout(&tmp));
        assert_eq!(report.messages_for(CheckKind::ForbiddenMarker).len(), 1);
        assert!(report.messages_for(CheckKind::SecretLeak)[0].contains("new.yml"));
    }

    #[test]
    fn rename_in_single_commit_repository_uses_empty_tree() {
        let vcs = FakeVcs::default().with_revision("HEAD");
        assert_eq!(
            rename_range(&vcs).unwrap(),
            Some((EMPTY_TREE.to_string(), "HEAD".to_string()))
        );
        assert_eq!(rename_range(&FakeVcs::default()).unwrap(), None);
    }

    #[test]
    fn allowlist_file_is_honoured() {
        let tmp = TempDir::new().unwrap();
        let layout = layout(&tmp);
        fs::create_dir_all(layout.guard_dir()).unwrap();
        fs::write(layout.allowlist_path(), "app.yaml\n").unwrap();

        let vcs = FakeVcs {
            staged: vec![change("app.yaml", ChangeStatus::Added, None)],
            ..Default::default()
        }
        .with_staged_diff("app.yaml", &unified("app.yaml", &["password: hunter2"], &[]));

        assert!(run(&vcs, &layout).passed());
    }

    #[test]
    fn repeated_runs_agree() {
        let tmp = TempDir::new().unwrap();
        let vcs = FakeVcs {
            staged: vec![change("a.json", ChangeStatus::Added, None)],
            ..Default::default()
        }
        .with_staged_diff("a.json", &unified("a.json", &["\"privateKey\": \"x\""], &[]));
        let layout = layout(&tmp);

        let first = run(&vcs, &layout);
        let second = run(&vcs, &layout);
        assert_eq!(first.failures, second.failures);
        assert!(first.has_errors());
    }
}
