use std::sync::LazyLock;

use regex::Regex;

use crate::config::GuardConfig;
use crate::error::{CheckKind, Failure, GuardReport};
use crate::types::diff::FileDiff;

/// "do not commit" in any case, with optional separators between the words:
/// `DONT COMMIT`, `don't_commit`, `Don'tCommit`, `do-not-commit`.
static MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)do(?:n'?t|[\s_-]*not)[\s_-]*commit").expect("valid regex")
});

pub fn contains_marker(line: &str) -> bool {
    MARKER.is_match(line)
}

/// Fails every file whose added lines carry a "do not commit" marker.
pub fn check_forbidden_markers(diffs: &[FileDiff], config: &GuardConfig, report: &mut GuardReport) {
    for diff in diffs {
        if config.marker_exclude.iter().any(|name| name == diff.file_name()) {
            continue;
        }
        if diff.added_lines.iter().any(|line| contains_marker(line)) {
            report.push(
                Failure::error(
                    CheckKind::ForbiddenMarker,
                    format!("'{}' contains a \"do not commit\" marker", diff.path),
                )
                .with_path(&diff.path),
            );
        }
    }
}
