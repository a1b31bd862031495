//! Secret-leakage heuristics for structured config files.
//!
//! Detection is a best-effort guard, not a guarantee: lines are matched
//! against a handful of assignment patterns after dropping lines that look
//! like encrypted values or references to an external secret store. False
//! positives are silenced per file through the clone's allow-list.

use std::sync::LazyLock;

use regex::Regex;

use crate::config::GuardConfig;
use crate::error::{CheckKind, Failure, GuardReport};
use crate::types::diff::FileDiff;

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(p).expect("valid regex"))
        .collect()
}

/// Keys that look like a secret being assigned a value.
static SECRET_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r#"(?i)secret["']?\s*[:=]"#,
        r#"(?i)private[_-]?key["']?\s*[:=]"#,
        r#"(?i)password["']?\s*[:=]"#,
    ])
});

/// Encrypted placeholders and external secret references.
static SAFE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"(?i)\{cipher\}",
        r"ENC\(",
        r"(?i)secretRef",
        r"(?i)secretKeyRef",
        r"\$\{[^}]+\}",
        r"(?i)vault:",
    ])
});

pub fn is_safe_line(line: &str) -> bool {
    SAFE_PATTERNS.iter().any(|re| re.is_match(line))
}

pub fn looks_like_secret(line: &str) -> bool {
    !is_safe_line(line) && SECRET_PATTERNS.iter().any(|re| re.is_match(line))
}

fn is_allowlisted(diff: &FileDiff, allowlist: &[String]) -> bool {
    allowlist.iter().any(|entry| {
        entry.eq_ignore_ascii_case(&diff.path) || entry.eq_ignore_ascii_case(diff.file_name())
    })
}

/// Fails config files whose added lines look like secret assignments.
pub fn check_secrets(
    diffs: &[FileDiff],
    config: &GuardConfig,
    allowlist: &[String],
    report: &mut GuardReport,
) {
    for diff in diffs {
        let Some(ext) = diff.extension() else {
            continue;
        };
        if !config.scans_for_secrets(&ext) {
            continue;
        }

        let hits = diff
            .added_lines
            .iter()
            .filter(|line| looks_like_secret(line))
            .count();
        if hits == 0 {
            continue;
        }

        if is_allowlisted(diff, allowlist) {
            tracing::debug!(path = %diff.path, hits, "secret findings allow-listed");
            continue;
        }

        report.push(
            Failure::error(
                CheckKind::SecretLeak,
                format!(
                    "'{}' adds {hits} line(s) that look like secrets; move them to an \
                     external secret store, or add '{}' to the secret allow-list",
                    diff.path,
                    diff.file_name()
                ),
            )
            .with_path(&diff.path),
        );
    }
}
