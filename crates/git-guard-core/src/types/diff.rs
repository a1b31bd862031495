/// The added lines of one file's diff, buffered in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDiff {
    pub path: String,
    pub added_lines: Vec<String>,
}

impl FileDiff {
    pub fn from_unified(path: impl Into<String>, diff: &str) -> Self {
        Self {
            path: path.into(),
            added_lines: added_lines(diff),
        }
    }

    /// Lower-cased extension including the dot, e.g. `.yaml`.
    pub fn extension(&self) -> Option<String> {
        let name = self.file_name();
        let dot = name.rfind('.')?;
        if dot == 0 {
            return None;
        }
        Some(name[dot..].to_ascii_lowercase())
    }

    pub fn file_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }
}

/// Extracts added lines from unified diff output.
///
/// Only lines inside a hunk count, so `+++ b/path` headers are never taken
/// for content even when a file's own lines start with `++`.
pub fn added_lines(diff: &str) -> Vec<String> {
    let mut in_hunk = false;
    let mut added = Vec::new();

    for line in diff.lines() {
        if line.starts_with("diff --git ") {
            in_hunk = false;
        } else if line.starts_with("@@") {
            in_hunk = true;
        } else if in_hunk {
            if let Some(content) = line.strip_prefix('+') {
                added.push(content.to_string());
            }
        }
    }

    added
}
