use crate::error::GuardError;

/// Status letter reported by `git diff --name-status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeStatus {
    Added,
    Modified,
    Copied,
    Renamed,
    Deleted,
    TypeChanged,
    Unmerged,
}

impl ChangeStatus {
    pub fn from_letter(letter: char) -> Option<Self> {
        match letter {
            'A' => Some(ChangeStatus::Added),
            'M' => Some(ChangeStatus::Modified),
            'C' => Some(ChangeStatus::Copied),
            'R' => Some(ChangeStatus::Renamed),
            'D' => Some(ChangeStatus::Deleted),
            'T' => Some(ChangeStatus::TypeChanged),
            'U' => Some(ChangeStatus::Unmerged),
            _ => None,
        }
    }

    /// Whether the staged content of a path with this status is scanned as a
    /// regular (non-renamed) file.
    pub fn is_content_change(&self) -> bool {
        matches!(
            self,
            ChangeStatus::Added | ChangeStatus::Modified | ChangeStatus::Copied
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedChange {
    pub path: String,
    pub status: ChangeStatus,
    /// Source path for renames and copies.
    pub previous_path: Option<String>,
}

impl StagedChange {
    pub fn renamed_pair(&self) -> Option<RenamedPair> {
        match (self.status, &self.previous_path) {
            (ChangeStatus::Renamed, Some(old)) => Some(RenamedPair {
                old_path: old.clone(),
                new_path: self.path.clone(),
            }),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenamedPair {
    pub old_path: String,
    pub new_path: String,
}

/// The staged change set split into scannable files and renames.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StagedSet {
    /// Added, modified and copied paths.
    pub files: Vec<String>,
    pub renames: Vec<RenamedPair>,
}

impl StagedSet {
    pub fn from_changes(changes: &[StagedChange]) -> Self {
        let mut set = StagedSet::default();
        for change in changes {
            if let Some(pair) = change.renamed_pair() {
                set.renames.push(pair);
            } else if change.status.is_content_change() {
                set.files.push(change.path.clone());
            }
        }
        set
    }

    /// Every path that ends up in the next commit's tree, renames included.
    pub fn all_paths(&self) -> impl Iterator<Item = &str> {
        self.files
            .iter()
            .map(String::as_str)
            .chain(self.renames.iter().map(|r| r.new_path.as_str()))
    }
}

/// Parses the output of `git diff --name-status -z`.
///
/// Entries are NUL-separated: `STATUS\0path\0`, or `STATUS\0old\0new\0` for
/// renames and copies, whose status carries a similarity score (`R100`).
pub fn parse_name_status(raw: &str) -> Result<Vec<StagedChange>, GuardError> {
    let mut tokens = raw.split('\0').filter(|t| !t.is_empty());
    let mut changes = Vec::new();

    while let Some(code) = tokens.next() {
        let letter = code.chars().next().unwrap_or(' ');
        let status = ChangeStatus::from_letter(letter)
            .ok_or_else(|| GuardError::Other(format!("Unknown diff status: {code}")))?;

        let first = tokens
            .next()
            .ok_or_else(|| GuardError::Other(format!("Missing path after status {code}")))?;

        let change = if matches!(status, ChangeStatus::Renamed | ChangeStatus::Copied) {
            let second = tokens.next().ok_or_else(|| {
                GuardError::Other(format!("Missing destination path after status {code}"))
            })?;
            StagedChange {
                path: second.to_string(),
                status,
                previous_path: Some(first.to_string()),
            }
        } else {
            StagedChange {
                path: first.to_string(),
                status,
                previous_path: None,
            }
        };
        changes.push(change);
    }

    Ok(changes)
}
