use crate::error::GuardError;

/// One line of pre-push stdin: `<local ref> <local oid> <remote ref> <remote oid>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefUpdate {
    pub local_ref: String,
    pub local_oid: String,
    pub remote_ref: String,
    pub remote_oid: String,
}

/// How a ref update changes the remote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushKind {
    /// The remote ref is being deleted; nothing to examine.
    Delete,
    /// The remote ref does not exist yet; the full ancestry is new.
    NewBranch { tip: String },
    /// Only `base..tip` is introduced.
    Update { base: String, tip: String },
}

impl PushKind {
    /// Revision range for `git rev-list`, `None` for deletions.
    pub fn range(&self) -> Option<String> {
        match self {
            PushKind::Delete => None,
            PushKind::NewBranch { tip } => Some(tip.clone()),
            PushKind::Update { base, tip } => Some(format!("{base}..{tip}")),
        }
    }
}

fn is_zero_oid(oid: &str) -> bool {
    !oid.is_empty() && oid.bytes().all(|b| b == b'0')
}

impl RefUpdate {
    pub fn parse(line: &str) -> Result<Self, GuardError> {
        let mut fields = line.split_whitespace();
        let mut next = || {
            fields
                .next()
                .map(str::to_string)
                .ok_or_else(|| GuardError::InvalidRefUpdate(line.to_string()))
        };
        let update = RefUpdate {
            local_ref: next()?,
            local_oid: next()?,
            remote_ref: next()?,
            remote_oid: next()?,
        };
        if fields.next().is_some() {
            return Err(GuardError::InvalidRefUpdate(line.to_string()));
        }
        Ok(update)
    }

    pub fn kind(&self) -> PushKind {
        if is_zero_oid(&self.local_oid) {
            PushKind::Delete
        } else if is_zero_oid(&self.remote_oid) {
            PushKind::NewBranch {
                tip: self.local_oid.clone(),
            }
        } else {
            PushKind::Update {
                base: self.remote_oid.clone(),
                tip: self.local_oid.clone(),
            }
        }
    }

    pub fn is_delete(&self) -> bool {
        self.kind() == PushKind::Delete
    }
}

/// Parses every non-blank line of pre-push stdin.
///
/// Malformed lines are returned as errors next to the parsed updates so the
/// caller can report them without dropping the rest.
pub fn parse_ref_updates(input: &str) -> (Vec<RefUpdate>, Vec<GuardError>) {
    let mut updates = Vec::new();
    let mut errors = Vec::new();
    for line in input.lines().filter(|l| !l.trim().is_empty()) {
        match RefUpdate::parse(line) {
            Ok(update) => updates.push(update),
            Err(e) => errors.push(e),
        }
    }
    (updates, errors)
}
