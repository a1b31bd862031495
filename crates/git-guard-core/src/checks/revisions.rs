use tracing::debug;

use crate::types::push::{PushKind, RefUpdate};

/// What a single ref update would send to the remote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevisionPlan {
    pub remote_ref: String,
    pub kind: PushKind,
}

/// Classifies each ref update into delete / new branch / update.
///
/// This is where per-commit checks plug in; today it only records the plan.
pub fn examine_revisions(updates: &[RefUpdate]) -> Vec<RevisionPlan> {
    updates
        .iter()
        .map(|update| {
            let kind = update.kind();
            debug!(
                local_ref = %update.local_ref,
                remote_ref = %update.remote_ref,
                range = ?kind.range(),
                "examining push"
            );
            RevisionPlan {
                remote_ref: update.remote_ref.clone(),
                kind,
            }
        })
        .collect()
}
