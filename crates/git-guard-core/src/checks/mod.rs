//! Individual guard checks.
//!
//! Every check appends to a [`GuardReport`](crate::GuardReport) and never
//! decides the outcome of a run by itself. A check returns `Err` only when a
//! collaborator query fails; the hook orchestrators record that as a failure
//! of the check and carry on with the rest.

pub mod branch;
pub mod manifest;
pub mod marker;
pub mod revisions;
pub mod secrets;

use crate::config::{GuardConfig, RepoLayout};
use crate::git::Vcs;

pub use branch::check_branch_protection;
pub use manifest::check_manifest_version;
pub use marker::{check_forbidden_markers, contains_marker};
pub use revisions::{examine_revisions, RevisionPlan};
pub use secrets::{check_secrets, looks_like_secret};

/// Everything a check may consult during one hook run.
pub struct HookContext<'a> {
    pub vcs: &'a dyn Vcs,
    pub layout: &'a RepoLayout,
    pub config: &'a GuardConfig,
}
