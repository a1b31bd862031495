//! Hook entry points.
//!
//! Each guard gathers its inputs, runs its checks into one
//! [`GuardReport`](crate::GuardReport) and hands the report back; deciding
//! pass or fail is left to the caller.

pub mod install;
pub mod pre_commit;
pub mod pre_push;

pub use install::install_hooks;
pub use pre_commit::{collect_diffs, gather_staged, run_pre_commit, StagedInput};
pub use pre_push::run_pre_push;
