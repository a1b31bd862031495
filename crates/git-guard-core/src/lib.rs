pub mod checks;
pub mod config;
pub mod error;
pub mod extension;
pub mod git;
pub mod hooks;
pub mod types;
pub mod version;

#[cfg(test)]
pub(crate) mod testing;

pub use config::{GuardConfig, RepoLayout};
pub use error::{CheckKind, Failure, GuardError, GuardReport, Severity};
pub use git::{GitCli, Vcs};
pub use types::*;
