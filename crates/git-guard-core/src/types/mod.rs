pub mod diff;
pub mod push;
pub mod staged;

pub use diff::{added_lines, FileDiff};
pub use push::{parse_ref_updates, PushKind, RefUpdate};
pub use staged::{parse_name_status, ChangeStatus, RenamedPair, StagedChange, StagedSet};
