//! ### git output parsing
//!
//! Line oriented parsers for the human readable output of `git status`,
//! `git branch -vv` and `git cat-file -p`.

pub mod branch;
pub mod cat_file;
pub mod status;
pub mod stitch;

pub use branch::{BranchListEntry, parse_branch_list};
pub use cat_file::{CommitInfo, ObjectRef, Signature};
pub use status::{FileChange, StatusReport};
pub use stitch::{BranchCommit, StitchAction, plan_stitch};
