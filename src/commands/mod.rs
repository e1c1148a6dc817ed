//! ### Subcommand handlers

pub mod accurev;
pub mod git;
