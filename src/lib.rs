//! Typed access to AccuRev and git command output.
//!
//! [`accurev`] maps the XML responses of AccuRev commands to records,
//! [`git`] parses the text output of `git status`, `git branch -vv` and
//! `git cat-file -p`, and [`core`] runs the tools.

pub mod accurev;
pub mod commands;
pub mod core;
pub mod git;
pub mod ui;
