//! ### Invocation, configuration and shared plumbing

pub mod accurev;
pub mod app;
pub mod config;
pub mod error;
pub mod git;
pub mod logging;
pub mod runner;
pub mod utils;
