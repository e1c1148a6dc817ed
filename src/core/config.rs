//! ### Tool configuration
//! Executable locations and per-run settings, from flags or the environment.

use std::path::PathBuf;

use clap::{Args, ValueEnum};

/// How AccuRev reacts when the local clock is out of sync with the server.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum AcSync {
    /// The command fails (AccuRev's default)
    Error,
    /// A warning is printed and the command runs
    Warn,
    /// The command runs silently
    Ignore,
}

impl AcSync {
    pub fn as_env_value(&self) -> &'static str {
        match self {
            AcSync::Error => "ERROR",
            AcSync::Warn => "WARN",
            AcSync::Ignore => "IGNORE",
        }
    }
}

#[derive(Args, Clone, Debug)]
pub struct ToolConfig {
    /// AccuRev executable
    #[arg(long, env = "ACCUREV_BIN", default_value = "accurev", global = true)]
    pub accurev_bin: String,

    /// git executable
    #[arg(long, env = "GIT_BIN", default_value = "git", global = true)]
    pub git_bin: String,

    /// git repository the git subcommands operate on
    #[arg(long, env = "AC2GIT_REPO", default_value = ".", global = true)]
    pub repo: PathBuf,

    /// Passed to AccuRev as AC_SYNC
    #[arg(long, env = "AC_SYNC", value_enum, ignore_case = true, global = true)]
    pub ac_sync: Option<AcSync>,
}

impl Default for ToolConfig {
    fn default() -> Self {
        ToolConfig {
            accurev_bin: "accurev".to_string(),
            git_bin: "git".to_string(),
            repo: PathBuf::from("."),
            ac_sync: None,
        }
    }
}
