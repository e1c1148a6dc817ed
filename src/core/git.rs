//! ### Run git commands
//!
//! git runs in the configured repository with the C locale so the text
//! parsers see untranslated headings.

use std::process::Command;

use crate::core::{config::ToolConfig, error::AppResult, runner::execute_command};

fn git_command(config: &ToolConfig) -> Command {
    let mut command = Command::new(&config.git_bin);
    command
        .arg("-C")
        .arg(&config.repo)
        .env("LC_ALL", "C")
        .env("LANGUAGE", "C");
    command
}

/// ### git status
pub fn git_status(config: &ToolConfig) -> AppResult<String> {
    let mut command = git_command(config);
    command.args(["status", "--long"]);
    Ok(execute_command(command)?.stdout)
}

/// ### git branch -vv
pub fn git_branch_list(config: &ToolConfig) -> AppResult<String> {
    let mut command = git_command(config);
    command.args(["branch", "-vv", "--no-color"]);
    Ok(execute_command(command)?.stdout)
}

/// ### git cat-file -p
pub fn git_cat_file(config: &ToolConfig, hash: &str) -> AppResult<String> {
    let mut command = git_command(config);
    command.args(["cat-file", "-p", hash]);
    Ok(execute_command(command)?.stdout)
}

/// Arguments listing the commits reachable from `branch` but from none of
/// `others`, oldest first.
pub fn rev_list_args(branch: &str, others: &[&str]) -> Vec<String> {
    let mut args = vec!["rev-list".to_string(), "--reverse".to_string(), branch.to_string()];
    args.extend(others.iter().map(|other| format!("^{}", other)));
    args
}

/// ### git rev-list --reverse
pub fn git_rev_list_exclusive(config: &ToolConfig, branch: &str, others: &[&str]) -> AppResult<Vec<String>> {
    let mut command = git_command(config);
    command.args(rev_list_args(branch, others));
    let output = execute_command(command)?;
    Ok(output.stdout.split_whitespace().map(str::to_string).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rev_list_excludes_other_branches() {
        assert_eq!(
            rev_list_args("dev", &["main", "topic"]),
            vec!["rev-list", "--reverse", "dev", "^main", "^topic"]
        );
    }

    #[test]
    fn git_runs_in_repo_with_c_locale() {
        let config = ToolConfig {
            repo: "/tmp/repo".into(),
            ..Default::default()
        };
        let command = git_command(&config);
        let args: Vec<_> = command.get_args().map(|a| a.to_string_lossy().into_owned()).collect();
        assert_eq!(args, vec!["-C", "/tmp/repo"]);
        assert!(
            command
                .get_envs()
                .any(|(k, v)| k == "LC_ALL" && v.map(|v| v == "C").unwrap_or(false))
        );
    }
}
