//! ### git commands
//!
//! - status: parsed `git status`
//! - branches: parsed `git branch -vv`
//! - stitch: commits on different branches that share a tree
//!

use tracing::debug;

use crate::{
    core::{
        app::App,
        error::AppResult,
        git::{git_branch_list, git_cat_file, git_rev_list_exclusive, git_status},
    },
    git::{BranchCommit, CommitInfo, StatusReport, parse_branch_list, plan_stitch},
};

pub fn handle_status(app: &App) -> AppResult<()> {
    app.ui.update_step("Reading status...");
    let output = git_status(&app.config)?;
    app.ui.finish_step();

    let report = StatusReport::parse(&output)?;
    app.ui.show_status(&report);
    Ok(())
}

pub fn handle_branches(app: &App) -> AppResult<()> {
    app.ui.update_step("Listing branches...");
    let output = git_branch_list(&app.config)?;
    app.ui.finish_step();

    let branches = parse_branch_list(&output);
    if branches.is_empty() {
        app.ui.info("No branches");
        return Ok(());
    }
    app.ui.show_branches(&branches);
    Ok(())
}

/// Collect the commits unique to each local branch and plan how they
/// should be joined.
pub fn handle_stitch(app: &App) -> AppResult<()> {
    app.ui.update_step("Listing branches...");
    let branches = parse_branch_list(&git_branch_list(&app.config)?);
    let names: Vec<&str> = branches.iter().map(|b| b.name.as_str()).collect();

    let mut commits = Vec::new();
    for branch in &names {
        app.ui.update_step(&format!("Reading commits of {}...", branch));
        let others: Vec<&str> = names.iter().copied().filter(|other| other != branch).collect();
        let hashes = git_rev_list_exclusive(&app.config, branch, &others)?;
        debug!(branch = %branch, commits = hashes.len(), "commits unique to branch");

        for hash in hashes {
            let commit = CommitInfo::parse(&hash, &git_cat_file(&app.config, &hash)?)?;
            commits.push(BranchCommit {
                branch: branch.to_string(),
                commit,
            });
        }
    }
    app.ui.finish_step();

    let actions = plan_stitch(commits);
    app.ui.show_stitch(&actions);
    Ok(())
}
