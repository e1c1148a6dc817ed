//! ### Branch stitching analysis
//!
//! Commits on different branches that point at the same tree are candidates
//! for being joined: equal committer times mean the commits are duplicates,
//! otherwise the earlier commit becomes an extra parent of the later one.

use std::{collections::BTreeMap, fmt};

use tracing::{debug, warn};

use crate::git::cat_file::{CommitInfo, short};

/// A commit found only on `branch`.
#[derive(Debug, Clone)]
pub struct BranchCommit {
    pub branch: String,
    pub commit: CommitInfo,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StitchAction {
    /// `commit` duplicates `equivalent_to`.
    Squash {
        commit: String,
        equivalent_to: String,
        tree: String,
    },
    /// `parent` should be added to the parents of `child`; `parents` is the
    /// resulting parent list.
    Merge {
        parent: String,
        child: String,
        tree: String,
        parents: Vec<String>,
    },
}

impl fmt::Display for StitchAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StitchAction::Squash { commit, equivalent_to, tree } => write!(
                f,
                "squash {} as equiv. to {}. tree {}.",
                short(commit),
                short(equivalent_to),
                short(tree)
            ),
            StitchAction::Merge { parent, child, tree, parents } => {
                let parents: Vec<&str> = parents.iter().map(|p| short(p)).collect();
                write!(
                    f,
                    "merge  {} as parent of {}. tree {}. parents [{}]",
                    short(parent),
                    short(child),
                    short(tree),
                    parents.join(", ")
                )
            }
        }
    }
}

/// Work out the squash/merge actions for `commits`. The result is ordered
/// by tree hash, then by committer time.
pub fn plan_stitch(commits: Vec<BranchCommit>) -> Vec<StitchAction> {
    let mut by_tree: BTreeMap<String, Vec<(i64, BranchCommit)>> = BTreeMap::new();

    for entry in commits {
        let Some(tree) = entry.commit.tree_hash().map(str::to_string) else {
            warn!(commit = %entry.commit.hash, branch = %entry.branch, "commit has no tree, skipping");
            continue;
        };
        let Some(time) = entry.commit.committer.as_ref().map(|c| c.time) else {
            warn!(commit = %entry.commit.hash, branch = %entry.branch, "commit has no committer, skipping");
            continue;
        };
        by_tree.entry(tree).or_default().push((time, entry));
    }

    let mut actions = Vec::new();
    for (tree, mut group) in by_tree {
        if group.len() < 2 {
            continue;
        }
        group.sort_by_key(|(time, _)| *time);
        debug!(tree = %tree, commits = group.len(), "tree shared between branches");

        for pair in group.windows(2) {
            let (first_time, first) = (&pair[0].0, &pair[0].1.commit);
            let (second_time, second) = (&pair[1].0, &pair[1].1.commit);

            if first_time == second_time {
                actions.push(StitchAction::Squash {
                    commit: first.hash.clone(),
                    equivalent_to: second.hash.clone(),
                    tree: tree.clone(),
                });
            } else {
                let mut parents = second.parents.clone();
                parents.push(first.hash.clone());
                actions.push(StitchAction::Merge {
                    parent: first.hash.clone(),
                    child: second.hash.clone(),
                    tree: tree.clone(),
                    parents,
                });
            }
        }
    }
    actions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::cat_file::{ObjectRef, Signature};
    use pretty_assertions::assert_eq;

    fn commit(hash: &str, tree: &str, time: Option<i64>, parents: &[&str]) -> BranchCommit {
        BranchCommit {
            branch: "b".to_string(),
            commit: CommitInfo {
                hash: hash.to_string(),
                object: Some(ObjectRef {
                    kind: "tree".to_string(),
                    hash: tree.to_string(),
                }),
                parents: parents.iter().map(|p| p.to_string()).collect(),
                author: None,
                committer: time.map(|time| Signature {
                    name: "c".to_string(),
                    email: "c@x".to_string(),
                    time,
                    timezone: "+0000".to_string(),
                }),
                message: String::new(),
            },
        }
    }

    #[test]
    fn unique_trees_need_nothing() {
        let actions = plan_stitch(vec![commit("a1", "t1", Some(1), &[]), commit("b1", "t2", Some(1), &[])]);
        assert!(actions.is_empty());
    }

    #[test]
    fn same_time_is_squash_and_later_is_merge() {
        let actions = plan_stitch(vec![
            commit("late", "tree", Some(30), &["p0"]),
            commit("early", "tree", Some(10), &[]),
            commit("twin", "tree", Some(10), &[]),
        ]);

        assert_eq!(
            actions,
            vec![
                StitchAction::Squash {
                    commit: "early".to_string(),
                    equivalent_to: "twin".to_string(),
                    tree: "tree".to_string(),
                },
                StitchAction::Merge {
                    parent: "twin".to_string(),
                    child: "late".to_string(),
                    tree: "tree".to_string(),
                    parents: vec!["p0".to_string(), "twin".to_string()],
                },
            ]
        );
    }

    #[test]
    fn commits_without_committer_are_ignored() {
        let actions = plan_stitch(vec![commit("a", "t", None, &[]), commit("b", "t", Some(5), &[])]);
        assert!(actions.is_empty());
    }

    #[test]
    fn display_uses_short_hashes() {
        let action = StitchAction::Merge {
            parent: "0123456789".to_string(),
            child: "abcdefabcdef".to_string(),
            tree: "ffffffffffff".to_string(),
            parents: vec!["1111111111".to_string(), "0123456789".to_string()],
        };
        assert_eq!(
            action.to_string(),
            "merge  01234567 as parent of abcdefab. tree ffffffff. parents [11111111, 01234567]"
        );
    }
}
