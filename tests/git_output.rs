use ac2git::git::{
    BranchCommit, CommitInfo, FileChange, StatusReport, StitchAction, parse_branch_list, plan_stitch,
};
use pretty_assertions::assert_eq;

#[test]
fn status_example() {
    let output = "\
On branch main
Changes to be committed:

  new file:   a.txt

Untracked files:

  b.txt
";
    let report = StatusReport::parse(output).unwrap();
    assert_eq!(report.branch.as_deref(), Some("main"));
    assert_eq!(report.staged, vec![FileChange::new("a.txt", "new file")]);
    assert!(report.changed.is_empty());
    assert_eq!(report.untracked, vec!["b.txt".to_string()]);
}

#[test]
fn status_from_current_git() {
    let output = "\
On branch feature/login
Your branch is ahead of 'origin/feature/login' by 2 commits.
  (use \"git push\" to publish your local commits)

Changes to be committed:
  (use \"git restore --staged <file>...\" to unstage)
\trenamed:    old.rs -> new.rs

Changes not staged for commit:
  (use \"git add <file>...\" to update what will be committed)
  (use \"git restore <file>...\" to discard changes in working directory)
\tmodified:   src/lib.rs
\tdeleted:    README

Untracked files:
  (use \"git add <file>...\" to include in what will be committed)
\tnotes/
";
    let report = StatusReport::parse(output).unwrap();
    assert_eq!(report.branch.as_deref(), Some("feature/login"));
    assert_eq!(report.staged, vec![FileChange::new("old.rs -> new.rs", "renamed")]);
    assert_eq!(
        report.changed,
        vec![FileChange::new("src/lib.rs", "modified"), FileChange::new("README", "deleted")]
    );
    assert_eq!(report.untracked, vec!["notes/".to_string()]);
    assert!(!report.is_clean());
}

#[test]
fn branch_listing_example() {
    let branches = parse_branch_list("* main abc1234 [origin/main] fix bug");
    assert_eq!(branches.len(), 1);
    let main = &branches[0];
    assert_eq!(main.name, "main");
    assert_eq!(main.short_hash, "abc1234");
    assert_eq!(main.remote.as_deref(), Some("[origin/main]"));
    assert_eq!(main.comment, "fix bug");
    assert!(main.is_current);
}

#[test]
fn branch_listing_of_several_branches() {
    let output = "\
  dev         9f1c2d3 [origin/dev: ahead 1, behind 2] wip on parser
* main        abc1234 [origin/main] fix bug
  scratch     0aa11bb local only";
    let branches = parse_branch_list(output);
    let names: Vec<&str> = branches.iter().map(|b| b.name.as_str()).collect();
    assert_eq!(names, vec!["dev", "main", "scratch"]);
    assert_eq!(branches[0].remote.as_deref(), Some("[origin/dev: ahead 1, behind 2]"));
    assert_eq!(branches[2].remote, None);
    assert_eq!(branches[2].comment, "local only");
    assert_eq!(branches.iter().filter(|b| b.is_current).count(), 1);
}

fn commit(hash: &str, tree: &str, parent: &str, time: i64) -> CommitInfo {
    let output = format!(
        "tree {tree}\nparent {parent}\nauthor Ada Byron <ada@example.com> {time} +0000\n\
         committer Ada Byron <ada@example.com> {time} +0000\n\nimported from accurev"
    );
    CommitInfo::parse(hash, &output).unwrap()
}

#[test]
fn stitch_from_cat_file_output() {
    let tree_a = "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
    let tree_b = "bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb";
    let base = "0000000000000000000000000000000000000000";

    let commits = vec![
        BranchCommit {
            branch: "dev".to_string(),
            commit: commit("1111111111111111111111111111111111111111", tree_a, base, 100),
        },
        BranchCommit {
            branch: "main".to_string(),
            commit: commit("2222222222222222222222222222222222222222", tree_a, base, 200),
        },
        BranchCommit {
            branch: "qa".to_string(),
            commit: commit("3333333333333333333333333333333333333333", tree_b, base, 300),
        },
    ];

    let actions = plan_stitch(commits);
    assert_eq!(
        actions,
        vec![StitchAction::Merge {
            parent: "1111111111111111111111111111111111111111".to_string(),
            child: "2222222222222222222222222222222222222222".to_string(),
            tree: tree_a.to_string(),
            parents: vec![
                base.to_string(),
                "1111111111111111111111111111111111111111".to_string()
            ],
        }]
    );
    assert_eq!(
        actions[0].to_string(),
        "merge  11111111 as parent of 22222222. tree aaaaaaaa. parents [00000000, 11111111]"
    );
}
