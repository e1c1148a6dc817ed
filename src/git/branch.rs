//! ### `git branch -vv` parsing

use std::{
    fmt,
    hash::{Hash, Hasher},
};

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

static BRANCH_VV_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?P<marker>[*+])?\s+(?P<name>\S+)\s+(?P<hash>\S+)\s+(?:(?P<remote>\[[^\]]+\])(?:\s+|$))?(?P<comment>.*)$",
    )
    .expect("Invalid regex")
});

/// One line of `git branch -vv`.
///
/// Two entries are equal when they name the same branch at the same
/// abbreviated commit; remote and comment are ignored.
#[derive(Debug, Clone)]
pub struct BranchListEntry {
    pub name: String,
    pub short_hash: String,
    /// Upstream annotation including brackets, e.g. `[origin/main: ahead 1]`.
    pub remote: Option<String>,
    pub comment: String,
    pub is_current: bool,
}

impl BranchListEntry {
    /// `None` for lines that are not a branch, including the
    /// `(HEAD detached at ..)` and `(no branch, ..)` entries.
    pub fn parse_line(line: &str) -> Option<Self> {
        let caps = BRANCH_VV_RE.captures(line)?;
        if caps["name"].starts_with('(') {
            return None;
        }
        Some(BranchListEntry {
            name: caps["name"].to_string(),
            short_hash: caps["hash"].to_string(),
            remote: caps.name("remote").map(|m| m.as_str().to_string()),
            comment: caps["comment"].to_string(),
            is_current: caps.name("marker").is_some_and(|m| m.as_str() == "*"),
        })
    }
}

/// Parse the whole listing. Lines that do not look like a branch entry are
/// skipped with a warning.
pub fn parse_branch_list(output: &str) -> Vec<BranchListEntry> {
    output
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| {
            let entry = BranchListEntry::parse_line(line);
            if entry.is_none() {
                warn!(line, "skipping unrecognized branch line");
            }
            entry
        })
        .collect()
}

impl PartialEq for BranchListEntry {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.short_hash == other.short_hash
    }
}

impl Eq for BranchListEntry {}

impl Hash for BranchListEntry {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.short_hash.hash(state);
    }
}

impl fmt::Display for BranchListEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marker = if self.is_current { "*" } else { " " };
        write!(f, "{} {} {}", marker, self.name, self.short_hash)?;
        if let Some(remote) = &self.remote {
            write!(f, " {}", remote)?;
        }
        write!(f, " {}", self.comment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_current_branch_with_remote() {
        let entry = BranchListEntry::parse_line("* main abc1234 [origin/main] fix bug").unwrap();
        assert_eq!(entry.name, "main");
        assert_eq!(entry.short_hash, "abc1234");
        assert_eq!(entry.remote.as_deref(), Some("[origin/main]"));
        assert_eq!(entry.comment, "fix bug");
        assert!(entry.is_current);
    }

    #[test]
    fn parses_local_branch_without_remote() {
        let entry = BranchListEntry::parse_line("  topic    9f8e7d6 WIP: try again").unwrap();
        assert_eq!(entry.name, "topic");
        assert_eq!(entry.short_hash, "9f8e7d6");
        assert_eq!(entry.remote, None);
        assert_eq!(entry.comment, "WIP: try again");
        assert!(!entry.is_current);
    }

    #[test]
    fn remote_with_tracking_counts() {
        let entry = BranchListEntry::parse_line("  dev 1111111 [origin/dev: ahead 2, behind 1] sync").unwrap();
        assert_eq!(entry.remote.as_deref(), Some("[origin/dev: ahead 2, behind 1]"));
        assert_eq!(entry.comment, "sync");
    }

    #[test]
    fn worktree_marker_is_not_current() {
        let entry = BranchListEntry::parse_line("+ other 2222222 elsewhere").unwrap();
        assert_eq!(entry.name, "other");
        assert!(!entry.is_current);
    }

    #[test]
    fn unparseable_lines_are_skipped() {
        let output = "* main abc1234 [origin/main] fix bug\nnot-a-branch\n\n  dev 1111111 work\n";
        let entries = parse_branch_list(output);
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["main", "dev"]);
    }

    #[test]
    fn detached_head_is_not_a_branch() {
        assert_eq!(BranchListEntry::parse_line("* (HEAD detached at abc1234) abc1234 msg"), None);
        assert_eq!(BranchListEntry::parse_line("* (no branch, rebasing dev) 1111111 pick"), None);

        let output = "* (HEAD detached at abc1234) abc1234 msg\n  main abc1234 [origin/main] fix bug\n";
        let entries = parse_branch_list(output);
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["main"]);
    }

    #[test]
    fn equality_ignores_remote_and_comment() {
        let a = BranchListEntry::parse_line("* main abc1234 [origin/main] fix bug").unwrap();
        let b = BranchListEntry::parse_line("  main abc1234 other words").unwrap();
        let c = BranchListEntry::parse_line("  main def5678 fix bug").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn display_matches_git_layout() {
        let entry = BranchListEntry::parse_line("* main abc1234 [origin/main] fix bug").unwrap();
        assert_eq!(entry.to_string(), "* main abc1234 [origin/main] fix bug");
    }
}
