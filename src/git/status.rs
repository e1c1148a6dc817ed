//! ### `git status` parsing
//!
//! The long (human readable) status format is read line by line. Output is
//! expected with `LC_ALL=C`; see [`crate::core::git::git_status`].

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use crate::core::error::{AppError, AppResult};

static BRANCH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^On branch (\S+)\s*$").expect("Invalid regex"));
static BLANK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*$").expect("Invalid regex"));
static HINT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s+\(.*\)\s*$").expect("Invalid regex"));
static SECTION_HINT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s+\(use .*\)\s*$").expect("Invalid regex"));
static FILE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s+(new file|modified|deleted|renamed|copied|typechange):\s+(.+?)\s*$")
        .expect("Invalid regex")
});
static UNTRACKED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s+(.+?)\s*$").expect("Invalid regex"));

/// Top-level lines git prints between sections that carry no entries.
const INFORMATIONAL_PREFIXES: [&str; 5] = [
    "Your branch",
    "nothing to commit",
    "nothing added to commit",
    "no changes added to commit",
    "Untracked files not listed",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Staged,
    Changed,
    Untracked,
}

impl Section {
    fn from_heading(line: &str) -> Option<Self> {
        match line {
            "Changes to be committed:" => Some(Section::Staged),
            "Changes not staged for commit:" => Some(Section::Changed),
            "Untracked files:" => Some(Section::Untracked),
            _ => None,
        }
    }

    fn heading(&self) -> &'static str {
        match self {
            Section::Staged => "Changes to be committed:",
            Section::Changed => "Changes not staged for commit:",
            Section::Untracked => "Untracked files:",
        }
    }
}

/// One tracked path and its status keyword (`new file`, `modified`, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    pub path: String,
    pub status: String,
}

impl FileChange {
    pub fn new(path: &str, status: &str) -> Self {
        FileChange {
            path: path.to_string(),
            status: status.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusReport {
    /// `None` when not on a branch (detached HEAD).
    pub branch: Option<String>,
    pub staged: Vec<FileChange>,
    pub changed: Vec<FileChange>,
    pub untracked: Vec<String>,
}

impl StatusReport {
    pub fn parse(output: &str) -> AppResult<Self> {
        let mut lines = output.lines();
        let mut report = StatusReport::default();

        if let Some(first) = lines.next() {
            report.branch = BRANCH_RE.captures(first).map(|c| c[1].to_string());
            if report.branch.is_none() {
                debug!(line = first, "status does not start with a branch line");
            }
        }

        while let Some(line) = lines.next() {
            if let Some(section) = Section::from_heading(line) {
                report.read_section(section, &mut lines)?;
            } else if BLANK_RE.is_match(line) || HINT_RE.is_match(line) || is_informational(line) {
                continue;
            } else if line.trim_end().ends_with(':') {
                return Err(AppError::UnknownStatusSection(line.trim().to_string()));
            } else {
                warn!(line, "skipping unrecognized status line");
            }
        }

        debug!(
            staged = report.staged.len(),
            changed = report.changed.len(),
            untracked = report.untracked.len(),
            "parsed status"
        );
        Ok(report)
    }

    pub fn is_clean(&self) -> bool {
        self.staged.is_empty() && self.changed.is_empty() && self.untracked.is_empty()
    }

    fn read_section<'a>(&mut self, section: Section, lines: &mut impl Iterator<Item = &'a str>) -> AppResult<()> {
        // `(use ...)` hints come first. Older git separates them from the entries with a
        // blank line, current git goes straight to the first entry.
        let mut first_entry = None;
        for line in lines.by_ref() {
            if BLANK_RE.is_match(line) {
                break;
            }
            if SECTION_HINT_RE.is_match(line) {
                continue;
            }
            first_entry = Some(line);
            break;
        }

        let mut next = first_entry.or_else(|| lines.next());
        while let Some(line) = next {
            if BLANK_RE.is_match(line) {
                break;
            }
            self.push_entry(section, line)?;
            next = lines.next();
        }
        Ok(())
    }

    fn push_entry(&mut self, section: Section, line: &str) -> AppResult<()> {
        match section {
            Section::Staged | Section::Changed => {
                let caps = FILE_RE.captures(line).ok_or_else(|| mismatch(line, &FILE_RE))?;
                let change = FileChange::new(&caps[2], &caps[1]);
                if section == Section::Staged {
                    self.staged.push(change);
                } else {
                    self.changed.push(change);
                }
            }
            Section::Untracked => {
                let caps = UNTRACKED_RE.captures(line).ok_or_else(|| mismatch(line, &UNTRACKED_RE))?;
                self.untracked.push(caps[1].to_string());
            }
        }
        Ok(())
    }
}

fn is_informational(line: &str) -> bool {
    INFORMATIONAL_PREFIXES.iter().any(|p| line.starts_with(p))
}

fn mismatch(line: &str, re: &Regex) -> AppError {
    AppError::StatusLine {
        line: line.to_string(),
        pattern: re.as_str().to_string(),
    }
}

impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.branch {
            Some(branch) => writeln!(f, "On branch {}", branch)?,
            None => writeln!(f, "Not currently on any branch.")?,
        }

        for (section, changes) in [(Section::Staged, &self.staged), (Section::Changed, &self.changed)] {
            if changes.is_empty() {
                continue;
            }
            writeln!(f, "{}\n", section.heading())?;
            for change in changes {
                writeln!(f, "\t{}:   {}", change.status, change.path)?;
            }
            writeln!(f)?;
        }

        if !self.untracked.is_empty() {
            writeln!(f, "{}\n", Section::Untracked.heading())?;
            for path in &self.untracked {
                writeln!(f, "\t{}", path)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_minimal_report() {
        let output = "On branch main\nChanges to be committed:\n\n  new file:   a.txt\n\nUntracked files:\n\n  b.txt\n";
        let report = StatusReport::parse(output).unwrap();

        assert_eq!(report.branch.as_deref(), Some("main"));
        assert_eq!(report.staged, vec![FileChange::new("a.txt", "new file")]);
        assert!(report.changed.is_empty());
        assert_eq!(report.untracked, vec!["b.txt".to_string()]);
    }

    #[test]
    fn parses_hints_followed_by_blank_line() {
        let output = "\
On branch feature/x
Changes to be committed:
  (use \"git reset HEAD <file>...\" to unstage)

\tnew file:   file1.ext
\tmodified:   file2.ext
\tdeleted:    file3.ext

Changes not staged for commit:
  (use \"git add <file>...\" to update what will be committed)
  (use \"git checkout -- <file>...\" to discard changes in working directory)

\tmodified:   file2.ext
\tdeleted:    file4.ext

Untracked files:
  (use \"git add <file>...\" to include in what will be committed)

\tfile5.ext
\tfile6.ext
";
        let report = StatusReport::parse(output).unwrap();

        assert_eq!(report.branch.as_deref(), Some("feature/x"));
        assert_eq!(
            report.staged,
            vec![
                FileChange::new("file1.ext", "new file"),
                FileChange::new("file2.ext", "modified"),
                FileChange::new("file3.ext", "deleted"),
            ]
        );
        assert_eq!(
            report.changed,
            vec![FileChange::new("file2.ext", "modified"), FileChange::new("file4.ext", "deleted")]
        );
        assert_eq!(report.untracked, vec!["file5.ext".to_string(), "file6.ext".to_string()]);
    }

    #[test]
    fn parses_current_git_layout() {
        let output = "\
On branch main
Your branch is ahead of 'origin/main' by 1 commit.
  (use \"git push\" to publish your local commits)

Changes to be committed:
  (use \"git restore --staged <file>...\" to unstage)
\trenamed:    old name.txt -> new name.txt

Changes not staged for commit:
  (use \"git add <file>...\" to update what will be committed)
  (use \"git restore <file>...\" to discard changes in working directory)
\tmodified:   src/lib.rs

no changes added to commit (use \"git add\" and/or \"git commit -a\")
";
        let report = StatusReport::parse(output).unwrap();

        assert_eq!(report.staged, vec![FileChange::new("old name.txt -> new name.txt", "renamed")]);
        assert_eq!(report.changed, vec![FileChange::new("src/lib.rs", "modified")]);
        assert!(report.untracked.is_empty());
    }

    #[test]
    fn parenthesised_path_is_an_entry() {
        let output = "\
On branch main
Untracked files:
  (use \"git add <file>...\" to include in what will be committed)
\t(draft)
\tb.txt
";
        let report = StatusReport::parse(output).unwrap();
        assert_eq!(report.untracked, vec!["(draft)".to_string(), "b.txt".to_string()]);
    }

    #[test]
    fn clean_tree_has_no_entries() {
        let report = StatusReport::parse("On branch main\nnothing to commit, working tree clean\n").unwrap();
        assert!(report.is_clean());
        assert_eq!(report.branch.as_deref(), Some("main"));
    }

    #[test]
    fn detached_head_has_no_branch() {
        let report = StatusReport::parse("HEAD detached at 1a2b3c4\nnothing to commit, working tree clean").unwrap();
        assert_eq!(report.branch, None);
    }

    #[test]
    fn bad_entry_line_is_fatal() {
        let output = "On branch main\nChanges to be committed:\n\n  exploded:   a.txt\n";
        match StatusReport::parse(output) {
            Err(AppError::StatusLine { line, pattern }) => {
                assert_eq!(line, "  exploded:   a.txt");
                assert_eq!(pattern, FILE_RE.as_str());
            }
            other => panic!("expected StatusLine error, got {:?}", other),
        }
    }

    #[test]
    fn unindented_untracked_entry_is_fatal() {
        let output = "On branch main\nUntracked files:\n\nb.txt\n";
        assert!(matches!(StatusReport::parse(output), Err(AppError::StatusLine { .. })));
    }

    #[test]
    fn unknown_section_is_reported() {
        let output = "On branch main\nUnmerged paths:\n\n\tboth modified:   a.txt\n";
        match StatusReport::parse(output) {
            Err(AppError::UnknownStatusSection(heading)) => assert_eq!(heading, "Unmerged paths:"),
            other => panic!("expected UnknownStatusSection, got {:?}", other),
        }
    }

    #[test]
    fn sections_may_come_in_any_order() {
        let output = "On branch main\nUntracked files:\n\n\tz.txt\n\nChanges to be committed:\n\n\tdeleted:    y.txt\n";
        let report = StatusReport::parse(output).unwrap();
        assert_eq!(report.untracked, vec!["z.txt".to_string()]);
        assert_eq!(report.staged, vec![FileChange::new("y.txt", "deleted")]);
    }

    #[test]
    fn display_output_parses_back() {
        let report = StatusReport {
            branch: Some("main".to_string()),
            staged: vec![FileChange::new("a.txt", "new file")],
            changed: vec![FileChange::new("b.txt", "modified")],
            untracked: vec!["c.txt".to_string()],
        };
        assert_eq!(StatusReport::parse(&report.to_string()).unwrap(), report);
    }
}
