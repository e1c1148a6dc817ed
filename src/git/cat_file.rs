//! ### `git cat-file -p <commit>` parsing

use once_cell::sync::Lazy;
use regex::Regex;

use crate::core::error::{AppError, AppResult};

static OBJECT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<kind>tree|blob) (?P<hash>[a-fA-F0-9]+)$").expect("Invalid regex"));
static PARENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^parent (?P<hash>[a-fA-F0-9]+)$").expect("Invalid regex"));
static SIGNATURE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<who>author|committer) (?P<name>\w.*?) <(?P<email>.*)> (?P<time>[0-9]+) (?P<timezone>[+-]?[0-9]+)$")
        .expect("Invalid regex")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectRef {
    /// `tree` (or `blob`)
    pub kind: String,
    pub hash: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub name: String,
    pub email: String,
    /// Seconds since the epoch.
    pub time: i64,
    pub timezone: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitInfo {
    pub hash: String,
    pub object: Option<ObjectRef>,
    pub parents: Vec<String>,
    pub author: Option<Signature>,
    pub committer: Option<Signature>,
    pub message: String,
}

impl CommitInfo {
    /// Parse the pretty-printed commit object `hash`.
    ///
    /// Header lines we do not know (`gpgsig`, `encoding`, ...) and their
    /// continuation lines are ignored. The message is everything after the
    /// first blank line.
    pub fn parse(hash: &str, output: &str) -> AppResult<Self> {
        let mut commit = CommitInfo {
            hash: hash.to_string(),
            object: None,
            parents: Vec::new(),
            author: None,
            committer: None,
            message: String::new(),
        };

        let mut lines = output.lines();
        for line in lines.by_ref() {
            if line.is_empty() {
                break;
            }

            if let Some(caps) = OBJECT_RE.captures(line) {
                commit.object = Some(ObjectRef {
                    kind: caps["kind"].to_string(),
                    hash: caps["hash"].to_string(),
                });
            } else if let Some(caps) = PARENT_RE.captures(line) {
                commit.parents.push(caps["hash"].to_string());
            } else if let Some(caps) = SIGNATURE_RE.captures(line) {
                let time = caps["time"]
                    .parse::<i64>()
                    .map_err(|e| AppError::CatFile(format!("bad timestamp in [{}]: {}", line, e)))?;
                let signature = Signature {
                    name: caps["name"].to_string(),
                    email: caps["email"].to_string(),
                    time,
                    timezone: caps["timezone"].to_string(),
                };
                if &caps["who"] == "author" {
                    commit.author = Some(signature);
                } else {
                    commit.committer = Some(signature);
                }
            }
        }

        commit.message = lines.collect::<Vec<_>>().join("\n");
        Ok(commit)
    }

    pub fn tree_hash(&self) -> Option<&str> {
        self.object.as_ref().map(|o| o.hash.as_str())
    }
}

/// First eight characters of a hash.
pub fn short(hash: &str) -> &str {
    hash.get(..8).unwrap_or(hash)
}
