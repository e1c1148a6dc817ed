//! AccuRev response records
//!
//! Every attribute-backed field is kept verbatim as an `Option<String>`;
//! an attribute missing from the response is `None`.

use std::fmt;

/// Names of the AccuRev commands whose XML responses we understand.
/// The value is what AccuRev writes into `<AcResponse Command="...">`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcCommand {
    History,
    ShowUsers,
    ShowDepots,
    ShowStreams,
    Populate,
}

impl AcCommand {
    pub fn as_str(&self) -> &'static str {
        match self {
            AcCommand::History => "hist",
            AcCommand::ShowUsers => "show users",
            AcCommand::ShowDepots => "show depots",
            AcCommand::ShowStreams => "show streams",
            AcCommand::Populate => "pop",
        }
    }
}

impl fmt::Display for AcCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `<wspace>`: the workspace backing a stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Workspace {
    pub storage: Option<String>,
    pub host: Option<String>,
    pub target_transaction: Option<String>,
    pub file_mod_time: Option<String>,
    pub eol: Option<String>,
    pub kind: Option<String>,
}

/// `<stream>`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stream {
    pub name: Option<String>,
    pub stream_number: Option<String>,
    pub depot_name: Option<String>,
    pub kind: Option<String>,
    pub basis: Option<String>,
    pub basis_stream_number: Option<String>,
    pub time: Option<String>,
    pub prev_time: Option<String>,
    pub prev_basis: Option<String>,
    pub prev_basis_stream_number: Option<String>,
    pub workspace: Option<Workspace>,
    pub start_time: Option<String>,
    pub is_dynamic: Option<String>,
    pub has_default_group: Option<String>,
}

/// `<move>`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Move {
    pub dest: Option<String>,
    pub source: Option<String>,
}

/// One `stream/version` reference, e.g. `mystream/14`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Version {
    pub stream: String,
    pub version: String,
}

impl Version {
    /// Split a `stream/version` token. Anything without exactly one `/` is
    /// not a version reference.
    pub fn from_token(token: &str) -> Option<Self> {
        let mut parts = token.split('/');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(stream), Some(version), None) => Some(Version {
                stream: stream.to_string(),
                version: version.to_string(),
            }),
            _ => None,
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.stream, self.version)
    }
}

/// A version reference in its machine form (`5/3`) and its named form
/// (`mystream/3`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionPair {
    pub version: Option<Version>,
    pub named: Option<Version>,
}

impl VersionPair {
    pub fn from_tokens(version: Option<&str>, named: Option<&str>) -> Self {
        VersionPair {
            version: version.and_then(Version::from_token),
            named: named.and_then(Version::from_token),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.version.is_none() && self.named.is_none()
    }

    /// `None` when neither half is present.
    pub fn non_empty(self) -> Option<Self> {
        if self.is_empty() { None } else { Some(self) }
    }
}

/// `<version>`: one file element touched by a transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementVersion {
    pub path: Option<String>,
    pub eid: Option<String>,
    pub virtual_version: VersionPair,
    pub real: VersionPair,
    pub ancestor: Option<VersionPair>,
    pub merged_against: Option<VersionPair>,
    pub elem_type: Option<String>,
    pub dir: Option<String>,
}

struct Field<'a, T: fmt::Display>(Option<&'a T>);

impl<T: fmt::Display> fmt::Display for Field<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(value) => write!(f, "{}", value),
            None => f.write_str("None"),
        }
    }
}

impl fmt::Display for ElementVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ElementVersion(path={}, eid={}, virtual={}, virtual_named={}, real={}, real_named={}",
            Field(self.path.as_ref()),
            Field(self.eid.as_ref()),
            Field(self.virtual_version.version.as_ref()),
            Field(self.virtual_version.named.as_ref()),
            Field(self.real.version.as_ref()),
            Field(self.real.named.as_ref()),
        )?;
        if let Some(ancestor) = &self.ancestor {
            write!(
                f,
                ", ancestor={}, ancestor_named={}",
                Field(ancestor.version.as_ref()),
                Field(ancestor.named.as_ref())
            )?;
        }
        if let Some(merged) = &self.merged_against {
            write!(
                f,
                ", merged_against={}, merged_against_named={}",
                Field(merged.version.as_ref()),
                Field(merged.named.as_ref())
            )?;
        }
        write!(
            f,
            ", elem_type={}, dir={})",
            Field(self.elem_type.as_ref()),
            Field(self.dir.as_ref())
        )
    }
}

/// `<transaction>`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transaction {
    pub id: Option<String>,
    pub kind: Option<String>,
    pub time: Option<String>,
    pub user: Option<String>,
    /// Raw comment content; embedded markup is kept as text.
    pub comment: Option<String>,
    pub versions: Vec<ElementVersion>,
    pub moves: Vec<Move>,
    pub stream: Option<Stream>,
}

/// Response of `accurev hist -fx`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct History {
    pub task_id: Option<String>,
    pub transactions: Vec<Transaction>,
    pub streams: Vec<Stream>,
}

/// `<Element>` of `accurev show users`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct User {
    pub number: Option<String>,
    pub name: Option<String>,
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShowUsers {
    pub task_id: Option<String>,
    pub users: Vec<User>,
}

/// `<Element>` of `accurev show depots`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Depot {
    pub number: Option<String>,
    pub name: Option<String>,
    pub slice: Option<String>,
    pub exclusive_locking: Option<String>,
    pub case: Option<String>,
    pub loc_width: Option<String>,
    pub repl_status: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShowDepots {
    pub task_id: Option<String>,
    pub depots: Vec<Depot>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShowStreams {
    pub task_id: Option<String>,
    pub streams: Vec<Stream>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_token_round_trips() {
        let version = Version::from_token("stream/42").unwrap();
        assert_eq!(version.stream, "stream");
        assert_eq!(version.version, "42");
        assert_eq!(version.to_string(), "stream/42");
    }

    #[test]
    fn version_token_needs_exactly_one_separator() {
        assert_eq!(Version::from_token("stream42"), None);
        assert_eq!(Version::from_token("a/b/42"), None);
        assert_eq!(Version::from_token(""), None);
    }

    #[test]
    fn empty_pair_collapses_to_none() {
        assert_eq!(VersionPair::from_tokens(None, Some("bogus")).non_empty(), None);
        let pair = VersionPair::from_tokens(Some("5/3"), None).non_empty().unwrap();
        assert_eq!(pair.version.unwrap().to_string(), "5/3");
        assert!(pair.named.is_none());
    }

    #[test]
    fn element_version_rendering_skips_absent_pairs() {
        let element = ElementVersion {
            path: Some("/./src/main.c".to_string()),
            eid: Some("17".to_string()),
            virtual_version: VersionPair::from_tokens(Some("1/2"), Some("dev/2")),
            real: VersionPair::from_tokens(Some("3/1"), Some("dev_ws/1")),
            ancestor: None,
            merged_against: VersionPair::from_tokens(Some("4/7"), None).non_empty(),
            elem_type: Some("text".to_string()),
            dir: Some("no".to_string()),
        };

        let rendered = element.to_string();
        assert!(!rendered.contains("ancestor"));
        assert!(rendered.contains("merged_against=4/7, merged_against_named=None"));
        assert!(rendered.starts_with("ElementVersion(path=/./src/main.c, eid=17, virtual=1/2"));
        assert!(rendered.ends_with("elem_type=text, dir=no)"));
    }
}
