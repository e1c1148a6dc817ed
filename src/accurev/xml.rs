//! ### AccuRev XML mapping
//!
//! Turns the `-fx` output of AccuRev commands into the records in
//! [`super::models`]. A response for a different command is `Ok(None)`;
//! only XML that is not well-formed is an error.

use roxmltree::{Document, Node};
use tracing::{debug, warn};

use crate::{
    accurev::models::{
        AcCommand, Depot, ElementVersion, History, Move, ShowDepots, ShowStreams, ShowUsers,
        Stream, Transaction, User, VersionPair, Workspace,
    },
    core::error::{AppError, AppResult},
};

const RESPONSE_TAG: &str = "AcResponse";
const PREVIEW_LEN: usize = 60;

/// A root record built from one `<AcResponse>` document.
pub trait FromAcResponse: Sized {
    const COMMAND: AcCommand;

    /// Build the record from an `<AcResponse>` element already known to
    /// carry `Command="{COMMAND}"`.
    fn from_response(root: Node) -> Self;

    fn from_xml(xml: &str) -> AppResult<Option<Self>> {
        parse_response(xml)
    }
}

/// Parse `xml` and map it to `T`, or `None` when it answers another command.
pub fn parse_response<T: FromAcResponse>(xml: &str) -> AppResult<Option<T>> {
    let doc = parse_document(xml, T::COMMAND)?;
    let root = doc.root_element();

    if !root.has_tag_name(RESPONSE_TAG) || root.attribute("Command") != Some(T::COMMAND.as_str()) {
        debug!(
            expected = T::COMMAND.as_str(),
            tag = root.tag_name().name(),
            command = root.attribute("Command").unwrap_or(""),
            "response is for a different command"
        );
        return Ok(None);
    }

    Ok(Some(T::from_response(root)))
}

/// Collect the text of every `<message error="...">` in a populate response.
pub fn populate_errors(xml: &str) -> AppResult<Vec<String>> {
    let doc = parse_document(xml, AcCommand::Populate)?;
    let errors: Vec<String> = doc
        .root_element()
        .children()
        .filter(|n| n.has_tag_name("message") && n.attribute("error").is_some())
        .map(|n| n.text().unwrap_or("").trim().to_string())
        .collect();

    for error in &errors {
        warn!("accurev populate error: {}", error);
    }
    Ok(errors)
}

fn parse_document(xml: &str, command: AcCommand) -> AppResult<Document<'_>> {
    Document::parse(xml.trim()).map_err(|source| AppError::XmlParse {
        command: command.as_str().to_string(),
        preview: preview(xml),
        source,
    })
}

fn preview(xml: &str) -> String {
    let flat: String = xml.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() > PREVIEW_LEN {
        format!("{}...", flat.chars().take(PREVIEW_LEN).collect::<String>())
    } else {
        flat
    }
}

fn attr(node: &Node, name: &str) -> Option<String> {
    node.attribute(name).map(str::to_string)
}

fn child<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|n| n.has_tag_name(tag))
}

fn children<'a, 'input>(
    node: Node<'a, 'input>,
    tag: &'static str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(move |n| n.has_tag_name(tag))
}

/// The unescaped text before the first child element, then the source
/// markup from that element on, entities included.
fn xml_contents(node: &Node) -> String {
    let source = node.document().input_text();
    let mut contents = String::new();
    let mut in_markup = false;
    for item in node.children() {
        in_markup |= item.is_element();
        if in_markup {
            contents.push_str(&source[item.range()]);
        } else if item.is_text() {
            contents.push_str(item.text().unwrap_or(""));
        }
    }
    contents
}

impl Workspace {
    pub fn from_node(node: Node) -> Option<Self> {
        if !node.has_tag_name("wspace") {
            return None;
        }
        Some(Workspace {
            storage: attr(&node, "Storage"),
            host: attr(&node, "Host"),
            target_transaction: attr(&node, "Target_trans"),
            file_mod_time: attr(&node, "fileModTime"),
            eol: attr(&node, "EOL"),
            kind: attr(&node, "Type"),
        })
    }
}

impl Stream {
    pub fn from_node(node: Node) -> Option<Self> {
        if !node.has_tag_name("stream") {
            return None;
        }
        Some(Stream {
            name: attr(&node, "name"),
            stream_number: attr(&node, "streamNumber"),
            depot_name: attr(&node, "depotName"),
            kind: attr(&node, "type"),
            basis: attr(&node, "basis"),
            basis_stream_number: attr(&node, "basisStreamNumber"),
            time: attr(&node, "time"),
            prev_time: attr(&node, "prevTime"),
            prev_basis: attr(&node, "prevBasis"),
            prev_basis_stream_number: attr(&node, "prevBasisStreamNumber"),
            workspace: child(node, "wspace").and_then(Workspace::from_node),
            start_time: attr(&node, "startTime"),
            is_dynamic: attr(&node, "isDynamic"),
            has_default_group: attr(&node, "hasDefaultGroup"),
        })
    }
}

impl Move {
    pub fn from_node(node: Node) -> Option<Self> {
        if !node.has_tag_name("move") {
            return None;
        }
        Some(Move {
            dest: attr(&node, "dest"),
            source: attr(&node, "source"),
        })
    }
}

impl ElementVersion {
    pub fn from_node(node: Node) -> Option<Self> {
        if !node.has_tag_name("version") {
            return None;
        }
        let pair = |machine: &str, named: &str| {
            VersionPair::from_tokens(node.attribute(machine), node.attribute(named))
        };

        Some(ElementVersion {
            path: attr(&node, "path"),
            eid: attr(&node, "eid"),
            virtual_version: pair("virtual", "virtualNamedVersion"),
            real: pair("real", "realNamedVersion"),
            ancestor: pair("ancestor", "ancestorNamedVersion").non_empty(),
            merged_against: pair("merged_against", "mergedAgainstNamedVersion").non_empty(),
            elem_type: attr(&node, "elem_type"),
            dir: attr(&node, "dir"),
        })
    }
}

impl Transaction {
    pub fn from_node(node: Node) -> Option<Self> {
        if !node.has_tag_name("transaction") {
            return None;
        }
        Some(Transaction {
            id: attr(&node, "id"),
            kind: attr(&node, "type"),
            time: attr(&node, "time"),
            user: attr(&node, "user"),
            comment: child(node, "comment").map(|c| xml_contents(&c)),
            versions: children(node, "version").filter_map(ElementVersion::from_node).collect(),
            moves: children(node, "move").filter_map(Move::from_node).collect(),
            stream: child(node, "stream").and_then(Stream::from_node),
        })
    }
}

impl User {
    pub fn from_node(node: Node) -> Option<Self> {
        if !node.has_tag_name("Element") {
            return None;
        }
        Some(User {
            number: attr(&node, "Number"),
            name: attr(&node, "Name"),
            kind: attr(&node, "Kind"),
        })
    }
}

impl Depot {
    pub fn from_node(node: Node) -> Option<Self> {
        if !node.has_tag_name("Element") {
            return None;
        }
        Some(Depot {
            number: attr(&node, "Number"),
            name: attr(&node, "Name"),
            slice: attr(&node, "Slice"),
            exclusive_locking: attr(&node, "exclusiveLocking"),
            case: attr(&node, "case"),
            loc_width: attr(&node, "locWidth"),
            repl_status: attr(&node, "ReplStatus"),
        })
    }
}

impl FromAcResponse for History {
    const COMMAND: AcCommand = AcCommand::History;

    fn from_response(root: Node) -> Self {
        let streams: Vec<Stream> = child(root, "streams")
            .map(|s| s.children().filter(|n| n.is_element()).filter_map(Stream::from_node).collect())
            .unwrap_or_default();

        let history = History {
            task_id: attr(&root, "TaskId"),
            transactions: children(root, "transaction").filter_map(Transaction::from_node).collect(),
            streams,
        };
        debug!(transactions = history.transactions.len(), streams = history.streams.len(), "parsed history");
        history
    }
}

impl FromAcResponse for ShowUsers {
    const COMMAND: AcCommand = AcCommand::ShowUsers;

    fn from_response(root: Node) -> Self {
        ShowUsers {
            task_id: attr(&root, "TaskId"),
            users: children(root, "Element").filter_map(User::from_node).collect(),
        }
    }
}

impl FromAcResponse for ShowDepots {
    const COMMAND: AcCommand = AcCommand::ShowDepots;

    fn from_response(root: Node) -> Self {
        ShowDepots {
            task_id: attr(&root, "TaskId"),
            depots: children(root, "Element").filter_map(Depot::from_node).collect(),
        }
    }
}

impl FromAcResponse for ShowStreams {
    const COMMAND: AcCommand = AcCommand::ShowStreams;

    fn from_response(root: Node) -> Self {
        ShowStreams {
            task_id: attr(&root, "TaskId"),
            streams: children(root, "stream").filter_map(Stream::from_node).collect(),
        }
    }
}
