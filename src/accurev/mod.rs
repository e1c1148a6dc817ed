//! ### AccuRev response parsing
//!
//! Records for the `-fx` (XML) output of `hist`, `show users`,
//! `show depots`, `show streams` and `pop`.

pub mod models;
pub mod xml;

pub use models::{
    AcCommand, Depot, ElementVersion, History, Move, ShowDepots, ShowStreams, ShowUsers, Stream,
    Transaction, User, Version, VersionPair, Workspace,
};
pub use xml::{FromAcResponse, parse_response, populate_errors};
