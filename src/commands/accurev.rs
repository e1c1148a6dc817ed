//! ### AccuRev commands
//!
//! - hist: transactions of a depot or stream
//! - users / depots / streams: `accurev show` listings
//! - pop: populate elements into a workspace
//! - login / logout
//!

use clap::{Args, ValueEnum};
use crossterm::style::Stylize;

use crate::{
    accurev::{FromAcResponse, History, ShowDepots, ShowStreams, ShowUsers, populate_errors},
    core::{
        accurev::{
            HistoryQuery, PopulateRequest, ShowOptions, StreamListing, StreamsQuery, accurev_hist,
            accurev_login, accurev_logout, accurev_populate, accurev_show_depots, accurev_show_streams,
            accurev_show_users,
        },
        app::App,
        error::{AppError, AppResult},
    },
};

#[derive(Args, Debug, Clone, Default)]
pub struct HistArgs {
    /// Depot to query
    #[arg(short = 'p', long)]
    pub depot: Option<String>,
    /// Stream to query
    #[arg(short, long)]
    pub stream: Option<String>,
    /// Time spec, e.g. "now.10" or "2024/01/01 00:00:00-now"
    #[arg(short, long)]
    pub time: Option<String>,
    /// Only transactions of this kind (promote, keep, ...)
    #[arg(short, long)]
    pub kind: Option<String>,
    /// Only transactions by this user
    #[arg(short, long)]
    pub user: Option<String>,
    /// Element id
    #[arg(short, long)]
    pub eid: Option<String>,
    /// Elements to restrict the history to
    pub elements: Vec<String>,
}

impl From<HistArgs> for HistoryQuery {
    fn from(args: HistArgs) -> Self {
        HistoryQuery {
            depot: args.depot,
            stream: args.stream,
            time_spec: args.time,
            elements: args.elements,
            element_id: args.eid,
            transaction_kind: args.kind,
            username: args.user,
            ..Default::default()
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum ListingArg {
    /// The stream and everything below it
    Tree,
    /// Everything below the stream
    Children,
    /// Direct children only
    Immediate,
}

impl From<ListingArg> for StreamListing {
    fn from(arg: ListingArg) -> Self {
        match arg {
            ListingArg::Tree => StreamListing::PathAndChildren,
            ListingArg::Children => StreamListing::Children,
            ListingArg::Immediate => StreamListing::ImmediateChildren,
        }
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct StreamsArgs {
    #[arg(short = 'p', long)]
    pub depot: Option<String>,
    #[arg(short, long)]
    pub stream: Option<String>,
    #[arg(short, long)]
    pub time: Option<String>,
    /// Stream listing around --stream
    #[arg(short, long, value_enum)]
    pub listing: Option<ListingArg>,
    /// Include deactivated streams
    #[arg(short, long, default_value_t = false)]
    pub all: bool,
}

impl From<StreamsArgs> for StreamsQuery {
    fn from(args: StreamsArgs) -> Self {
        StreamsQuery {
            depot: args.depot,
            time_spec: args.time,
            stream: args.stream,
            listing: args.listing.map(StreamListing::from),
            include_deactivated: args.all,
            ..Default::default()
        }
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct PopArgs {
    /// Descend into directories
    #[arg(short = 'R', long, default_value_t = false)]
    pub recursive: bool,
    /// Overwrite modified files
    #[arg(short = 'O', long, default_value_t = false)]
    pub overwrite: bool,
    /// Stream or version to populate from (needs --location)
    #[arg(short = 'v', long = "version", requires = "location")]
    pub ver_spec: Option<String>,
    /// Target directory (needs --version)
    #[arg(short = 'L', long, requires = "ver_spec")]
    pub location: Option<String>,
    #[arg(short, long)]
    pub time: Option<String>,
    /// File listing the elements to populate
    #[arg(short, long)]
    pub list_file: Option<String>,
    pub elements: Vec<String>,
}

impl From<PopArgs> for PopulateRequest {
    fn from(args: PopArgs) -> Self {
        PopulateRequest {
            recursive: args.recursive,
            overwrite: args.overwrite,
            ver_spec: args.ver_spec,
            location: args.location,
            time_spec: args.time,
            list_file: args.list_file,
            elements: args.elements,
            ..Default::default()
        }
    }
}

/// Parse a response or explain why nothing is shown.
fn parse_or_warn<T: FromAcResponse>(app: &App, xml: &str) -> AppResult<Option<T>> {
    let parsed = T::from_xml(xml)?;
    if parsed.is_none() {
        app.ui.warn(&format!("accurev did not answer with a '{}' response", T::COMMAND));
    }
    Ok(parsed)
}

pub fn handle_hist(app: &App, args: HistArgs) -> AppResult<()> {
    let query = HistoryQuery::from(args);
    app.ui.update_step("Reading history...");
    let xml = accurev_hist(&app.config, &query)?;
    app.ui.finish_step();

    if let Some(history) = parse_or_warn::<History>(app, &xml)? {
        if history.transactions.is_empty() {
            app.ui.info("No transactions found");
            return Ok(());
        }
        app.ui.show_history(&history);
    }
    Ok(())
}

pub fn handle_users(app: &App) -> AppResult<()> {
    app.ui.update_step("Listing users...");
    let xml = accurev_show_users(&app.config, ShowOptions::xml())?;
    app.ui.finish_step();

    if let Some(show) = parse_or_warn::<ShowUsers>(app, &xml)? {
        app.ui.show_users(&show.users);
    }
    Ok(())
}

pub fn handle_depots(app: &App) -> AppResult<()> {
    app.ui.update_step("Listing depots...");
    let xml = accurev_show_depots(&app.config, ShowOptions::xml())?;
    app.ui.finish_step();

    if let Some(show) = parse_or_warn::<ShowDepots>(app, &xml)? {
        app.ui.show_depots(&show.depots);
    }
    Ok(())
}

pub fn handle_streams(app: &App, args: StreamsArgs) -> AppResult<()> {
    let query = StreamsQuery::from(args);
    app.ui.update_step("Listing streams...");
    let xml = accurev_show_streams(&app.config, &query)?;
    app.ui.finish_step();

    if let Some(show) = parse_or_warn::<ShowStreams>(app, &xml)? {
        app.ui.show_streams(&show.streams);
    }
    Ok(())
}

pub fn handle_pop(app: &App, args: PopArgs) -> AppResult<()> {
    let request = PopulateRequest::from(args);
    app.ui.update_step("Populating...");
    let output = accurev_populate(&app.config, &request)?;
    app.ui.finish_step();

    let errors = if output.stdout.trim().is_empty() {
        Vec::new()
    } else {
        populate_errors(&output.stdout)?
    };
    for error in &errors {
        app.ui.warn(error);
    }

    if output.success() && errors.is_empty() {
        app.ui.success("Populate finished");
        return Ok(());
    }
    Err(AppError::CommandFailed {
        command: "accurev pop".to_string(),
        stdout: output.stdout,
        stderr: output.stderr,
    })
}

pub fn handle_login(app: &App, user: Option<&str>) -> AppResult<()> {
    let user = match user {
        Some(user) => user.to_string(),
        None => app.ui.input("AccuRev user")?,
    };
    let password = app.ui.password(&format!("Password for {}", user.clone().yellow()))?;

    app.ui.update_step("Logging in...");
    if accurev_login(&app.config, &user, &password)? {
        app.ui.success(&format!("Logged in as {}", user.yellow().bold()));
        Ok(())
    } else {
        Err(AppError::Validation(format!("accurev login failed for '{}'", user)))
    }
}

pub fn handle_logout(app: &App) -> AppResult<()> {
    app.ui.update_step("Logging out...");
    if accurev_logout(&app.config)? {
        app.ui.success("Logged out");
        Ok(())
    } else {
        Err(AppError::Validation("accurev logout failed".to_string()))
    }
}
