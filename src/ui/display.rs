use std::{cell::RefCell, io};

use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use crossterm::{
    cursor, execute,
    style::{self, SetForegroundColor, Stylize},
};
use unicode_width::UnicodeWidthStr;

use crate::{
    accurev::models::{Depot, History, Stream, User},
    core::{
        error::{AppError, AppResult},
        utils::{CursorGuard, format_epoch, or_dash},
    },
    git::{BranchListEntry, StatusReport, StitchAction},
    ui::models::{SpinnerInfo, TransactionRow},
};

pub struct AppUI {
    spinner: RefCell<Option<SpinnerInfo>>,
    dialoguer_color_theme: dialoguer::theme::ColorfulTheme,
    _cursor_guard: CursorGuard,
}

impl AppUI {
    pub fn new() -> Self {
        let mut color_theme = dialoguer::theme::ColorfulTheme::default();
        color_theme.success_prefix = dialoguer::console::style(String::from("[ OK ]")).green().bold().bright();
        color_theme.error_prefix = dialoguer::console::style(String::from("[ERR!]")).red().bright().bold();
        color_theme.prompt_prefix = dialoguer::console::style(String::from("[INFO]")).blue().bright().bold();
        color_theme.success_suffix = dialoguer::console::style(String::new());
        color_theme.prompt_style = dialoguer::console::Style::new().for_stderr();
        color_theme.prompt_suffix = dialoguer::console::style(String::new()).for_stderr().black().bright();

        AppUI {
            spinner: RefCell::new(None),
            dialoguer_color_theme: color_theme,
            _cursor_guard: CursorGuard::new(),
        }
    }

    /// Plain information
    pub fn info(&self, msg: &str) {
        self.print_safe(format!("{} {}", "[INFO]".blue().bold(), msg));
    }

    pub fn warn(&self, msg: &str) {
        let fixed_msg = keep_color(msg, style::Color::Yellow);
        self.print_safe(format!(
            "{} {}{}{}",
            "[WARN]".dark_yellow().bold(),
            SetForegroundColor(style::Color::Yellow),
            fixed_msg,
            style::Attribute::Reset
        ));
    }

    pub fn success(&self, msg: &str) {
        self.finish_step();
        self.print_safe(format!("{} {}", "[ OK ]".green().bold(), msg));
    }

    pub fn error(&self, msg: &str) {
        self.finish_step();
        let fixed_msg = keep_color(msg, style::Color::Red);
        self.print_safe(format!(
            "{} {}{}{}",
            "[ERR!]".red().bold(),
            SetForegroundColor(style::Color::Red),
            fixed_msg,
            style::Attribute::Reset
        ));
    }

    /// Show (or update) the spinner for a running step
    pub fn update_step(&self, msg: &str) {
        if let Some(pb_info) = self.spinner.borrow().as_ref() {
            pb_info.pb.set_message(msg.to_string());
            return;
        }
        self.start_step(msg);
    }

    /// Stop the spinner without printing anything
    pub fn finish_step(&self) {
        if let Some(pb_info) = self.spinner.borrow_mut().take() {
            pb_info.pb.finish_and_clear();
        }
    }

    /// Transactions of an `accurev hist` response
    pub fn show_history(&self, history: &History) {
        let mut table = self.create_clean_table(&["  TRANS", "TYPE", "TIME", "USER", "ELEMS", "COMMENT"]);

        let rows = history.transactions.iter().map(|t| TransactionRow {
            id: or_dash(t.id.as_deref()).to_string(),
            kind: or_dash(t.kind.as_deref()).to_string(),
            time: t.time.as_deref().map(format_epoch).unwrap_or_else(|| "-".to_string()),
            user: or_dash(t.user.as_deref()).to_string(),
            comment: t.comment.as_deref().unwrap_or("").lines().next().unwrap_or("").to_string(),
            elements: t.versions.len() + t.moves.len(),
        });

        for row in rows {
            table.add_row([
                Cell::new(format!("  {}", row.id)).fg(Color::Yellow),
                Cell::new(row.kind).fg(Color::Cyan),
                Cell::new(row.time).fg(Color::DarkGrey),
                Cell::new(row.user),
                Cell::new(row.elements),
                Cell::new(row.comment),
            ]);
        }
        self.print_safe(table.to_string());

        if !history.streams.is_empty() {
            self.show_streams(&history.streams);
        }
    }

    pub fn show_users(&self, users: &[User]) {
        let mut table = self.create_clean_table(&["  NUMBER", "NAME", "KIND"]);
        for user in users {
            table.add_row([
                Cell::new(format!("  {}", or_dash(user.number.as_deref()))).fg(Color::DarkGrey),
                Cell::new(or_dash(user.name.as_deref())).fg(Color::Yellow),
                Cell::new(or_dash(user.kind.as_deref())),
            ]);
        }
        self.print_safe(table.to_string());
    }

    pub fn show_depots(&self, depots: &[Depot]) {
        let mut table = self.create_clean_table(&["  NUMBER", "NAME", "SLICE", "LOCKING", "CASE", "REPLICATION"]);
        for depot in depots {
            table.add_row([
                Cell::new(format!("  {}", or_dash(depot.number.as_deref()))).fg(Color::DarkGrey),
                Cell::new(or_dash(depot.name.as_deref())).fg(Color::Yellow),
                Cell::new(or_dash(depot.slice.as_deref())),
                Cell::new(or_dash(depot.exclusive_locking.as_deref())),
                Cell::new(or_dash(depot.case.as_deref())),
                Cell::new(or_dash(depot.repl_status.as_deref())),
            ]);
        }
        self.print_safe(table.to_string());
    }

    pub fn show_streams(&self, streams: &[Stream]) {
        let mut table = self.create_clean_table(&["  NAME", "NUMBER", "TYPE", "BASIS", "DEPOT", "WORKSPACE"]);
        for stream in streams {
            let workspace = stream
                .workspace
                .as_ref()
                .map(|w| format!("{}:{}", or_dash(w.host.as_deref()), or_dash(w.storage.as_deref())))
                .unwrap_or_else(|| "-".to_string());

            let name = Cell::new(format!("  {}", or_dash(stream.name.as_deref())));
            let name = if stream.is_dynamic.as_deref() == Some("true") {
                name.fg(Color::Yellow)
            } else {
                name.add_attribute(comfy_table::Attribute::Italic)
            };

            table.add_row([
                name,
                Cell::new(or_dash(stream.stream_number.as_deref())).fg(Color::DarkGrey),
                Cell::new(or_dash(stream.kind.as_deref())).fg(Color::Cyan),
                Cell::new(or_dash(stream.basis.as_deref())),
                Cell::new(or_dash(stream.depot_name.as_deref())),
                Cell::new(workspace).fg(Color::DarkGrey),
            ]);
        }
        self.print_safe(table.to_string());
    }

    pub fn show_status(&self, report: &StatusReport) {
        match &report.branch {
            Some(branch) => self.info(&format!("On branch {}", branch.clone().yellow().bold())),
            None => self.warn("Not currently on any branch"),
        }

        if report.is_clean() {
            self.success("Working tree clean");
            return;
        }

        let mut table = self.create_clean_table(&["  STATE", "STATUS", "PATH"]);
        for change in &report.staged {
            table.add_row([
                Cell::new("  staged").fg(Color::Green),
                Cell::new(&change.status),
                Cell::new(&change.path),
            ]);
        }
        for change in &report.changed {
            table.add_row([
                Cell::new("  unstaged").fg(Color::Red),
                Cell::new(&change.status),
                Cell::new(&change.path),
            ]);
        }
        for path in &report.untracked {
            table.add_row([
                Cell::new("  untracked").fg(Color::DarkGrey),
                Cell::new("-"),
                Cell::new(path),
            ]);
        }
        self.print_safe(table.to_string());
    }

    pub fn show_branches(&self, branches: &[BranchListEntry]) {
        let mut table = self.create_clean_table(&["  BRANCH", "COMMIT", "UPSTREAM", "MESSAGE"]);
        for branch in branches {
            let name = if branch.is_current {
                Cell::new(format!("* {}", branch.name))
                    .fg(Color::Yellow)
                    .add_attribute(comfy_table::Attribute::Bold)
            } else {
                Cell::new(format!("  {}", branch.name))
            };
            table.add_row([
                name,
                Cell::new(&branch.short_hash).fg(Color::DarkGrey),
                Cell::new(branch.remote.as_deref().unwrap_or("")).fg(Color::Cyan),
                Cell::new(&branch.comment),
            ]);
        }
        self.print_safe(table.to_string());
    }

    pub fn show_stitch(&self, actions: &[StitchAction]) {
        if actions.is_empty() {
            self.success("No commits share a tree across branches");
            return;
        }
        for action in actions {
            self.print_safe(format!("  {}", action));
        }
    }

    /// Prompt for a line of text
    pub fn input(&self, prompt: &str) -> AppResult<String> {
        self.with_spinner_suspended(|message| {
            prepare_prompt(message);
            let result = dialoguer::Input::<String>::with_theme(&self.dialoguer_color_theme)
                .with_prompt(prompt)
                .interact_text()
                .map_err(|e| AppError::Validation(e.to_string()));
            execute!(io::stderr(), cursor::Hide).ok();
            result
        })
    }

    /// Prompt for a secret; an empty answer cancels the operation
    pub fn password(&self, prompt: &str) -> AppResult<String> {
        let secret = self.with_spinner_suspended(|message| {
            prepare_prompt(message);
            let result = dialoguer::Password::with_theme(&self.dialoguer_color_theme)
                .with_prompt(prompt)
                .allow_empty_password(true)
                .interact()
                .map_err(|e| AppError::Validation(e.to_string()));
            execute!(io::stderr(), cursor::Hide).ok();
            result
        })?;

        if secret.is_empty() {
            return Err(AppError::OperationCancelled);
        }
        Ok(secret)
    }

    fn with_spinner_suspended<T>(&self, f: impl FnOnce(Option<&str>) -> T) -> T {
        if let Some(pb_info) = self.spinner.borrow().as_ref() {
            let message = pb_info.get_current_message();
            return pb_info.pb.suspend(|| f(Some(&message)));
        }
        f(None)
    }

    fn start_step(&self, msg: &str) {
        self.finish_step();
        let spinner_info = SpinnerInfo::new();
        spinner_info.pb.set_message(msg.to_string());
        *self.spinner.borrow_mut() = Some(spinner_info);
    }

    fn print_safe(&self, msg: String) {
        if let Some(pb_info) = self.spinner.borrow().as_ref() {
            pb_info.pb.suspend(|| println!("{}", msg));
        } else {
            println!("{}", msg);
        }
    }

    /// Borderless table with dynamic width and a grey header
    fn create_clean_table(&self, header: &[&str]) -> Table {
        let mut table = Table::new();
        table
            .load_preset(presets::NOTHING)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(
                header
                    .iter()
                    .map(|h| Cell::new(h).fg(Color::DarkGrey).add_attribute(comfy_table::Attribute::Bold)),
            );
        for column in table.column_iter_mut() {
            column.set_padding((0, 3));
        }
        table
    }
}

/// Re-apply `color` after every reset embedded in `msg` so highlighted
/// fragments do not end the message colour.
fn keep_color(msg: &str, color: style::Color) -> String {
    let style_prefix = format!("{}", SetForegroundColor(color));
    let reset_all = format!("{}", style::Attribute::Reset);
    let reset_fg = format!("{}", SetForegroundColor(style::Color::Reset));
    let restore_patch = format!("{}{}", reset_all, style_prefix);
    msg.replace(&reset_all, &restore_patch).replace(&reset_fg, &restore_patch)
}

/// Leave the spinner message on the line below the prompt.
fn prepare_prompt(message: Option<&str>) {
    let mut stderr_io = io::stderr();
    execute!(stderr_io, style::Print("\n")).ok();
    if let Some(msg) = message {
        execute!(stderr_io, style::Print(msg)).ok();
        execute!(stderr_io, cursor::MoveLeft(msg.width() as u16)).ok();
    }
    execute!(stderr_io, cursor::MoveUp(1)).ok();
    execute!(stderr_io, cursor::Show).ok();
}
