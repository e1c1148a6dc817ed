//! UI data models

use std::time::Duration;

use crossterm::style::Stylize;
use indicatif::{ProgressBar, ProgressStyle};

const SPINNER_FRAMES: [&str; 16] = [
    "[=   ]", "[==  ]", "[=== ]", "[ ===]", "[  ==]", "[   =]", "[    ]", "[   =]",
    "[  ==]", "[ ===]", "[====]", "[=== ]", "[==  ]", "[=   ]", "[    ]", "    ",
];

pub struct SpinnerInfo {
    pub pb: ProgressBar,
}

impl SpinnerInfo {
    pub fn new() -> Self {
        let pb = ProgressBar::new_spinner();
        let style = ProgressStyle::default_spinner()
            .tick_strings(&SPINNER_FRAMES)
            .template("{spinner:.blue.bold} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());

        pb.set_style(style);
        pb.enable_steady_tick(Duration::from_millis(50));
        SpinnerInfo { pb }
    }

    pub fn get_current_message(&self) -> String {
        format!("{} {}", "[WAIT]".cyan().bold(), self.pb.message())
    }
}

/// One row of the transaction table.
pub struct TransactionRow {
    pub id: String,
    pub kind: String,
    pub time: String,
    pub user: String,
    pub comment: String,
    pub elements: usize,
}
