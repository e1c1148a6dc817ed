use crate::{core::config::ToolConfig, ui::display::AppUI};

pub struct App {
    pub ui: AppUI,
    pub config: ToolConfig,
}

impl App {
    pub fn new(config: ToolConfig) -> Self {
        App {
            ui: AppUI::new(),
            config,
        }
    }
}
