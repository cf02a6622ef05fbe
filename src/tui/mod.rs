pub mod app;
pub mod colors;
pub mod list;
pub mod search;
pub mod ui;

use crate::provider::SearchProvider;
use crate::tui::app::{App, ExitAction};
use crate::AppConfig;
use std::sync::Arc;

/// Entry point: run the interactive picker until the user confirms or quits
pub fn run(config: &AppConfig, provider: Arc<dyn SearchProvider>) -> crate::Result<ExitAction> {
    let mut terminal = ratatui::try_init()?;
    let mut app = App::new(config, provider);
    let result = app.run(&mut terminal);
    ratatui::try_restore()?;
    result
}
