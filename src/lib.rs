//! multipick - Multi-select search picker for remote text-search APIs
//!
//! Type a query, watch matching entities load, tick the ones you want, and
//! see the matched part of each name highlighted.
//!
//! # Features
//!
//! - **Live search**: every query change searches the provider (optionally debounced)
//! - **Stale-response rejection**: only the latest request's results are shown
//! - **Multi-select**: checkbox selection shown as removable chips
//! - **Literal highlighting**: case-insensitive, safe for any user input
//!
//! # Example
//!
//! ```no_run
//! use multipick::{FetchWorker, HttpProvider, HttpProviderConfig, SearchSelectController};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! fn main() -> multipick::Result<()> {
//!     let provider = HttpProvider::new(&HttpProviderConfig::default())?;
//!     let worker = FetchWorker::new(Arc::new(provider));
//!     let mut controller = SearchSelectController::default();
//!
//!     if let Some(request) = controller.update_query("rick") {
//!         worker.dispatch(request);
//!     }
//!     if let Some(settled) = worker.recv_timeout(Duration::from_secs(10)) {
//!         controller.settle(settled);
//!     }
//!
//!     for row in controller.view().rows {
//!         let label: String = row.label.iter().map(|s| s.text).collect();
//!         println!("[{}] {}", if row.selected { "x" } else { " " }, label);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod controller;
pub mod entity;
pub mod error;
pub mod highlight;
pub mod logging;
pub mod provider;
pub mod selection;
pub mod tui;
pub mod worker;

// Re-export main types
pub use controller::{
    ControllerConfig, Event, FetchRequest, FetchSettled, LoadState, PickerView, RequestToken,
    ResultRow, SearchSelectController, Settlement,
};
pub use entity::{Entity, EntityId};
pub use error::{FetchFailure, PickError, Result};
pub use highlight::{highlight, Highlighter, Segment};
pub use provider::{HttpProvider, HttpProviderConfig, SearchProvider};
pub use selection::SelectionSet;
pub use worker::FetchWorker;

use std::path::PathBuf;
use std::time::Duration;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default keystroke debounce for the interactive picker
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// How the confirmed selection is written on exit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Text,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Search endpoint
    pub endpoint: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// Quiet period before a typed query is searched
    pub debounce: Duration,
    /// Log file (None = next to the executable)
    pub log_file: Option<PathBuf>,
    /// Query to start with
    pub initial_query: String,
    /// Format of the printed selection
    pub output: OutputFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            endpoint: provider::DEFAULT_ENDPOINT.to_string(),
            timeout: provider::DEFAULT_TIMEOUT,
            debounce: DEFAULT_DEBOUNCE,
            log_file: None,
            initial_query: String::new(),
            output: OutputFormat::Json,
        }
    }
}

impl AppConfig {
    pub fn provider_config(&self) -> HttpProviderConfig {
        HttpProviderConfig {
            endpoint: self.endpoint.clone(),
            timeout: self.timeout,
        }
    }

    pub fn controller_config(&self) -> ControllerConfig {
        ControllerConfig {
            debounce: self.debounce,
        }
    }
}

/// Render the confirmed selection for stdout
pub fn format_selection(selection: &[Entity], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(selection)?),
        OutputFormat::Text => Ok(selection
            .iter()
            .map(|e| e.name.as_str())
            .collect::<Vec<_>>()
            .join("\n")),
    }
}
