use crate::controller::{FetchRequest, SearchSelectController, Settlement};
use crate::entity::Entity;
use crate::error::PickError;
use crate::provider::SearchProvider;
use crate::tui::list::ListState;
use crate::tui::search::SearchState;
use crate::tui::ui;
use crate::worker::FetchWorker;
use crate::AppConfig;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::DefaultTerminal;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Which pane receives keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Input,
    List,
}

/// How the picker was left
#[derive(Debug, Clone, PartialEq)]
pub enum ExitAction {
    Cancelled,
    Confirmed(Vec<Entity>),
}

pub struct App {
    pub controller: SearchSelectController,
    worker: FetchWorker,

    // Sub-states
    pub search: SearchState,
    pub list: ListState,
    pub focus: Focus,

    pub status_message: String,
    pub last_updated: Option<String>,
    pub spinner_tick: usize,

    exit: Option<ExitAction>,
}

impl App {
    pub fn new(config: &AppConfig, provider: Arc<dyn SearchProvider>) -> Self {
        let mut app = Self {
            controller: SearchSelectController::new(config.controller_config()),
            worker: FetchWorker::new(provider),
            search: SearchState::default(),
            list: ListState::default(),
            focus: Focus::Input,
            status_message: "Ready".to_string(),
            last_updated: None,
            spinner_tick: 0,
            exit: None,
        };

        if !config.initial_query.is_empty() {
            app.search.set_text(&config.initial_query);
            app.query_changed();
        }

        app
    }

    pub fn should_quit(&self) -> bool {
        self.exit.is_some()
    }

    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> crate::Result<ExitAction> {
        let tick_rate = Duration::from_millis(50);
        let mut last_tick = Instant::now();

        loop {
            terminal.draw(|frame| ui::draw(frame, self))?;

            let timeout = tick_rate.saturating_sub(last_tick.elapsed());
            if event::poll(timeout)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key);
                    }
                }
            }

            if last_tick.elapsed() >= tick_rate {
                self.tick(Instant::now());
                last_tick = Instant::now();
            }

            if let Some(exit) = self.exit.take() {
                return Ok(exit);
            }
        }
    }

    /// Fire due debounced searches and apply settled ones
    pub fn tick(&mut self, now: Instant) {
        if let Some(request) = self.controller.poll_debounce(now) {
            self.submit(request);
        }
        self.process_messages();
        if self.controller.is_loading() {
            self.spinner_tick = self.spinner_tick.wrapping_add(1);
        }
    }

    fn submit(&self, request: FetchRequest) {
        self.worker.dispatch(request);
    }

    fn process_messages(&mut self) {
        for settled in self.worker.drain() {
            match self.controller.settle(settled) {
                Settlement::Applied { count } => {
                    self.list.reset(count);
                    self.last_updated = Some(chrono::Local::now().format("%H:%M:%S").to_string());
                    self.status_message = format!("{} results", count);
                }
                Settlement::Failed => {
                    if let Some(e) = self.controller.last_error() {
                        self.status_message = format!("Search failed: {}", e.summary());
                    }
                }
                Settlement::Stale => {}
            }
        }
    }

    // --- Actions ---

    fn query_changed(&mut self) {
        if let Some(request) = self.controller.update_query(self.search.text.clone()) {
            self.submit(request);
        }
        self.list.open = true;
    }

    fn open_list(&mut self) {
        let request = self.controller.open_result_list();
        self.submit(request);
        self.list.open = true;
    }

    fn close_list(&mut self) {
        self.list.open = false;
        self.focus = Focus::Input;
    }

    fn current_entity(&self) -> Option<&Entity> {
        let idx = self.list.selected?;
        self.controller.results().get(idx)
    }

    fn toggle_current(&mut self) {
        let Some(entity) = self.current_entity().cloned() else {
            return;
        };
        let checked = !self.controller.is_selected(&entity);
        self.controller.toggle_selection(&entity, checked);
        tracing::debug!("{} {}", if checked { "selected" } else { "deselected" }, entity.name);
    }

    fn remove_last_chip(&mut self) {
        if let Some(last) = self.controller.selection().last().map(|e| e.id.clone()) {
            self.controller.remove_chip(&last);
            self.search.set_text(self.controller.query());
        }
    }

    fn clear_selection(&mut self) {
        self.controller.clear_selection();
        self.search.set_text(self.controller.query());
        self.status_message = "Selection cleared".to_string();
    }

    fn open_image(&mut self) {
        let Some(entity) = self.current_entity().cloned() else {
            return;
        };
        if entity.image.is_empty() {
            self.status_message = format!("{} has no image", entity.name);
            return;
        }

        let image = entity.image;
        match open::that(&image) {
            Ok(()) => self.status_message = format!("Opened {}", image),
            Err(e) => {
                let err = PickError::Open(image, e.to_string());
                tracing::warn!("{}", err);
                self.status_message = err.to_string();
            }
        }
    }

    fn copy_selection(&mut self) {
        let names = self
            .controller
            .selection()
            .iter()
            .map(|e| e.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        if names.is_empty() {
            self.status_message = "Nothing selected".to_string();
            return;
        }

        let copied = arboard::Clipboard::new()
            .and_then(|mut clipboard| clipboard.set_text(names))
            .map_err(|e| PickError::Clipboard(e.to_string()));
        match copied {
            Ok(()) => {
                self.status_message =
                    format!("Copied {} names", self.controller.selection().len())
            }
            Err(e) => {
                tracing::warn!("{}", e);
                self.status_message = e.to_string();
            }
        }
    }

    fn confirm(&mut self) {
        let picked = self.controller.selection().to_vec();
        tracing::info!("confirmed {} selected entities", picked.len());
        self.exit = Some(ExitAction::Confirmed(picked));
    }

    // --- Key handling ---

    pub fn handle_key(&mut self, key: KeyEvent) {
        // Global keys
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('c') | KeyCode::Char('q') => {
                    self.exit = Some(ExitAction::Cancelled);
                    return;
                }
                KeyCode::Char('x') => {
                    self.clear_selection();
                    return;
                }
                KeyCode::Char('o') => {
                    self.open_image();
                    return;
                }
                KeyCode::Char('y') => {
                    self.copy_selection();
                    return;
                }
                _ => {}
            }
        }

        match key.code {
            KeyCode::Esc => {
                if self.list.open {
                    self.close_list();
                } else if !self.search.text.is_empty() {
                    self.search.clear();
                    self.query_changed();
                    self.list.open = false;
                } else {
                    self.exit = Some(ExitAction::Cancelled);
                }
                return;
            }
            KeyCode::Enter => {
                self.confirm();
                return;
            }
            _ => {}
        }

        match self.focus {
            Focus::Input => self.handle_search_key(key),
            Focus::List => self.handle_list_key(key),
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.search.insert(c);
                self.query_changed();
            }
            KeyCode::Backspace => {
                if self.search.text.is_empty() {
                    self.remove_last_chip();
                } else if self.search.backspace() {
                    self.query_changed();
                }
            }
            KeyCode::Delete => {
                if self.search.delete() {
                    self.query_changed();
                }
            }
            KeyCode::Left => self.search.move_left(),
            KeyCode::Right => self.search.move_right(),
            KeyCode::Home => self.search.move_home(),
            KeyCode::End => self.search.move_end(),
            KeyCode::Tab | KeyCode::Down => {
                if !self.list.open {
                    self.open_list();
                }
                self.focus = Focus::List;
                self.search.focused = false;
                if self.list.selected.is_none() {
                    self.list.reset(self.controller.results().len());
                }
            }
            _ => {}
        }
    }

    fn handle_list_key(&mut self, key: KeyEvent) {
        let total = self.controller.results().len();
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                if matches!(self.list.selected, Some(0) | None) {
                    self.focus = Focus::Input;
                    self.search.focused = true;
                } else {
                    self.list.select_prev();
                }
            }
            KeyCode::Down | KeyCode::Char('j') => self.list.select_next(total),
            KeyCode::PageUp => self.list.page_up(),
            KeyCode::PageDown => self.list.page_down(total),
            KeyCode::Home => self.list.select_first(total),
            KeyCode::End => self.list.select_last(total),
            KeyCode::Char(' ') => self.toggle_current(),

            KeyCode::Tab | KeyCode::Char('/') => {
                self.focus = Focus::Input;
                self.search.focused = true;
            }

            // Any other printable char focuses search and types it
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.focus = Focus::Input;
                self.search.focused = true;
                self.search.move_end();
                self.search.insert(c);
                self.query_changed();
            }

            _ => {}
        }
    }
}
