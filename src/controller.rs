//! Search-and-select state machine
//!
//! [`SearchSelectController`] owns the query, the loading flag, the current
//! result set and the selection. It never performs I/O itself: operations that
//! need a search return a [`FetchRequest`], and the caller hands the matching
//! [`FetchSettled`] back through [`SearchSelectController::settle`].
//!
//! Every request carries a [`RequestToken`]. Only the settlement for the most
//! recently issued token is applied; anything older is stale and dropped. The
//! loading flag follows the same token, so it cannot fall back to idle while
//! the latest request is still in flight.

use crate::entity::{Entity, EntityId};
use crate::error::FetchFailure;
use crate::highlight::{Highlighter, Segment};
use crate::selection::SelectionSet;
use std::time::{Duration, Instant};

/// Monotonic tag attached to each issued search
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct RequestToken(pub u64);

/// A search the caller must run against the provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub token: RequestToken,
    pub query: String,
}

/// Outcome of a [`FetchRequest`]
#[derive(Debug, Clone, PartialEq)]
pub struct FetchSettled {
    pub token: RequestToken,
    pub query: String,
    pub outcome: Result<Vec<Entity>, FetchFailure>,
}

/// What [`SearchSelectController::settle`] did with a settlement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    /// Results replaced the result set
    Applied { count: usize },
    /// Latest request failed; results left as they were
    Failed,
    /// A newer request was issued since; ignored
    Stale,
}

/// Loading indicator state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
}

/// Discrete inputs from the rendering layer or the fetch worker
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    QueryChanged(String),
    ListOpened,
    Toggled { entity: Entity, checked: bool },
    SelectionReplaced(Vec<Entity>),
    FetchSettled(FetchSettled),
}

/// Controller settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ControllerConfig {
    /// Quiet period after the last keystroke before searching.
    /// Zero searches on every keystroke.
    pub debounce: Duration,
}

#[derive(Debug, Clone)]
struct PendingQuery {
    query: String,
    due: Instant,
}

/// Owner of all picker state
#[derive(Debug, Clone)]
pub struct SearchSelectController {
    config: ControllerConfig,
    query: String,
    results: Vec<Entity>,
    selection: SelectionSet,
    load_state: LoadState,
    last_issued: RequestToken,
    pending: Option<PendingQuery>,
    last_error: Option<FetchFailure>,
}

impl Default for SearchSelectController {
    fn default() -> Self {
        Self::new(ControllerConfig::default())
    }
}

impl SearchSelectController {
    pub fn new(config: ControllerConfig) -> Self {
        Self {
            config,
            query: String::new(),
            results: Vec::new(),
            selection: SelectionSet::new(),
            load_state: LoadState::Idle,
            last_issued: RequestToken(0),
            pending: None,
            last_error: None,
        }
    }

    // --- Accessors ---

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn results(&self) -> &[Entity] {
        &self.results
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn is_loading(&self) -> bool {
        self.load_state == LoadState::Loading
    }

    pub fn load_state(&self) -> LoadState {
        self.load_state
    }

    pub fn last_issued(&self) -> RequestToken {
        self.last_issued
    }

    pub fn last_error(&self) -> Option<&FetchFailure> {
        self.last_error.as_ref()
    }

    pub fn has_pending_query(&self) -> bool {
        self.pending.is_some()
    }

    // --- Operations ---

    /// Set the query text and search for it.
    ///
    /// Without debounce the request is returned immediately. Otherwise it is
    /// parked until [`poll_debounce`](Self::poll_debounce) finds it due.
    pub fn update_query(&mut self, text: impl Into<String>) -> Option<FetchRequest> {
        self.update_query_at(text, Instant::now())
    }

    pub fn update_query_at(
        &mut self,
        text: impl Into<String>,
        now: Instant,
    ) -> Option<FetchRequest> {
        self.query = text.into();

        if self.config.debounce.is_zero() {
            return Some(self.fetch_results(self.query.clone()));
        }

        self.pending = Some(PendingQuery {
            query: self.query.clone(),
            due: now + self.config.debounce,
        });
        None
    }

    /// Issue the parked search once its quiet period has elapsed
    pub fn poll_debounce(&mut self, now: Instant) -> Option<FetchRequest> {
        let due = self.pending.as_ref().is_some_and(|p| now >= p.due);
        if !due {
            return None;
        }
        let pending = self.pending.take()?;
        Some(self.fetch_results(pending.query))
    }

    /// Start a search for `text`, superseding every earlier request
    pub fn fetch_results(&mut self, text: impl Into<String>) -> FetchRequest {
        self.pending = None;
        self.last_issued = RequestToken(self.last_issued.0 + 1);
        self.load_state = LoadState::Loading;

        let request = FetchRequest {
            token: self.last_issued,
            query: text.into(),
        };
        tracing::debug!("issued request #{} for {:?}", request.token.0, request.query);
        request
    }

    /// Refresh the list for the current query when it is opened
    pub fn open_result_list(&mut self) -> FetchRequest {
        self.fetch_results(self.query.clone())
    }

    /// Apply a settled request if it is still the latest one
    pub fn settle(&mut self, settled: FetchSettled) -> Settlement {
        let FetchSettled {
            token,
            query,
            outcome,
        } = settled;

        if token != self.last_issued {
            match &outcome {
                Ok(results) => tracing::debug!(
                    "dropping stale request #{} for {:?} ({} results, latest is #{})",
                    token.0,
                    query,
                    results.len(),
                    self.last_issued.0
                ),
                Err(e) => tracing::error!("stale request #{} for {:?} failed: {}", token.0, query, e),
            }
            return Settlement::Stale;
        }

        self.load_state = LoadState::Idle;
        match outcome {
            Ok(results) => {
                let count = results.len();
                self.results = results;
                self.last_error = None;
                tracing::info!("request #{} for {:?} returned {} results", token.0, query, count);
                Settlement::Applied { count }
            }
            Err(e) => {
                tracing::error!("search for {:?} failed: {}", query, e);
                self.last_error = Some(e);
                Settlement::Failed
            }
        }
    }

    /// Check or uncheck one entity
    pub fn toggle_selection(&mut self, entity: &Entity, is_now_checked: bool) {
        if is_now_checked {
            self.selection.insert(entity.clone());
        } else {
            self.selection.remove(&entity.id);
        }
    }

    /// Replace the whole selection. Emptying it also clears the query.
    pub fn replace_selection(&mut self, new_selection: Vec<Entity>) {
        self.selection = SelectionSet::from_entities(new_selection);
        if self.selection.is_empty() {
            self.query.clear();
            self.pending = None;
        }
    }

    /// Drop a single chip by id
    pub fn remove_chip(&mut self, id: &EntityId) {
        let remaining: Vec<Entity> = self
            .selection
            .iter()
            .filter(|e| &e.id != id)
            .cloned()
            .collect();
        self.replace_selection(remaining);
    }

    pub fn clear_selection(&mut self) {
        self.replace_selection(Vec::new());
    }

    pub fn is_selected(&self, entity: &Entity) -> bool {
        self.selection.contains(&entity.id)
    }

    /// Reducer entry point for event-driven callers
    pub fn dispatch(&mut self, event: Event) -> Option<FetchRequest> {
        match event {
            Event::QueryChanged(text) => self.update_query(text),
            Event::ListOpened => Some(self.open_result_list()),
            Event::Toggled { entity, checked } => {
                self.toggle_selection(&entity, checked);
                None
            }
            Event::SelectionReplaced(entities) => {
                self.replace_selection(entities);
                None
            }
            Event::FetchSettled(settled) => {
                self.settle(settled);
                None
            }
        }
    }

    /// Everything the rendering layer needs for one frame
    pub fn view(&self) -> PickerView<'_> {
        let highlighter = Highlighter::new(&self.query);
        let rows = self
            .results
            .iter()
            .map(|entity| ResultRow {
                entity,
                selected: self.is_selected(entity),
                label: highlighter.segments(&entity.name),
            })
            .collect();

        PickerView {
            query: &self.query,
            loading: self.is_loading(),
            rows,
            chips: self.selection.as_slice(),
            last_error: self.last_error.as_ref(),
        }
    }
}

/// One rendered result
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRow<'a> {
    pub entity: &'a Entity,
    pub selected: bool,
    pub label: Vec<Segment<'a>>,
}

/// Derived view data for one render cycle
#[derive(Debug, Clone, PartialEq)]
pub struct PickerView<'a> {
    pub query: &'a str,
    pub loading: bool,
    pub rows: Vec<ResultRow<'a>>,
    pub chips: &'a [Entity],
    pub last_error: Option<&'a FetchFailure>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn rick() -> Entity {
        Entity::new(1, "Rick Sanchez")
    }

    fn morty() -> Entity {
        Entity::new(2, "Morty Smith")
    }

    fn ok(request: &FetchRequest, results: Vec<Entity>) -> FetchSettled {
        FetchSettled {
            token: request.token,
            query: request.query.clone(),
            outcome: Ok(results),
        }
    }

    fn failed(request: &FetchRequest) -> FetchSettled {
        FetchSettled {
            token: request.token,
            query: request.query.clone(),
            outcome: Err(FetchFailure::Network {
                url: "http://localhost".into(),
                message: "connection refused".into(),
            }),
        }
    }

    #[test]
    fn starts_empty_and_idle() {
        let controller = SearchSelectController::default();
        assert_eq!(controller.query(), "");
        assert!(controller.results().is_empty());
        assert!(controller.selection().is_empty());
        assert_eq!(controller.load_state(), LoadState::Idle);
    }

    #[test]
    fn update_query_issues_one_request_for_the_text() {
        let mut controller = SearchSelectController::default();

        let request = controller.update_query("ric").unwrap();

        assert_eq!(request.query, "ric");
        assert_eq!(controller.query(), "ric");
        assert!(controller.is_loading());
        assert_eq!(controller.last_issued(), request.token);
    }

    #[test]
    fn empty_query_still_fetches() {
        let mut controller = SearchSelectController::default();
        let request = controller.update_query("").unwrap();
        assert_eq!(request.query, "");
    }

    #[test]
    fn later_request_wins_regardless_of_settle_order() {
        let mut controller = SearchSelectController::default();
        let first = controller.update_query("r").unwrap();
        let second = controller.update_query("ri").unwrap();

        assert_eq!(
            controller.settle(ok(&second, vec![rick()])),
            Settlement::Applied { count: 1 }
        );
        assert_eq!(
            controller.settle(ok(&first, vec![rick(), morty()])),
            Settlement::Stale
        );

        assert_eq!(controller.results(), &[rick()]);
        assert!(!controller.is_loading());
    }

    #[test]
    fn loading_stays_on_until_latest_settles() {
        let mut controller = SearchSelectController::default();
        let first = controller.update_query("r").unwrap();
        let second = controller.update_query("ri").unwrap();

        controller.settle(ok(&first, vec![morty()]));
        assert!(controller.is_loading());
        assert!(controller.results().is_empty());

        controller.settle(ok(&second, vec![rick()]));
        assert!(!controller.is_loading());
    }

    #[test]
    fn failure_keeps_results_and_clears_loading() {
        let mut controller = SearchSelectController::default();
        let first = controller.update_query("rick").unwrap();
        controller.settle(ok(&first, vec![rick()]));

        let second = controller.update_query("rick s").unwrap();
        assert_eq!(controller.settle(failed(&second)), Settlement::Failed);

        assert_eq!(controller.results(), &[rick()]);
        assert!(!controller.is_loading());
        assert!(controller.last_error().is_some());
    }

    #[test]
    fn success_clears_previous_error() {
        let mut controller = SearchSelectController::default();
        let first = controller.update_query("x").unwrap();
        controller.settle(failed(&first));

        let second = controller.open_result_list();
        controller.settle(ok(&second, vec![]));

        assert!(controller.last_error().is_none());
        assert!(controller.results().is_empty());
    }

    #[test]
    fn stale_failure_does_not_touch_state() {
        let mut controller = SearchSelectController::default();
        let first = controller.update_query("a").unwrap();
        let _second = controller.update_query("ab").unwrap();

        assert_eq!(controller.settle(failed(&first)), Settlement::Stale);
        assert!(controller.is_loading());
        assert!(controller.last_error().is_none());
    }

    #[test]
    fn results_are_replaced_not_merged() {
        let mut controller = SearchSelectController::default();
        let first = controller.update_query("r").unwrap();
        controller.settle(ok(&first, vec![rick(), morty()]));
        let second = controller.update_query("m").unwrap();
        controller.settle(ok(&second, vec![morty()]));

        assert_eq!(controller.results(), &[morty()]);
    }

    #[test]
    fn open_result_list_refetches_current_query() {
        let mut controller = SearchSelectController::default();
        let typed = controller.update_query("morty").unwrap();

        let reopened = controller.open_result_list();

        assert_eq!(reopened.query, "morty");
        assert!(reopened.token > typed.token);
    }

    #[test]
    fn toggle_twice_keeps_one_entry() {
        let mut controller = SearchSelectController::default();
        controller.toggle_selection(&rick(), true);
        controller.toggle_selection(&rick(), true);

        assert_eq!(controller.selection().len(), 1);
        assert!(controller.is_selected(&rick()));
    }

    #[test]
    fn toggle_on_then_off_restores_prior_state() {
        let mut controller = SearchSelectController::default();
        controller.toggle_selection(&morty(), true);
        let before = controller.selection().clone();

        controller.toggle_selection(&rick(), true);
        controller.toggle_selection(&rick(), false);

        assert_eq!(controller.selection(), &before);
    }

    #[test]
    fn replacing_with_nothing_clears_query() {
        let mut controller = SearchSelectController::default();
        controller.update_query("rick");
        controller.toggle_selection(&rick(), true);

        controller.replace_selection(Vec::new());

        assert_eq!(controller.query(), "");
        assert!(controller.selection().is_empty());
    }

    #[test]
    fn replacing_with_something_keeps_query() {
        let mut controller = SearchSelectController::default();
        controller.update_query("smith");
        controller.replace_selection(vec![morty(), morty()]);

        assert_eq!(controller.query(), "smith");
        assert_eq!(controller.selection().len(), 1);
    }

    #[test]
    fn removing_last_chip_clears_query() {
        let mut controller = SearchSelectController::default();
        controller.update_query("rick");
        controller.toggle_selection(&rick(), true);
        controller.toggle_selection(&morty(), true);

        controller.remove_chip(&rick().id);
        assert_eq!(controller.query(), "rick");
        controller.remove_chip(&morty().id);
        assert_eq!(controller.query(), "");
    }

    #[test]
    fn debounced_query_waits_for_quiet_period() {
        let mut controller = SearchSelectController::new(ControllerConfig {
            debounce: Duration::from_millis(300),
        });
        let start = Instant::now();

        assert!(controller.update_query_at("r", start).is_none());
        assert!(controller
            .update_query_at("ri", start + Duration::from_millis(100))
            .is_none());
        assert!(!controller.is_loading());

        assert!(controller
            .poll_debounce(start + Duration::from_millis(350))
            .is_none());
        let request = controller
            .poll_debounce(start + Duration::from_millis(400))
            .unwrap();

        assert_eq!(request.query, "ri");
        assert!(controller.is_loading());
        assert!(controller
            .poll_debounce(start + Duration::from_secs(5))
            .is_none());
    }

    #[test]
    fn explicit_fetch_supersedes_pending_query() {
        let mut controller = SearchSelectController::new(ControllerConfig {
            debounce: Duration::from_millis(300),
        });
        let start = Instant::now();
        controller.update_query_at("beth", start);

        let request = controller.open_result_list();

        assert_eq!(request.query, "beth");
        assert!(!controller.has_pending_query());
    }

    #[test]
    fn dispatch_routes_events() {
        let mut controller = SearchSelectController::default();

        let request = controller
            .dispatch(Event::QueryChanged("rick".into()))
            .unwrap();
        assert!(controller
            .dispatch(Event::FetchSettled(ok(&request, vec![rick(), morty()])))
            .is_none());
        controller.dispatch(Event::Toggled {
            entity: morty(),
            checked: true,
        });
        assert!(controller.dispatch(Event::ListOpened).is_some());
        controller.dispatch(Event::SelectionReplaced(Vec::new()));

        assert_eq!(controller.results().len(), 2);
        assert!(controller.selection().is_empty());
        assert_eq!(controller.query(), "");
    }

    #[test]
    fn view_marks_selected_rows_and_highlights_labels() {
        let mut controller = SearchSelectController::default();
        let request = controller.update_query("smith").unwrap();
        controller.settle(ok(&request, vec![rick(), morty()]));
        controller.toggle_selection(&morty(), true);

        let view = controller.view();

        assert!(!view.loading);
        assert_eq!(view.query, "smith");
        assert_eq!(view.chips, &[morty()]);
        assert!(!view.rows[0].selected);
        assert!(view.rows[1].selected);
        assert_eq!(
            view.rows[1].label,
            vec![Segment::plain("Morty "), Segment::matched("Smith")]
        );
        assert_eq!(view.rows[0].label, vec![Segment::plain("Rick Sanchez")]);
    }

    proptest! {
        #[test]
        fn every_query_update_issues_exactly_one_request(queries in proptest::collection::vec(".{0,12}", 1..10)) {
            let mut controller = SearchSelectController::default();
            for (i, q) in queries.iter().enumerate() {
                let request = controller.update_query(q.clone()).unwrap();
                prop_assert_eq!(&request.query, q);
                prop_assert_eq!(request.token, RequestToken(i as u64 + 1));
            }
        }

        #[test]
        fn only_latest_request_lands(settle_order in (2usize..8).prop_flat_map(|n| {
            Just((0..n).collect::<Vec<usize>>()).prop_shuffle()
        })) {
            let count = settle_order.len();
            let mut controller = SearchSelectController::default();
            let requests: Vec<_> = (0..count)
                .map(|i| controller.update_query(format!("q{}", i)).unwrap())
                .collect();

            for i in settle_order {
                let marker = Entity::new(i as u64, format!("q{}", i));
                controller.settle(ok(&requests[i], vec![marker]));
            }

            let latest = count - 1;
            prop_assert_eq!(controller.results().len(), 1);
            prop_assert_eq!(&controller.results()[0].name, &format!("q{}", latest));
            prop_assert!(!controller.is_loading());
        }
    }
}
