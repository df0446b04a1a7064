//! Search State Controller
//!
//! Owns the text of a search box, its debounced value and the search
//! history, and performs a search when the user submits.
//!
//! The debounced value lives in a `tokio::sync::watch` channel so hosts can
//! subscribe to settled queries from any reactive-state mechanism.

use crate::debounce::{DebounceTimer, DEFAULT_DEBOUNCE};
use crate::history::{HistoryStore, SearchHistory};
use crate::navigation::Navigator;
use crate::storage::KeyValueStorage;
use crate::suggestions::suggestions_for;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use telescope_core::Route;
use tokio::sync::watch;
use tracing::{debug, info};

/// Callback invoked with the trimmed term on every successful search
pub type SearchCallback = Arc<dyn Fn(&str) + Send + Sync>;

/// Controller options
#[derive(Clone)]
pub struct SearchOptions {
    /// Quiet period before a query is considered settled
    pub debounce: Duration,
    /// Gates every history read and write
    pub enable_history: bool,
    /// Called with the trimmed term on every successful search
    pub on_search: Option<SearchCallback>,
}

impl SearchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn with_history(mut self, enabled: bool) -> Self {
        self.enable_history = enabled;
        self
    }

    pub fn on_search<F>(mut self, callback: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.on_search = Some(Arc::new(callback));
        self
    }
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            enable_history: true,
            on_search: None,
        }
    }
}

impl fmt::Debug for SearchOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchOptions")
            .field("debounce", &self.debounce)
            .field("enable_history", &self.enable_history)
            .field("on_search", &self.on_search.is_some())
            .finish()
    }
}

/// Debounce state of the query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebounceState {
    /// Query equals the debounced query
    Idle,
    /// An edit is waiting for the quiet period to elapse
    Pending,
}

/// Search state controller
pub struct SearchController {
    query: String,
    debounced: Arc<watch::Sender<String>>,
    timer: DebounceTimer,
    history: SearchHistory,
    store: HistoryStore,
    options: SearchOptions,
    navigator: Arc<dyn Navigator>,
}

impl SearchController {
    /// Create a controller whose query and debounced query start at `initial_query`.
    ///
    /// History is loaded from `storage` when enabled.
    pub fn new(
        initial_query: impl Into<String>,
        options: SearchOptions,
        navigator: Arc<dyn Navigator>,
        storage: Arc<dyn KeyValueStorage>,
    ) -> Self {
        let query = initial_query.into();
        let (debounced, _) = watch::channel(query.clone());
        let store = HistoryStore::new(storage);

        let history = if options.enable_history {
            SearchHistory::from_entries(store.load())
        } else {
            SearchHistory::new()
        };
        debug!("Search controller created with {} history entries", history.len());

        Self {
            query,
            debounced: Arc::new(debounced),
            timer: DebounceTimer::new(options.debounce),
            history,
            store,
            options,
            navigator,
        }
    }

    /// Current raw query
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Query as of the last quiet period
    pub fn debounced_query(&self) -> String {
        self.debounced.borrow().clone()
    }

    /// Receiver notified whenever the debounced query settles on a new value
    pub fn subscribe_debounced(&self) -> watch::Receiver<String> {
        self.debounced.subscribe()
    }

    /// True while the query differs from the debounced query
    pub fn is_searching(&self) -> bool {
        *self.debounced.borrow() != self.query
    }

    pub fn debounce_state(&self) -> DebounceState {
        if self.is_searching() {
            DebounceState::Pending
        } else {
            DebounceState::Idle
        }
    }

    /// History entries, newest first
    pub fn history(&self) -> &[String] {
        self.history.entries()
    }

    /// Suggestions for the current query
    pub fn suggestions(&self) -> Vec<String> {
        suggestions_for(&self.query, self.history.entries())
    }

    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    /// Replace the query and restart the debounce window
    pub fn set_query(&mut self, text: impl Into<String>) {
        self.query = text.into();

        if !self.is_searching() {
            self.timer.cancel();
            return;
        }

        let debounced = Arc::clone(&self.debounced);
        let settled = self.query.clone();
        self.timer.schedule(move || {
            debounced.send_if_modified(|current| {
                if *current == settled {
                    return false;
                }
                *current = settled;
                true
            });
        });
    }

    /// Search for `term`, or the current query when `term` is `None`.
    ///
    /// Blank terms are ignored. Otherwise the trimmed term is recorded in the
    /// history, passed to the `on_search` callback and navigated to. Returns
    /// the route navigated to.
    pub fn handle_search(&mut self, term: Option<&str>) -> Option<Route> {
        let term = term.unwrap_or(&self.query).trim().to_string();
        if term.is_empty() {
            debug!("Ignoring blank search");
            return None;
        }

        if self.options.enable_history && self.history.record(&term) {
            self.store.save(self.history.entries());
        }

        if let Some(on_search) = &self.options.on_search {
            on_search(&term);
        }

        let route = Route::user(term);
        info!("Searching, navigating to {}", route);
        self.navigator.navigate(&route);
        Some(route)
    }

    /// Empty the history and delete its persisted record
    pub fn clear_history(&mut self) {
        self.history.clear();
        if self.options.enable_history {
            self.store.clear();
        }
    }

    /// Remove the entry exactly equal to `term` and persist the result
    pub fn remove_from_history(&mut self, term: &str) {
        if self.history.remove(term) && self.options.enable_history {
            self.store.save(self.history.entries());
        }
    }
}

impl fmt::Debug for SearchController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchController")
            .field("query", &self.query)
            .field("debounced", &*self.debounced.borrow())
            .field("history", &self.history)
            .field("options", &self.options)
            .finish()
    }
}
