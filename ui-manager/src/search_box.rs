//! Search box view model
//!
//! Wires a text input, a search button and a suggestion dropdown to a
//! [`SearchController`].

use telescope_core::Route;
use telescope_search::SearchController;
use tracing::debug;

/// Number of recent searches listed when nothing matches the query
pub const RECENT_SEARCHES_LIMIT: usize = 5;

/// Keys the input reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKey {
    Enter,
    Escape,
    Other,
}

/// What the dropdown under the input shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dropdown {
    Hidden,
    /// History entries completing the current query
    Suggestions(Vec<String>),
    /// Newest history entries, shown when there are no suggestions
    Recent(Vec<String>),
}

impl Dropdown {
    pub fn is_visible(&self) -> bool {
        !matches!(self, Dropdown::Hidden)
    }

    /// Entries listed in the dropdown
    pub fn items(&self) -> &[String] {
        match self {
            Dropdown::Hidden => &[],
            Dropdown::Suggestions(items) | Dropdown::Recent(items) => items,
        }
    }
}

/// Search box state
#[derive(Debug)]
pub struct SearchBox {
    controller: SearchController,
    dropdown_open: bool,
}

impl SearchBox {
    pub fn new(controller: SearchController) -> Self {
        Self {
            controller,
            dropdown_open: false,
        }
    }

    pub fn controller(&self) -> &SearchController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut SearchController {
        &mut self.controller
    }

    /// Adopt a value pushed from outside, e.g. the login in the current URL
    pub fn sync_value(&mut self, value: &str) {
        if self.controller.query() != value {
            self.controller.set_query(value);
        }
    }

    /// Text typed into the input
    pub fn on_input(&mut self, text: &str) {
        self.controller.set_query(text);
        self.dropdown_open = true;
    }

    /// Key pressed in the input; returns the route when a search ran
    pub fn on_key(&mut self, key: SearchKey) -> Option<Route> {
        match key {
            SearchKey::Enter => {
                self.dropdown_open = false;
                self.controller.handle_search(None)
            }
            SearchKey::Escape => {
                self.dropdown_open = false;
                None
            }
            SearchKey::Other => None,
        }
    }

    pub fn on_focus(&mut self) {
        self.dropdown_open =
            !self.controller.suggestions().is_empty() || !self.controller.history().is_empty();
    }

    pub fn on_blur(&mut self) {
        self.dropdown_open = false;
    }

    /// A dropdown entry was picked
    pub fn select(&mut self, item: &str) -> Option<Route> {
        debug!("Dropdown entry selected: {}", item);
        self.controller.set_query(item);
        self.dropdown_open = false;
        self.controller.handle_search(Some(item))
    }

    pub fn clear_history(&mut self) {
        self.controller.clear_history();
    }

    pub fn dropdown(&self) -> Dropdown {
        if !self.dropdown_open {
            return Dropdown::Hidden;
        }

        let suggestions = self.controller.suggestions();
        if !suggestions.is_empty() {
            return Dropdown::Suggestions(suggestions);
        }

        let history = self.controller.history();
        if history.is_empty() {
            Dropdown::Hidden
        } else {
            let limit = RECENT_SEARCHES_LIMIT.min(history.len());
            Dropdown::Recent(history[..limit].to_vec())
        }
    }

    /// Where the search button points
    pub fn button_route(&self) -> Route {
        let query = self.controller.query().trim();
        if query.is_empty() {
            Route::Home
        } else {
            Route::user(query)
        }
    }

    /// Whether the busy indicator is shown
    pub fn show_spinner(&self) -> bool {
        self.controller.is_searching()
    }
}
