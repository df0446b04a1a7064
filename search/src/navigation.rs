//! Route navigation seam between the search controller and the host router

use parking_lot::RwLock;
use telescope_core::Route;

/// Transitions the application to a route.
///
/// Navigation is fire-and-forget from the caller's side; implementations may
/// complete it asynchronously.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: &Route);
}

/// Navigator that only remembers where it was sent
#[derive(Debug, Default)]
pub struct MemoryNavigator {
    visited: RwLock<Vec<Route>>,
}

impl MemoryNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every route navigated to, oldest first
    pub fn visited(&self) -> Vec<Route> {
        self.visited.read().clone()
    }

    /// Most recent route, if any
    pub fn last(&self) -> Option<Route> {
        self.visited.read().last().cloned()
    }
}

impl Navigator for MemoryNavigator {
    fn navigate(&self, route: &Route) {
        self.visited.write().push(route.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_navigator_records_routes() {
        let navigator = MemoryNavigator::new();
        assert!(navigator.last().is_none());

        navigator.navigate(&Route::Home);
        navigator.navigate(&Route::user("octocat"));

        assert_eq!(navigator.visited().len(), 2);
        assert_eq!(navigator.last(), Some(Route::user("octocat")));
    }
}
