/// Application router
///
/// Keeps the current route and reports every navigation to the tracker.

use std::sync::Arc;
use telescope_core::Route;
use telescope_search::Navigator;
use telescope_ui::PerformanceTracker;
use tokio::sync::watch;
use tracing::info;

pub struct AppRouter {
    current: watch::Sender<Route>,
    tracker: Arc<PerformanceTracker>,
}

impl AppRouter {
    /// Create a router sitting on the home route
    pub fn new(tracker: Arc<PerformanceTracker>) -> Self {
        let (current, _) = watch::channel(Route::Home);
        Self { current, tracker }
    }

    /// Route most recently navigated to
    pub fn current(&self) -> Route {
        self.current.borrow().clone()
    }

    /// Observe route changes
    pub fn subscribe(&self) -> watch::Receiver<Route> {
        self.current.subscribe()
    }
}

impl Navigator for AppRouter {
    fn navigate(&self, route: &Route) {
        let previous = self.current.send_replace(route.clone());
        let (from, to) = (previous.path(), route.path());

        info!("Navigating from {} to {}", from, to);
        self.tracker.track_navigation(&from, &to);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use telescope_ui::MetricValue;

    #[test]
    fn test_router_starts_at_home() {
        let router = AppRouter::new(Arc::new(PerformanceTracker::new()));
        assert_eq!(router.current(), Route::Home);
    }

    #[test]
    fn test_navigate_updates_route_and_metrics() {
        let tracker = Arc::new(PerformanceTracker::new());
        tracker.start();
        let router = AppRouter::new(tracker.clone());
        let mut updates = router.subscribe();

        router.navigate(&Route::user("octocat"));

        assert_eq!(router.current(), Route::user("octocat"));
        assert!(updates.has_changed().unwrap());
        assert_eq!(*updates.borrow_and_update(), Route::user("octocat"));

        let navigations = tracker.metrics_named("navigation");
        assert_eq!(navigations.len(), 1);
        assert_eq!(
            navigations[0].metadata.get("to"),
            Some(&MetricValue::from("/users/octocat"))
        );
    }
}
