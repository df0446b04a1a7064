/// Main application module
///
/// Provides high-level Application API

use crate::{AppConfig, AppContext, AppStatistics, LoggerConfig, UnifiedLogger};
use std::sync::Arc;
use telescope_core::{RepositorySlug, Result, Route, TelescopeError};
use telescope_search::Navigator;
use telescope_ui::{PerformanceSnapshot, SearchBox, StarList, UserStarredRepositoriesResponse};
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Main application
pub struct Application {
    /// Application context
    context: Arc<AppContext>,

    /// The header search box
    search_box: Mutex<SearchBox>,
}

impl Application {
    /// Create and initialize a new application
    pub async fn new(config: AppConfig) -> Result<Self> {
        // Initialize logging
        if !UnifiedLogger::init(LoggerConfig::with_level(config.log_level.as_str()))? {
            warn!("Global logger already installed, keeping it");
        }

        info!("Starting Telescope");

        let monitoring = config.enable_performance_monitoring;
        let context = Arc::new(AppContext::new(config).await?);

        if monitoring {
            context.tracker.start();
        }

        let search_box = Mutex::new(context.search_box("").await);

        info!("Application initialized successfully");

        Ok(Self {
            context,
            search_box,
        })
    }

    /// Shutdown the application
    pub async fn shutdown(&self) -> Result<()> {
        info!("Shutting down application");
        self.context.shutdown().await?;
        info!("Application shutdown complete");
        Ok(())
    }

    /// Get application context
    pub fn context(&self) -> &Arc<AppContext> {
        &self.context
    }

    // High-level API methods

    /// Submit a username search; blank terms are ignored
    pub async fn search(&self, term: &str) -> Option<Route> {
        self.search_box.lock().await.select(term)
    }

    /// Open one of a user's starred repositories
    pub async fn open_repository(&self, login: &str, name_with_owner: &str) -> Result<Route> {
        let slug = match RepositorySlug::from_name_with_owner(name_with_owner) {
            Ok(slug) => slug,
            Err(e) => {
                let error = TelescopeError::from(e);
                self.context
                    .error_handler
                    .handle_error(&error, "open_repository")
                    .await;
                return Err(error);
            }
        };

        let route = Route::star(login, slug);
        self.context.router.navigate(&route);
        Ok(route)
    }

    /// Build the starred repository grid for `login` from a fetched page
    pub async fn show_stars(
        &self,
        login: &str,
        response: &UserStarredRepositoriesResponse,
    ) -> Result<StarList> {
        let _render = self.context.tracker.track_render("stars");

        match StarList::from_response(login, response) {
            Ok(list) => Ok(list),
            Err(e) => {
                let error = TelescopeError::from(e);
                self.context
                    .error_handler
                    .handle_error(&error, "show_stars")
                    .await;
                Err(error)
            }
        }
    }

    pub fn current_route(&self) -> Route {
        self.context.router.current()
    }

    /// Recent searches, newest first
    pub async fn history(&self) -> Vec<String> {
        self.search_box.lock().await.controller().history().to_vec()
    }

    pub async fn clear_history(&self) {
        self.search_box.lock().await.clear_history();
    }

    /// Access the header search box
    pub fn search_box(&self) -> &Mutex<SearchBox> {
        &self.search_box
    }

    pub fn performance_snapshot(&self) -> PerformanceSnapshot {
        self.context.tracker.snapshot()
    }

    /// Get application statistics
    pub async fn get_stats(&self) -> AppStatistics {
        self.context.get_stats().await
    }
}
