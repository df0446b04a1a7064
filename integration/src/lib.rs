/// Application wiring for Telescope
///
/// Builds storage, the performance tracker and the router from an
/// [`AppConfig`], and hands out search boxes and error boundaries bound to
/// them.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use telescope_core::{Result, SystemError};
use telescope_search::{
    FileStorage, HistoryStore, KeyValueStorage, MemoryStorage, SearchController, SearchOptions,
};
use telescope_ui::{metadata, ErrorBoundary, PerformanceTracker, SearchBox};
use tokio::sync::RwLock;
use tracing::{debug, info};

pub mod application;
pub mod error_handler;
pub mod logger;
pub mod router;

pub use application::Application;
pub use error_handler::{ErrorSeverity, ErrorStatistics, UnifiedErrorHandler};
pub use logger::{LoggerConfig, UnifiedLogger};
pub use router::AppRouter;

/// Application configuration
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory for persisted data; in-memory storage when unset
    pub storage_dir: Option<PathBuf>,

    /// Record and persist search history
    pub enable_history: bool,

    /// Idle time before a query settles
    pub debounce_ms: u64,

    /// Enable performance monitoring
    pub enable_performance_monitoring: bool,

    /// Log level
    pub log_level: String,

    /// Show technical details in error fallbacks
    pub show_error_details: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage_dir: None,
            enable_history: true,
            debounce_ms: 300,
            enable_performance_monitoring: true,
            log_level: "info".to_string(),
            show_error_details: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from a JSON file, falling back to defaults when
    /// the file does not exist
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path).map_err(SystemError::from)?;
        let config = serde_json::from_str(&raw).map_err(SystemError::from)?;
        Ok(config)
    }

    /// Write configuration as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let raw = serde_json::to_string_pretty(self).map_err(SystemError::from)?;
        std::fs::write(path, raw).map_err(SystemError::from)?;
        Ok(())
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

/// Application context that holds all initialized components
pub struct AppContext {
    /// Backing store for history and web vitals
    pub storage: Arc<dyn KeyValueStorage>,

    /// Performance tracker shared by every component
    pub tracker: Arc<PerformanceTracker>,

    /// Route navigator
    pub router: Arc<AppRouter>,

    /// Unified error handler
    pub error_handler: Arc<UnifiedErrorHandler>,

    /// Application configuration
    pub config: Arc<RwLock<AppConfig>>,
}

impl AppContext {
    /// Create a new application context with all components initialized
    pub async fn new(config: AppConfig) -> Result<Self> {
        info!("Initializing application context");

        let storage: Arc<dyn KeyValueStorage> = match &config.storage_dir {
            Some(dir) => {
                std::fs::create_dir_all(dir).map_err(SystemError::from)?;
                Arc::new(FileStorage::new(dir))
            }
            None => Arc::new(MemoryStorage::new()),
        };
        info!("Storage initialized");

        let tracker = Arc::new(PerformanceTracker::new().with_storage(storage.clone()));
        let router = Arc::new(AppRouter::new(tracker.clone()));
        let error_handler = Arc::new(UnifiedErrorHandler::new());
        let config = Arc::new(RwLock::new(config));

        info!("Application context initialized successfully");

        Ok(Self {
            storage,
            tracker,
            router,
            error_handler,
            config,
        })
    }

    /// Search options derived from the current configuration
    pub async fn search_options(&self) -> SearchOptions {
        let config = self.config.read().await;
        let tracker = self.tracker.clone();

        SearchOptions::new()
            .with_debounce(config.debounce())
            .with_history(config.enable_history)
            .on_search(move |term| {
                tracker.record_metric("search", 1.0, metadata([("term", term)]));
            })
    }

    /// Create a search box wired to this context's storage and router
    pub async fn search_box(&self, initial_query: &str) -> SearchBox {
        let options = self.search_options().await;
        let controller = SearchController::new(
            initial_query,
            options,
            self.router.clone(),
            self.storage.clone(),
        );
        SearchBox::new(controller)
    }

    /// Create an error boundary that reports caught errors to the tracker
    pub async fn error_boundary(&self) -> ErrorBoundary {
        let show_details = self.config.read().await.show_error_details;
        let tracker = self.tracker.clone();

        ErrorBoundary::new()
            .with_details(show_details)
            .on_error(move |caught| {
                tracker.record_metric(
                    "error_boundary",
                    1.0,
                    metadata([("message", caught.message.as_str())]),
                );
            })
    }

    /// Shutdown all components gracefully
    pub async fn shutdown(&self) -> Result<()> {
        info!("Shutting down application context");

        self.tracker.stop();
        info!("Performance tracking stopped");

        info!("Application context shutdown complete");
        Ok(())
    }

    /// Get application statistics
    pub async fn get_stats(&self) -> AppStatistics {
        let history_entries = HistoryStore::new(self.storage.clone()).load().len();

        AppStatistics {
            current_route: self.router.current().path(),
            history_entries,
            metrics_recorded: self.tracker.metrics().len(),
            web_vitals_reported: self.tracker.web_vitals().len(),
            tracking_enabled: self.tracker.is_running(),
            errors: self.error_handler.get_error_stats().await,
        }
    }
}

/// Application statistics
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct AppStatistics {
    pub current_route: String,
    pub history_entries: usize,
    pub metrics_recorded: usize,
    pub web_vitals_reported: usize,
    pub tracking_enabled: bool,
    pub errors: ErrorStatistics,
}
