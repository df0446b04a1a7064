/// Unified error handler for centralized error management

use std::sync::Arc;
use telescope_core::{GitHubApiError, TelescopeError};
use tokio::sync::RwLock;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Error severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ErrorSeverity {
    /// Critical error requiring immediate attention
    Critical,
    /// Error that affects functionality
    Error,
    /// Warning about potential issues
    Warning,
    /// Informational message
    Info,
}

/// Error entry for tracking
#[derive(Debug, Clone)]
pub struct ErrorEntry {
    pub id: Uuid,
    pub error: String,
    pub severity: ErrorSeverity,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub context: String,
}

/// Unified error handler
pub struct UnifiedErrorHandler {
    /// Recent errors for reporting
    recent_errors: Arc<RwLock<Vec<ErrorEntry>>>,
    /// Maximum number of errors to keep
    max_errors: usize,
}

impl UnifiedErrorHandler {
    /// Create a new error handler
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Create a handler keeping at most `max_errors` entries
    pub fn with_capacity(max_errors: usize) -> Self {
        Self {
            recent_errors: Arc::new(RwLock::new(Vec::new())),
            max_errors,
        }
    }

    /// Handle an error with automatic logging
    pub async fn handle_error(&self, error: &TelescopeError, context: &str) -> ErrorSeverity {
        let severity = classify_error(error);

        match severity {
            ErrorSeverity::Critical => {
                error!("CRITICAL ERROR in {}: {}", context, error);
            }
            ErrorSeverity::Error => {
                error!("ERROR in {}: {}", context, error);
            }
            ErrorSeverity::Warning => {
                warn!("WARNING in {}: {}", context, error);
            }
            ErrorSeverity::Info => {
                info!("INFO in {}: {}", context, error);
            }
        }

        let entry = ErrorEntry {
            id: Uuid::new_v4(),
            error: error.to_string(),
            severity,
            timestamp: chrono::Utc::now(),
            context: context.to_string(),
        };

        self.add_error_entry(entry).await;
        severity
    }

    /// Add an error entry to the history
    async fn add_error_entry(&self, entry: ErrorEntry) {
        let mut errors = self.recent_errors.write().await;
        errors.push(entry);

        // Keep only recent errors
        if errors.len() > self.max_errors {
            let excess = errors.len() - self.max_errors;
            errors.drain(0..excess);
        }
    }

    /// Get recent errors
    pub async fn get_recent_errors(&self) -> Vec<ErrorEntry> {
        self.recent_errors.read().await.clone()
    }

    /// Get error statistics
    pub async fn get_error_stats(&self) -> ErrorStatistics {
        let errors = self.recent_errors.read().await;

        let mut stats = ErrorStatistics {
            total: errors.len(),
            ..Default::default()
        };

        for error in errors.iter() {
            match error.severity {
                ErrorSeverity::Critical => stats.critical += 1,
                ErrorSeverity::Error => stats.errors += 1,
                ErrorSeverity::Warning => stats.warnings += 1,
                ErrorSeverity::Info => stats.info += 1,
            }
        }

        stats
    }

    /// Clear error history
    pub async fn clear_errors(&self) {
        self.recent_errors.write().await.clear();
    }
}

impl Default for UnifiedErrorHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Classify error severity
pub fn classify_error(error: &TelescopeError) -> ErrorSeverity {
    match error {
        TelescopeError::Storage { .. } => ErrorSeverity::Warning,
        TelescopeError::Slug { .. } => ErrorSeverity::Warning,
        TelescopeError::GitHubApi { source } => match source {
            GitHubApiError::UserNotFound { .. } | GitHubApiError::RepositoryNotFound { .. } => {
                ErrorSeverity::Info
            }
            GitHubApiError::RateLimitExceeded => ErrorSeverity::Warning,
            GitHubApiError::Network { .. } | GitHubApiError::FetchFailed { .. } => {
                ErrorSeverity::Error
            }
            GitHubApiError::MissingToken => ErrorSeverity::Critical,
        },
        TelescopeError::System { .. } => ErrorSeverity::Critical,
    }
}

/// Error statistics
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct ErrorStatistics {
    pub total: usize,
    pub critical: usize,
    pub errors: usize,
    pub warnings: usize,
    pub info: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use telescope_core::{SlugError, StorageError, SystemError};

    #[tokio::test]
    async fn test_error_handler_creation() {
        let handler = UnifiedErrorHandler::new();
        let stats = handler.get_error_stats().await;
        assert_eq!(stats.total, 0);
    }

    #[tokio::test]
    async fn test_handle_error() {
        let handler = UnifiedErrorHandler::new();
        let error: TelescopeError = StorageError::Unavailable {
            reason: "disabled".to_string(),
        }
        .into();

        let severity = handler.handle_error(&error, "history_load").await;

        assert_eq!(severity, ErrorSeverity::Warning);
        let errors = handler.get_recent_errors().await;
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].context, "history_load");
    }

    #[test]
    fn test_classify_error() {
        let not_found: TelescopeError = GitHubApiError::UserNotFound {
            login: "ghost".to_string(),
        }
        .into();
        let token: TelescopeError = GitHubApiError::MissingToken.into();
        let slug: TelescopeError = SlugError::Empty.into();
        let system: TelescopeError = SystemError::Unknown {
            details: "?".to_string(),
        }
        .into();

        assert_eq!(classify_error(&not_found), ErrorSeverity::Info);
        assert_eq!(classify_error(&token), ErrorSeverity::Critical);
        assert_eq!(classify_error(&slug), ErrorSeverity::Warning);
        assert_eq!(classify_error(&system), ErrorSeverity::Critical);
    }

    #[tokio::test]
    async fn test_stats_and_capacity() {
        let handler = UnifiedErrorHandler::with_capacity(2);
        let rate_limit: TelescopeError = GitHubApiError::RateLimitExceeded.into();
        let network: TelescopeError = GitHubApiError::Network {
            details: "timeout".to_string(),
        }
        .into();

        handler.handle_error(&rate_limit, "stars").await;
        handler.handle_error(&network, "stars").await;
        handler.handle_error(&network, "repository").await;

        let stats = handler.get_error_stats().await;
        assert_eq!(stats.total, 2);
        assert_eq!(stats.errors, 2);
        assert_eq!(stats.warnings, 0);

        handler.clear_errors().await;
        assert_eq!(handler.get_error_stats().await.total, 0);
    }
}
