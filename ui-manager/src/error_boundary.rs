//! Error boundary state machine
//!
//! The host framework reports render failures through [`ErrorBoundary::catch`]
//! and renders whatever [`ErrorBoundary::view`] returns. State transitions
//! live in the pure [`reduce`] function.

use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use std::sync::Arc;
use tracing::{error, info};

/// Retries offered before the boundary only suggests a full reload
pub const MAX_RETRIES: u32 = 3;

const GENERIC_MESSAGE: &str = "An unexpected error occurred. Please try again.";

/// Error reported to the boundary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaughtError {
    pub message: String,
    /// Technical details such as the source chain
    pub details: Option<String>,
}

impl CaughtError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Capture an error together with its `source()` chain
    pub fn from_error(err: &(dyn StdError + 'static)) -> Self {
        let mut chain = Vec::new();
        let mut source = err.source();
        while let Some(cause) = source {
            chain.push(cause.to_string());
            source = cause.source();
        }

        Self {
            message: err.to_string(),
            details: (!chain.is_empty()).then(|| chain.join("\ncaused by: ")),
        }
    }
}

/// Boundary state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoundaryState {
    /// Children render normally
    Healthy { retries_used: u32 },
    /// Children failed; the fallback is shown
    Failed { error: CaughtError, retry_count: u32 },
}

impl BoundaryState {
    pub fn is_failed(&self) -> bool {
        matches!(self, BoundaryState::Failed { .. })
    }

    /// Whether the fallback should offer a retry
    pub fn can_retry(&self) -> bool {
        matches!(self, BoundaryState::Failed { retry_count, .. } if *retry_count < MAX_RETRIES)
    }

    /// Retries spent so far
    pub fn retry_count(&self) -> u32 {
        match self {
            BoundaryState::Healthy { retries_used } => *retries_used,
            BoundaryState::Failed { retry_count, .. } => *retry_count,
        }
    }
}

impl Default for BoundaryState {
    fn default() -> Self {
        BoundaryState::Healthy { retries_used: 0 }
    }
}

/// Inputs to the boundary state machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoundaryEvent {
    /// A child failed
    Caught(CaughtError),
    /// The user asked to re-render the children
    Retry,
    /// Start over with a fresh retry budget (page reload)
    Reset,
}

/// Apply `event` to `state`.
///
/// The retry budget carries across failures, so a child that keeps failing
/// gets at most [`MAX_RETRIES`] re-renders until a reset.
pub fn reduce(state: BoundaryState, event: BoundaryEvent) -> BoundaryState {
    match (state, event) {
        (_, BoundaryEvent::Reset) => BoundaryState::default(),
        (state, BoundaryEvent::Caught(error)) => BoundaryState::Failed {
            error,
            retry_count: state.retry_count(),
        },
        (BoundaryState::Failed { retry_count, .. }, BoundaryEvent::Retry)
            if retry_count < MAX_RETRIES =>
        {
            BoundaryState::Healthy {
                retries_used: retry_count + 1,
            }
        }
        (state, BoundaryEvent::Retry) => state,
    }
}

/// Message shown to visitors for a caught error
pub fn user_facing_message(error: &CaughtError) -> &'static str {
    let message = error.message.as_str();
    if message.contains("User not found") {
        "GitHub user not found. Please check the username and try again."
    } else if message.contains("Repository not found") {
        "Repository not found. It may be private or no longer exists."
    } else if message.contains("Rate limit exceeded") {
        "GitHub API rate limit exceeded. Please wait a moment and try again."
    } else if message.contains("Network") {
        "Network error. Please check your internet connection and try again."
    } else {
        GENERIC_MESSAGE
    }
}

/// What the host should render
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoundaryView {
    /// Render the children
    Content,
    Fallback {
        message: String,
        can_retry: bool,
        /// Retry button label, e.g. `Try again (1/3)`
        retry_label: String,
        details: Option<String>,
    },
}

/// Hook run for every caught error
pub type ErrorHook = Arc<dyn Fn(&CaughtError) + Send + Sync>;

/// Adapter between a host framework's error catching and [`reduce`]
#[derive(Default)]
pub struct ErrorBoundary {
    state: BoundaryState,
    fallback: Option<String>,
    on_error: Option<ErrorHook>,
    show_details: bool,
}

impl ErrorBoundary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the computed message with fixed fallback text
    pub fn with_fallback(mut self, fallback: impl Into<String>) -> Self {
        self.fallback = Some(fallback.into());
        self
    }

    pub fn on_error<F>(mut self, hook: F) -> Self
    where
        F: Fn(&CaughtError) + Send + Sync + 'static,
    {
        self.on_error = Some(Arc::new(hook));
        self
    }

    /// Expose technical details in the fallback (development builds)
    pub fn with_details(mut self, show: bool) -> Self {
        self.show_details = show;
        self
    }

    pub fn state(&self) -> &BoundaryState {
        &self.state
    }

    /// Report a failure from the wrapped children
    pub fn catch(&mut self, caught: CaughtError) {
        error!(
            "Error boundary caught an error: {} ({:?})",
            caught.message, caught.details
        );

        if let Some(hook) = &self.on_error {
            hook(&caught);
        }

        self.dispatch(BoundaryEvent::Caught(caught));
    }

    /// Re-render the children if the retry budget allows it
    pub fn retry(&mut self) -> bool {
        if !self.state.can_retry() {
            return false;
        }
        self.dispatch(BoundaryEvent::Retry);
        info!(
            "Error boundary retry {}/{}",
            self.state.retry_count(),
            MAX_RETRIES
        );
        true
    }

    pub fn reset(&mut self) {
        self.dispatch(BoundaryEvent::Reset);
    }

    pub fn view(&self) -> BoundaryView {
        let BoundaryState::Failed { error, retry_count } = &self.state else {
            return BoundaryView::Content;
        };

        let message = self
            .fallback
            .clone()
            .unwrap_or_else(|| user_facing_message(error).to_string());

        let retry_label = if *retry_count > 0 {
            format!("Try again ({}/{})", retry_count, MAX_RETRIES)
        } else {
            "Try again".to_string()
        };

        BoundaryView::Fallback {
            message,
            can_retry: self.state.can_retry(),
            retry_label,
            details: if self.show_details {
                error.details.clone().or_else(|| Some(error.message.clone()))
            } else {
                None
            },
        }
    }

    fn dispatch(&mut self, event: BoundaryEvent) {
        let state = std::mem::take(&mut self.state);
        self.state = reduce(state, event);
    }
}

impl std::fmt::Debug for ErrorBoundary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ErrorBoundary")
            .field("state", &self.state)
            .field("fallback", &self.fallback)
            .field("show_details", &self.show_details)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use telescope_core::{GitHubApiError, TelescopeError};

    fn failed(retry_count: u32) -> BoundaryState {
        BoundaryState::Failed {
            error: CaughtError::new("boom"),
            retry_count,
        }
    }

    #[test]
    fn test_reduce_catch_from_healthy() {
        let state = reduce(
            BoundaryState::default(),
            BoundaryEvent::Caught(CaughtError::new("boom")),
        );
        assert_eq!(state, failed(0));
    }

    #[test]
    fn test_reduce_retry_increments() {
        let state = reduce(failed(0), BoundaryEvent::Retry);
        assert_eq!(state, BoundaryState::Healthy { retries_used: 1 });

        // Budget carries into the next failure
        let state = reduce(state, BoundaryEvent::Caught(CaughtError::new("boom")));
        assert_eq!(state, failed(1));
    }

    #[test]
    fn test_reduce_retry_exhausted() {
        assert_eq!(reduce(failed(MAX_RETRIES), BoundaryEvent::Retry), failed(MAX_RETRIES));
    }

    #[test]
    fn test_reduce_retry_while_healthy_is_noop() {
        let state = BoundaryState::Healthy { retries_used: 2 };
        assert_eq!(reduce(state.clone(), BoundaryEvent::Retry), state);
    }

    #[test]
    fn test_reduce_reset() {
        assert_eq!(
            reduce(failed(3), BoundaryEvent::Reset),
            BoundaryState::default()
        );
    }

    #[test]
    fn test_exactly_three_retries() {
        let mut boundary = ErrorBoundary::new();

        for attempt in 1..=MAX_RETRIES {
            boundary.catch(CaughtError::new("boom"));
            assert!(boundary.retry(), "retry {attempt} should be allowed");
        }

        boundary.catch(CaughtError::new("boom"));
        assert!(!boundary.retry());
        match boundary.view() {
            BoundaryView::Fallback { can_retry, .. } => assert!(!can_retry),
            BoundaryView::Content => panic!("expected fallback"),
        }

        boundary.reset();
        assert_eq!(boundary.view(), BoundaryView::Content);
    }

    #[test]
    fn test_friendly_messages() {
        let cases = [
            ("User not found: octocat", "GitHub user not found. Please check the username and try again."),
            ("Repository not found: a/b", "Repository not found. It may be private or no longer exists."),
            ("Rate limit exceeded. Please try again later.", "GitHub API rate limit exceeded. Please wait a moment and try again."),
            ("Network error: timeout", "Network error. Please check your internet connection and try again."),
            ("something else", GENERIC_MESSAGE),
        ];
        for (raw, expected) in cases {
            assert_eq!(user_facing_message(&CaughtError::new(raw)), expected);
        }
    }

    #[test]
    fn test_view_labels_and_fallback() {
        let mut boundary = ErrorBoundary::new();
        assert_eq!(boundary.view(), BoundaryView::Content);

        boundary.catch(CaughtError::new("User not found: ghost"));
        assert_eq!(
            boundary.view(),
            BoundaryView::Fallback {
                message: "GitHub user not found. Please check the username and try again."
                    .to_string(),
                can_retry: true,
                retry_label: "Try again".to_string(),
                details: None,
            }
        );

        boundary.retry();
        boundary.catch(CaughtError::new("boom"));
        let BoundaryView::Fallback { retry_label, .. } = boundary.view() else {
            panic!("expected fallback");
        };
        assert_eq!(retry_label, "Try again (1/3)");

        let mut custom = ErrorBoundary::new().with_fallback("Custom fallback");
        custom.catch(CaughtError::new("boom"));
        let BoundaryView::Fallback { message, .. } = custom.view() else {
            panic!("expected fallback");
        };
        assert_eq!(message, "Custom fallback");
    }

    #[test]
    fn test_on_error_hook_and_details() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let mut boundary = ErrorBoundary::new()
            .with_details(true)
            .on_error(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            });

        let err: TelescopeError = GitHubApiError::RateLimitExceeded.into();
        boundary.catch(CaughtError::from_error(&err));

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        let BoundaryView::Fallback { message, details, .. } = boundary.view() else {
            panic!("expected fallback");
        };
        assert_eq!(
            message,
            "GitHub API rate limit exceeded. Please wait a moment and try again."
        );
        assert_eq!(
            details.as_deref(),
            Some("Rate limit exceeded. Please try again later.")
        );
    }
}
