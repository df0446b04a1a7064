//! Search state for Telescope
//!
//! This crate holds the framework-agnostic logic behind the username search
//! box: a debounced query, a bounded most-recent-first search history that is
//! mirrored to key-value storage, and suggestions derived from that history.
//!
//! # Features
//! - Key-value storage abstraction with in-memory and file backends
//! - Persistent history store that never surfaces storage failures
//! - Suggestion filter over the history
//! - Single-slot cancellable debounce timer
//! - Search state controller that navigates on submit

pub mod storage;
pub mod history;
pub mod suggestions;
pub mod debounce;
pub mod navigation;
pub mod controller;

pub use storage::*;
pub use history::*;
pub use suggestions::*;
pub use debounce::*;
pub use navigation::*;
pub use controller::*;

// Re-export commonly used types
pub use telescope_core::*;
