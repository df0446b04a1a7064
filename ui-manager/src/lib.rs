//! View models for the Telescope UI
//!
//! Everything here is plain state plus transitions; the host UI framework
//! renders it and feeds events back in.

pub mod search_box;
pub mod error_boundary;
pub mod performance_monitor;
pub mod star_list;

pub use search_box::*;
pub use error_boundary::*;
pub use performance_monitor::*;
pub use star_list::*;
