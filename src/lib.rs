//! CampusEvents backend core
//!
//! Backend library for a college event-management platform: students
//! discover and register for events, club admins publish events and mark
//! attendance, and feedback is collected afterwards. Each event and club
//! carries derived counters that are recomputed from source rows after
//! every child mutation. The REST layer and web client live elsewhere
//! and consume this crate.

#![allow(non_snake_case)]

pub mod config;
pub mod database;
pub mod models;
pub mod services;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{CampusEventsError, Result};

// Re-export main components for easy access
pub use database::DatabaseService;
pub use services::ServiceFactory;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
