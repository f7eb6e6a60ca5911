//! ProctorRoom Exam Admission Engine
//!
//! Partitions an exam's enrolled students into capacity-bounded video rooms,
//! assigns proctoring faculty, and governs live admission of students through
//! a join-request state machine with rejoin semantics. Room occupancy is
//! mutated exclusively through atomic store primitives, so concurrent
//! approvals never push a room past its capacity.

pub mod config;
pub mod models;
pub mod database;
pub mod services;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{ProctorRoomError, ProviderError, Result};

// Re-export main components for easy access
pub use database::DatabaseService;
pub use services::{ServiceFactory, RoomAllocator, AdmissionController};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
