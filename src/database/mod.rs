//! Database module
//!
//! This module handles database connections and the store implementations

pub mod connection;
pub mod store;
pub mod repositories;
pub mod memory;
pub mod service;

// Re-export commonly used database components
pub use connection::{DatabasePool, PoolConfig, create_pool, run_migrations, health_check};
pub use store::{RoomStore, EnrollmentStore, AssignmentStore, JoinRequestStore};
pub use repositories::{RoomRepository, EnrollmentRepository, AssignmentRepository, JoinRequestRepository};
pub use memory::{InMemoryRoomStore, InMemoryEnrollmentStore, InMemoryAssignmentStore, InMemoryJoinRequestStore};
pub use service::DatabaseService;
