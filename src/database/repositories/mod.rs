//! Database repositories module
//!
//! This module contains the Postgres implementations of the store contracts

pub mod room;
pub mod enrollment;
pub mod assignment;
pub mod join_request;

// Re-export repositories
pub use room::RoomRepository;
pub use enrollment::EnrollmentRepository;
pub use assignment::AssignmentRepository;
pub use join_request::JoinRequestRepository;
