//! Data models module
//!
//! This module contains all data structures used throughout the engine

pub mod room;
pub mod enrollment;
pub mod assignment;
pub mod join_request;

// Re-export commonly used models
pub use room::{ExamRoom, RoomStatus, ExamMode, CreateExamRoomRequest};
pub use enrollment::{StudentEnrollment, EnrollmentStatus, CreateEnrollmentRequest};
pub use assignment::{FacultyAssignment, CreateAssignmentRequest, DEFAULT_PROCTOR_ROLE};
pub use join_request::{StudentJoinRequest, JoinRequestStatus, CreateJoinRequest};
