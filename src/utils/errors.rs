//! Error handling for ProctorRoom
//!
//! This module defines the main error types used throughout the engine
//! and provides a unified error handling strategy.

use thiserror::Error;
use uuid::Uuid;

/// Main error type for the ProctorRoom engine
#[derive(Error, Debug)]
pub enum ProctorRoomError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Video room provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Exam room not found: {room_id}")]
    RoomNotFound { room_id: Uuid },

    #[error("No enrollment for student {student_id} in exam {exam_id}")]
    EnrollmentNotFound { exam_id: Uuid, student_id: Uuid },

    #[error("Join request not found: {request_id}")]
    RequestNotFound { request_id: Uuid },

    #[error("No proctoring assignment for faculty {faculty_id} in exam {exam_id}")]
    AssignmentNotFound { exam_id: Uuid, faculty_id: Uuid },

    #[error("A pending join request already exists for student {student_id} in exam {exam_id}")]
    DuplicatePendingRequest { exam_id: Uuid, student_id: Uuid },

    #[error("Exam {exam_id} already has rooms allocated")]
    AlreadyAllocated { exam_id: Uuid },

    #[error("Room {room_id} is at capacity")]
    RoomAtCapacity { room_id: Uuid },

    #[error("Invalid state transition: {from} -> {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("Faculty {faculty_id} is not the assigned proctor of room {room_id}")]
    NotRoomProctor { faculty_id: Uuid, room_id: Uuid },

    #[error("Allocation for exam {exam_id} aborted after {} room(s) were created: {source}", created_rooms.len())]
    PartialAllocation {
        exam_id: Uuid,
        created_rooms: Vec<Uuid>,
        #[source]
        source: Box<ProctorRoomError>,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),
}

/// Video room provider specific errors
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider request failed: {0}")]
    RequestFailed(String),

    #[error("Provider request timed out")]
    Timeout,

    #[error("Invalid provider response: {0}")]
    InvalidResponse(String),

    #[error("Provider unavailable")]
    Unavailable,

    #[error("Token issuance failed: {0}")]
    Token(String),
}

impl ProviderError {
    /// Whether a retry of the same call could reasonably succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, ProviderError::Timeout | ProviderError::Unavailable)
    }
}

/// Result type alias for ProctorRoom operations
pub type Result<T> = std::result::Result<T, ProctorRoomError>;

/// Result type alias for provider operations
pub type ProviderResult<T> = std::result::Result<T, ProviderError>;

impl ProctorRoomError {
    /// Check if the error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            ProctorRoomError::Database(_) => false,
            ProctorRoomError::Migration(_) => false,
            ProctorRoomError::Provider(e) => e.is_transient(),
            ProctorRoomError::Config(_) => false,
            ProctorRoomError::RoomNotFound { .. } => false,
            ProctorRoomError::EnrollmentNotFound { .. } => false,
            ProctorRoomError::RequestNotFound { .. } => false,
            ProctorRoomError::AssignmentNotFound { .. } => false,
            ProctorRoomError::DuplicatePendingRequest { .. } => false,
            ProctorRoomError::AlreadyAllocated { .. } => false,
            // The request stays PENDING, so the approval can be retried
            // once a slot frees up.
            ProctorRoomError::RoomAtCapacity { .. } => true,
            ProctorRoomError::InvalidStateTransition { .. } => false,
            ProctorRoomError::NotRoomProctor { .. } => false,
            ProctorRoomError::PartialAllocation { .. } => false,
            ProctorRoomError::InvalidInput(_) => false,
            ProctorRoomError::Serialization(_) => false,
            ProctorRoomError::Io(_) => true,
            ProctorRoomError::UrlParse(_) => false,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            ProctorRoomError::Database(_) => ErrorSeverity::Critical,
            ProctorRoomError::Migration(_) => ErrorSeverity::Critical,
            ProctorRoomError::Config(_) => ErrorSeverity::Critical,
            ProctorRoomError::PartialAllocation { .. } => ErrorSeverity::Critical,
            ProctorRoomError::NotRoomProctor { .. } => ErrorSeverity::Warning,
            ProctorRoomError::RoomAtCapacity { .. } => ErrorSeverity::Warning,
            ProctorRoomError::DuplicatePendingRequest { .. } => ErrorSeverity::Warning,
            ProctorRoomError::InvalidInput(_) => ErrorSeverity::Info,
            _ => ErrorSeverity::Error,
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_error_is_recoverable() {
        let err = ProctorRoomError::RoomAtCapacity { room_id: Uuid::new_v4() };
        assert!(err.is_recoverable());
        assert_eq!(err.severity(), ErrorSeverity::Warning);
    }

    #[test]
    fn test_provider_error_transience() {
        assert!(ProviderError::Timeout.is_transient());
        assert!(ProviderError::Unavailable.is_transient());
        assert!(!ProviderError::RequestFailed("400".to_string()).is_transient());
        assert!(!ProviderError::InvalidResponse("bad json".to_string()).is_transient());
    }

    #[test]
    fn test_partial_allocation_message_counts_rooms() {
        let err = ProctorRoomError::PartialAllocation {
            exam_id: Uuid::new_v4(),
            created_rooms: vec![Uuid::new_v4(), Uuid::new_v4()],
            source: Box::new(ProctorRoomError::Provider(ProviderError::Timeout)),
        };
        assert!(err.to_string().contains("2 room(s)"));
    }
}
