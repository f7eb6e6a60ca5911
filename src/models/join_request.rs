//! Student join request model
//!
//! A join request is the admission ticket for a single attempt to enter a
//! room. It moves `PENDING -> APPROVED` or `PENDING -> REJECTED`; terminal
//! states never transition further and a fresh request is required for any
//! subsequent attempt.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JoinRequestStatus {
    Pending,
    Approved,
    Rejected,
}

impl JoinRequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JoinRequestStatus::Pending => "PENDING",
            JoinRequestStatus::Approved => "APPROVED",
            JoinRequestStatus::Rejected => "REJECTED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, JoinRequestStatus::Pending)
    }

    /// The only legal moves are out of `Pending`
    pub fn can_transition_to(&self, to: JoinRequestStatus) -> bool {
        matches!(
            (self, to),
            (JoinRequestStatus::Pending, JoinRequestStatus::Approved)
                | (JoinRequestStatus::Pending, JoinRequestStatus::Rejected)
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StudentJoinRequest {
    pub id: Uuid,
    pub exam_id: Uuid,
    pub student_id: Uuid,
    pub exam_room_id: Uuid,
    /// Reviewing proctor; absent for rooms of AUTO-mode exams
    pub faculty_id: Option<Uuid>,
    pub status: JoinRequestStatus,
    /// True when the student previously entered this exam's room and left
    pub is_rejoin: bool,
    pub approved_at: Option<DateTime<Utc>>,
    pub rejected_at: Option<DateTime<Utc>>,
    pub reviewed_by: Option<Uuid>,
    pub rejection_reason: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateJoinRequest {
    pub exam_id: Uuid,
    pub student_id: Uuid,
    pub exam_room_id: Uuid,
    pub faculty_id: Option<Uuid>,
    pub is_rejoin: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_can_resolve() {
        assert!(JoinRequestStatus::Pending.can_transition_to(JoinRequestStatus::Approved));
        assert!(JoinRequestStatus::Pending.can_transition_to(JoinRequestStatus::Rejected));
    }

    #[test]
    fn test_terminal_states_are_frozen() {
        for terminal in [JoinRequestStatus::Approved, JoinRequestStatus::Rejected] {
            assert!(terminal.is_terminal());
            for to in [
                JoinRequestStatus::Pending,
                JoinRequestStatus::Approved,
                JoinRequestStatus::Rejected,
            ] {
                assert!(!terminal.can_transition_to(to));
            }
        }
    }

    #[test]
    fn test_pending_is_not_terminal() {
        assert!(!JoinRequestStatus::Pending.is_terminal());
        assert!(!JoinRequestStatus::Pending.can_transition_to(JoinRequestStatus::Pending));
    }
}
