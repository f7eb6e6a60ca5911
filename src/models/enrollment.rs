//! Student enrollment model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EnrollmentStatus {
    Enrolled,
    Attending,
    Completed,
    Withdrawn,
}

impl EnrollmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnrollmentStatus::Enrolled => "ENROLLED",
            EnrollmentStatus::Attending => "ATTENDING",
            EnrollmentStatus::Completed => "COMPLETED",
            EnrollmentStatus::Withdrawn => "WITHDRAWN",
        }
    }

    /// Whether an enrollment in this status still holds (or may claim) a
    /// seat and can therefore be withdrawn.
    pub fn can_withdraw(&self) -> bool {
        matches!(self, EnrollmentStatus::Enrolled | EnrollmentStatus::Attending)
    }
}

/// Binds a student to an exam and to their allocated room.
///
/// Enrollments are created once by the allocator and never deleted; leaving
/// and rejoining are recorded on the same row for the audit trail.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StudentEnrollment {
    pub id: Uuid,
    pub exam_id: Uuid,
    pub student_id: Uuid,
    pub exam_room_id: Uuid,
    pub status: EnrollmentStatus,
    pub has_joined: bool,
    pub joined_at: Option<DateTime<Utc>>,
    pub left_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StudentEnrollment {
    /// A new join request by this student counts as a rejoin once they have
    /// entered the room before or left it.
    pub fn is_rejoin(&self) -> bool {
        self.has_joined || self.left_at.is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEnrollmentRequest {
    pub exam_id: Uuid,
    pub student_id: Uuid,
    pub exam_room_id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enrollment(status: EnrollmentStatus, has_joined: bool, left_at: Option<DateTime<Utc>>) -> StudentEnrollment {
        StudentEnrollment {
            id: Uuid::new_v4(),
            exam_id: Uuid::new_v4(),
            student_id: Uuid::new_v4(),
            exam_room_id: Uuid::new_v4(),
            status,
            has_joined,
            joined_at: None,
            left_at,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_first_request_is_not_rejoin() {
        let e = enrollment(EnrollmentStatus::Enrolled, false, None);
        assert!(!e.is_rejoin());
    }

    #[test]
    fn test_joined_or_left_counts_as_rejoin() {
        let e = enrollment(EnrollmentStatus::Attending, true, None);
        assert!(e.is_rejoin());
        let e = enrollment(EnrollmentStatus::Withdrawn, false, Some(Utc::now()));
        assert!(e.is_rejoin());
    }

    #[test]
    fn test_withdrawal_preconditions() {
        assert!(EnrollmentStatus::Enrolled.can_withdraw());
        assert!(EnrollmentStatus::Attending.can_withdraw());
        assert!(!EnrollmentStatus::Completed.can_withdraw());
        assert!(!EnrollmentStatus::Withdrawn.can_withdraw());
    }
}
