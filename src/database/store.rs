//! Store contracts for the allocation and admission engines
//!
//! The services only ever see these traits; Postgres repositories implement
//! them for production and the in-memory stores implement them for embedded
//! use and tests.
//!
//! `RoomStore::try_increment` and `RoomStore::decrement` are the atomic
//! occupancy primitives: `current_students` must never be read, checked and
//! written back through separate calls, since concurrent approvals on the
//! same room would then both observe the free slot.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{
    CreateAssignmentRequest, CreateEnrollmentRequest, CreateExamRoomRequest, CreateJoinRequest,
    ExamRoom, FacultyAssignment, RoomStatus, StudentEnrollment, StudentJoinRequest,
};
use crate::utils::errors::Result;

/// Persistence of exam rooms and their occupancy counters
#[async_trait]
pub trait RoomStore: Send + Sync {
    async fn create(&self, request: CreateExamRoomRequest) -> Result<ExamRoom>;

    async fn find_by_id(&self, room_id: Uuid) -> Result<Option<ExamRoom>>;

    async fn find_by_exam(&self, exam_id: Uuid) -> Result<Vec<ExamRoom>>;

    /// Claim one seat. Returns `false` without changing anything when the
    /// room is already at `max_students`.
    async fn try_increment(&self, room_id: Uuid) -> Result<bool>;

    /// Release one seat, flooring the counter at zero.
    async fn decrement(&self, room_id: Uuid) -> Result<()>;

    async fn set_status(&self, room_id: Uuid, status: RoomStatus) -> Result<()>;

    async fn mark_faculty_joined(&self, room_id: Uuid, at: DateTime<Utc>) -> Result<()>;

    /// End the room: status `ENDED` plus `room_ended_at`.
    async fn mark_ended(&self, room_id: Uuid, at: DateTime<Utc>) -> Result<()>;
}

/// Persistence of per-student exam membership
#[async_trait]
pub trait EnrollmentStore: Send + Sync {
    async fn create(&self, request: CreateEnrollmentRequest) -> Result<StudentEnrollment>;

    async fn find_by_exam_and_student(
        &self,
        exam_id: Uuid,
        student_id: Uuid,
    ) -> Result<Option<StudentEnrollment>>;

    async fn find_by_room(&self, room_id: Uuid) -> Result<Vec<StudentEnrollment>>;

    async fn count_by_exam(&self, exam_id: Uuid) -> Result<i64>;

    /// Record room entry: status `ATTENDING`, `has_joined`, `joined_at`;
    /// clears `left_at` on a rejoin.
    async fn mark_joined(
        &self,
        exam_id: Uuid,
        student_id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<StudentEnrollment>;

    /// Record departure: status `WITHDRAWN` plus `left_at`.
    async fn mark_left(
        &self,
        exam_id: Uuid,
        student_id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<StudentEnrollment>;
}

/// Persistence of faculty-to-room proctoring assignments
#[async_trait]
pub trait AssignmentStore: Send + Sync {
    async fn create(&self, request: CreateAssignmentRequest) -> Result<FacultyAssignment>;

    /// All rooms a faculty proctors within one exam (round robin may give
    /// them several)
    async fn find_by_exam_and_faculty(
        &self,
        exam_id: Uuid,
        faculty_id: Uuid,
    ) -> Result<Vec<FacultyAssignment>>;

    async fn find_by_room(&self, room_id: Uuid) -> Result<Option<FacultyAssignment>>;

    async fn find_by_exam(&self, exam_id: Uuid) -> Result<Vec<FacultyAssignment>>;

    async fn mark_joined(
        &self,
        exam_id: Uuid,
        faculty_id: Uuid,
        room_id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<FacultyAssignment>;
}

/// Persistence of student join requests
#[async_trait]
pub trait JoinRequestStore: Send + Sync {
    async fn create(&self, request: CreateJoinRequest) -> Result<StudentJoinRequest>;

    async fn find_by_id(&self, request_id: Uuid) -> Result<Option<StudentJoinRequest>>;

    async fn find_pending_by_exam_and_student(
        &self,
        exam_id: Uuid,
        student_id: Uuid,
    ) -> Result<Option<StudentJoinRequest>>;

    async fn find_pending_by_rooms(&self, room_ids: &[Uuid]) -> Result<Vec<StudentJoinRequest>>;

    /// Move a request `PENDING -> APPROVED`. The write is guarded on the
    /// current status; returns `false` when the request was no longer
    /// pending, leaving the terminal row untouched.
    async fn approve(
        &self,
        request_id: Uuid,
        reviewed_by: Uuid,
        at: DateTime<Utc>,
    ) -> Result<bool>;

    /// Move a request `PENDING -> REJECTED` under the same guard.
    async fn reject(
        &self,
        request_id: Uuid,
        reviewed_by: Uuid,
        reason: Option<String>,
        at: DateTime<Utc>,
    ) -> Result<bool>;
}
