//! In-process store implementations
//!
//! Backed by `tokio::sync::Mutex`-guarded maps. Every occupancy mutation
//! runs under the store lock, which gives the same linearizable
//! increment/decrement semantics as the guarded SQL updates of the Postgres
//! repositories. Used by the integration suites and by embedded deployments
//! that do not need durable storage.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::database::store::{AssignmentStore, EnrollmentStore, JoinRequestStore, RoomStore};
use crate::models::{
    CreateAssignmentRequest, CreateEnrollmentRequest, CreateExamRoomRequest, CreateJoinRequest,
    EnrollmentStatus, ExamRoom, FacultyAssignment, JoinRequestStatus, RoomStatus,
    StudentEnrollment, StudentJoinRequest, DEFAULT_PROCTOR_ROLE,
};
use crate::utils::errors::{ProctorRoomError, Result};

/// In-memory [`RoomStore`]
#[derive(Debug, Default)]
pub struct InMemoryRoomStore {
    rooms: Mutex<HashMap<Uuid, ExamRoom>>,
}

impl InMemoryRoomStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RoomStore for InMemoryRoomStore {
    async fn create(&self, request: CreateExamRoomRequest) -> Result<ExamRoom> {
        let now = Utc::now();
        let room = ExamRoom {
            id: Uuid::new_v4(),
            exam_id: request.exam_id,
            provider_room_id: request.provider_room_id,
            room_name: request.room_name,
            max_students: request.max_students,
            current_students: request.current_students,
            status: RoomStatus::Created,
            faculty_joined_at: None,
            room_ended_at: None,
            created_at: now,
            updated_at: now,
        };
        self.rooms.lock().await.insert(room.id, room.clone());
        Ok(room)
    }

    async fn find_by_id(&self, room_id: Uuid) -> Result<Option<ExamRoom>> {
        Ok(self.rooms.lock().await.get(&room_id).cloned())
    }

    async fn find_by_exam(&self, exam_id: Uuid) -> Result<Vec<ExamRoom>> {
        let rooms = self.rooms.lock().await;
        let mut found: Vec<ExamRoom> =
            rooms.values().filter(|r| r.exam_id == exam_id).cloned().collect();
        found.sort_by_key(|r| r.created_at);
        Ok(found)
    }

    async fn try_increment(&self, room_id: Uuid) -> Result<bool> {
        let mut rooms = self.rooms.lock().await;
        let room = rooms
            .get_mut(&room_id)
            .ok_or(ProctorRoomError::RoomNotFound { room_id })?;
        if room.current_students >= room.max_students {
            return Ok(false);
        }
        room.current_students += 1;
        room.updated_at = Utc::now();
        Ok(true)
    }

    async fn decrement(&self, room_id: Uuid) -> Result<()> {
        let mut rooms = self.rooms.lock().await;
        let room = rooms
            .get_mut(&room_id)
            .ok_or(ProctorRoomError::RoomNotFound { room_id })?;
        room.current_students = (room.current_students - 1).max(0);
        room.updated_at = Utc::now();
        Ok(())
    }

    async fn set_status(&self, room_id: Uuid, status: RoomStatus) -> Result<()> {
        let mut rooms = self.rooms.lock().await;
        let room = rooms
            .get_mut(&room_id)
            .ok_or(ProctorRoomError::RoomNotFound { room_id })?;
        room.status = status;
        room.updated_at = Utc::now();
        Ok(())
    }

    async fn mark_faculty_joined(&self, room_id: Uuid, at: DateTime<Utc>) -> Result<()> {
        let mut rooms = self.rooms.lock().await;
        let room = rooms
            .get_mut(&room_id)
            .ok_or(ProctorRoomError::RoomNotFound { room_id })?;
        room.status = RoomStatus::Active;
        room.faculty_joined_at = Some(at);
        room.updated_at = Utc::now();
        Ok(())
    }

    async fn mark_ended(&self, room_id: Uuid, at: DateTime<Utc>) -> Result<()> {
        let mut rooms = self.rooms.lock().await;
        let room = rooms
            .get_mut(&room_id)
            .ok_or(ProctorRoomError::RoomNotFound { room_id })?;
        room.status = RoomStatus::Ended;
        room.room_ended_at = Some(at);
        room.updated_at = Utc::now();
        Ok(())
    }
}

/// In-memory [`EnrollmentStore`]
#[derive(Debug, Default)]
pub struct InMemoryEnrollmentStore {
    enrollments: Mutex<HashMap<Uuid, StudentEnrollment>>,
}

impl InMemoryEnrollmentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EnrollmentStore for InMemoryEnrollmentStore {
    async fn create(&self, request: CreateEnrollmentRequest) -> Result<StudentEnrollment> {
        let now = Utc::now();
        let enrollment = StudentEnrollment {
            id: Uuid::new_v4(),
            exam_id: request.exam_id,
            student_id: request.student_id,
            exam_room_id: request.exam_room_id,
            status: EnrollmentStatus::Enrolled,
            has_joined: false,
            joined_at: None,
            left_at: None,
            created_at: now,
            updated_at: now,
        };
        self.enrollments.lock().await.insert(enrollment.id, enrollment.clone());
        Ok(enrollment)
    }

    async fn find_by_exam_and_student(
        &self,
        exam_id: Uuid,
        student_id: Uuid,
    ) -> Result<Option<StudentEnrollment>> {
        let enrollments = self.enrollments.lock().await;
        Ok(enrollments
            .values()
            .find(|e| e.exam_id == exam_id && e.student_id == student_id)
            .cloned())
    }

    async fn find_by_room(&self, room_id: Uuid) -> Result<Vec<StudentEnrollment>> {
        let enrollments = self.enrollments.lock().await;
        let mut found: Vec<StudentEnrollment> = enrollments
            .values()
            .filter(|e| e.exam_room_id == room_id)
            .cloned()
            .collect();
        found.sort_by_key(|e| e.created_at);
        Ok(found)
    }

    async fn count_by_exam(&self, exam_id: Uuid) -> Result<i64> {
        let enrollments = self.enrollments.lock().await;
        Ok(enrollments.values().filter(|e| e.exam_id == exam_id).count() as i64)
    }

    async fn mark_joined(
        &self,
        exam_id: Uuid,
        student_id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<StudentEnrollment> {
        let mut enrollments = self.enrollments.lock().await;
        let enrollment = enrollments
            .values_mut()
            .find(|e| e.exam_id == exam_id && e.student_id == student_id)
            .ok_or(ProctorRoomError::EnrollmentNotFound { exam_id, student_id })?;
        enrollment.status = EnrollmentStatus::Attending;
        enrollment.has_joined = true;
        enrollment.joined_at = Some(at);
        enrollment.left_at = None;
        enrollment.updated_at = Utc::now();
        Ok(enrollment.clone())
    }

    async fn mark_left(
        &self,
        exam_id: Uuid,
        student_id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<StudentEnrollment> {
        let mut enrollments = self.enrollments.lock().await;
        let enrollment = enrollments
            .values_mut()
            .find(|e| e.exam_id == exam_id && e.student_id == student_id)
            .ok_or(ProctorRoomError::EnrollmentNotFound { exam_id, student_id })?;
        enrollment.status = EnrollmentStatus::Withdrawn;
        enrollment.left_at = Some(at);
        enrollment.updated_at = Utc::now();
        Ok(enrollment.clone())
    }
}

/// In-memory [`AssignmentStore`]
#[derive(Debug, Default)]
pub struct InMemoryAssignmentStore {
    assignments: Mutex<HashMap<Uuid, FacultyAssignment>>,
}

impl InMemoryAssignmentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AssignmentStore for InMemoryAssignmentStore {
    async fn create(&self, request: CreateAssignmentRequest) -> Result<FacultyAssignment> {
        let assignment = FacultyAssignment {
            id: Uuid::new_v4(),
            exam_id: request.exam_id,
            faculty_id: request.faculty_id,
            exam_room_id: request.exam_room_id,
            role: request.role.unwrap_or_else(|| DEFAULT_PROCTOR_ROLE.to_string()),
            has_joined: false,
            joined_at: None,
            created_at: Utc::now(),
        };
        self.assignments.lock().await.insert(assignment.id, assignment.clone());
        Ok(assignment)
    }

    async fn find_by_exam_and_faculty(
        &self,
        exam_id: Uuid,
        faculty_id: Uuid,
    ) -> Result<Vec<FacultyAssignment>> {
        let assignments = self.assignments.lock().await;
        let mut found: Vec<FacultyAssignment> = assignments
            .values()
            .filter(|a| a.exam_id == exam_id && a.faculty_id == faculty_id)
            .cloned()
            .collect();
        found.sort_by_key(|a| a.created_at);
        Ok(found)
    }

    async fn find_by_room(&self, room_id: Uuid) -> Result<Option<FacultyAssignment>> {
        let assignments = self.assignments.lock().await;
        Ok(assignments.values().find(|a| a.exam_room_id == room_id).cloned())
    }

    async fn find_by_exam(&self, exam_id: Uuid) -> Result<Vec<FacultyAssignment>> {
        let assignments = self.assignments.lock().await;
        let mut found: Vec<FacultyAssignment> = assignments
            .values()
            .filter(|a| a.exam_id == exam_id)
            .cloned()
            .collect();
        found.sort_by_key(|a| a.created_at);
        Ok(found)
    }

    async fn mark_joined(
        &self,
        exam_id: Uuid,
        faculty_id: Uuid,
        room_id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<FacultyAssignment> {
        let mut assignments = self.assignments.lock().await;
        let assignment = assignments
            .values_mut()
            .find(|a| {
                a.exam_id == exam_id && a.faculty_id == faculty_id && a.exam_room_id == room_id
            })
            .ok_or(ProctorRoomError::AssignmentNotFound { exam_id, faculty_id })?;
        assignment.has_joined = true;
        assignment.joined_at = Some(at);
        Ok(assignment.clone())
    }
}

/// In-memory [`JoinRequestStore`]
#[derive(Debug, Default)]
pub struct InMemoryJoinRequestStore {
    requests: Mutex<HashMap<Uuid, StudentJoinRequest>>,
}

impl InMemoryJoinRequestStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl JoinRequestStore for InMemoryJoinRequestStore {
    async fn create(&self, request: CreateJoinRequest) -> Result<StudentJoinRequest> {
        let mut requests = self.requests.lock().await;
        // Mirrors the partial unique index of the Postgres schema
        if requests.values().any(|r| {
            r.exam_id == request.exam_id
                && r.student_id == request.student_id
                && r.status == JoinRequestStatus::Pending
        }) {
            return Err(ProctorRoomError::DuplicatePendingRequest {
                exam_id: request.exam_id,
                student_id: request.student_id,
            });
        }
        let row = StudentJoinRequest {
            id: Uuid::new_v4(),
            exam_id: request.exam_id,
            student_id: request.student_id,
            exam_room_id: request.exam_room_id,
            faculty_id: request.faculty_id,
            status: JoinRequestStatus::Pending,
            is_rejoin: request.is_rejoin,
            approved_at: None,
            rejected_at: None,
            reviewed_by: None,
            rejection_reason: None,
            is_active: true,
            created_at: Utc::now(),
        };
        requests.insert(row.id, row.clone());
        Ok(row)
    }

    async fn find_by_id(&self, request_id: Uuid) -> Result<Option<StudentJoinRequest>> {
        Ok(self.requests.lock().await.get(&request_id).cloned())
    }

    async fn find_pending_by_exam_and_student(
        &self,
        exam_id: Uuid,
        student_id: Uuid,
    ) -> Result<Option<StudentJoinRequest>> {
        let requests = self.requests.lock().await;
        Ok(requests
            .values()
            .find(|r| {
                r.exam_id == exam_id
                    && r.student_id == student_id
                    && r.status == JoinRequestStatus::Pending
            })
            .cloned())
    }

    async fn find_pending_by_rooms(&self, room_ids: &[Uuid]) -> Result<Vec<StudentJoinRequest>> {
        let requests = self.requests.lock().await;
        let mut found: Vec<StudentJoinRequest> = requests
            .values()
            .filter(|r| {
                r.status == JoinRequestStatus::Pending && room_ids.contains(&r.exam_room_id)
            })
            .cloned()
            .collect();
        found.sort_by_key(|r| r.created_at);
        Ok(found)
    }

    async fn approve(
        &self,
        request_id: Uuid,
        reviewed_by: Uuid,
        at: DateTime<Utc>,
    ) -> Result<bool> {
        let mut requests = self.requests.lock().await;
        let Some(row) = requests.get_mut(&request_id) else {
            return Ok(false);
        };
        if row.status != JoinRequestStatus::Pending {
            return Ok(false);
        }
        row.status = JoinRequestStatus::Approved;
        row.approved_at = Some(at);
        row.reviewed_by = Some(reviewed_by);
        Ok(true)
    }

    async fn reject(
        &self,
        request_id: Uuid,
        reviewed_by: Uuid,
        reason: Option<String>,
        at: DateTime<Utc>,
    ) -> Result<bool> {
        let mut requests = self.requests.lock().await;
        let Some(row) = requests.get_mut(&request_id) else {
            return Ok(false);
        };
        if row.status != JoinRequestStatus::Pending {
            return Ok(false);
        }
        row.status = JoinRequestStatus::Rejected;
        row.rejected_at = Some(at);
        row.reviewed_by = Some(reviewed_by);
        row.rejection_reason = reason;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_try_increment_respects_capacity() {
        let store = InMemoryRoomStore::new();
        let room = store
            .create(CreateExamRoomRequest {
                exam_id: Uuid::new_v4(),
                provider_room_id: "prov-1".to_string(),
                room_name: "room-1".to_string(),
                max_students: 2,
                current_students: 0,
            })
            .await
            .unwrap();

        assert!(store.try_increment(room.id).await.unwrap());
        assert!(store.try_increment(room.id).await.unwrap());
        assert!(!store.try_increment(room.id).await.unwrap());

        let room = store.find_by_id(room.id).await.unwrap().unwrap();
        assert_eq!(room.current_students, 2);
    }

    #[tokio::test]
    async fn test_decrement_floors_at_zero() {
        let store = InMemoryRoomStore::new();
        let room = store
            .create(CreateExamRoomRequest {
                exam_id: Uuid::new_v4(),
                provider_room_id: "prov-1".to_string(),
                room_name: "room-1".to_string(),
                max_students: 2,
                current_students: 0,
            })
            .await
            .unwrap();

        store.decrement(room.id).await.unwrap();
        let room = store.find_by_id(room.id).await.unwrap().unwrap();
        assert_eq!(room.current_students, 0);
    }

    #[tokio::test]
    async fn test_terminal_request_is_not_rewritten() {
        let store = InMemoryJoinRequestStore::new();
        let row = store
            .create(CreateJoinRequest {
                exam_id: Uuid::new_v4(),
                student_id: Uuid::new_v4(),
                exam_room_id: Uuid::new_v4(),
                faculty_id: None,
                is_rejoin: false,
            })
            .await
            .unwrap();

        let reviewer = Uuid::new_v4();
        assert!(store.approve(row.id, reviewer, Utc::now()).await.unwrap());
        assert!(!store.approve(row.id, reviewer, Utc::now()).await.unwrap());
        assert!(!store.reject(row.id, reviewer, None, Utc::now()).await.unwrap());

        let row = store.find_by_id(row.id).await.unwrap().unwrap();
        assert_eq!(row.status, JoinRequestStatus::Approved);
        assert!(row.rejected_at.is_none());
    }
}
