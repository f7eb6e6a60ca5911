//! Room allocation service
//!
//! Partitions an exam's roster into capacity-bounded rooms, creates the
//! backing provider rooms, seeds enrollments and assigns proctors. Runs
//! once per exam.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::database::store::{AssignmentStore, EnrollmentStore, RoomStore};
use crate::models::{
    CreateAssignmentRequest, CreateEnrollmentRequest, CreateExamRoomRequest, ExamMode,
};
use crate::services::video::VideoRoomProvider;
use crate::utils::errors::{ProctorRoomError, Result};
use crate::utils::helpers::round_robin;
use crate::utils::logging::log_allocation;

/// Room allocation engine
#[derive(Clone)]
pub struct RoomAllocator {
    rooms: Arc<dyn RoomStore>,
    enrollments: Arc<dyn EnrollmentStore>,
    assignments: Arc<dyn AssignmentStore>,
    provider: Arc<dyn VideoRoomProvider>,
}

impl RoomAllocator {
    /// Create a new RoomAllocator instance
    pub fn new(
        rooms: Arc<dyn RoomStore>,
        enrollments: Arc<dyn EnrollmentStore>,
        assignments: Arc<dyn AssignmentStore>,
        provider: Arc<dyn VideoRoomProvider>,
    ) -> Self {
        Self { rooms, enrollments, assignments, provider }
    }

    /// Partition `student_ids` into consecutive chunks of `max_per_room`,
    /// creating one room per chunk and, in `Proctoring` mode, one proctor
    /// assignment per room via round robin over `faculty_ids`.
    ///
    /// Returns the created room ids in roster order. On a mid-allocation
    /// failure the whole run aborts fail-fast and the error enumerates the
    /// rooms already committed so the caller can compensate with
    /// [`deallocate`](Self::deallocate).
    pub async fn allocate(
        &self,
        exam_id: Uuid,
        student_ids: &[Uuid],
        max_per_room: i32,
        mode: ExamMode,
        faculty_ids: &[Uuid],
    ) -> Result<Vec<Uuid>> {
        debug!(
            exam_id = %exam_id,
            students = student_ids.len(),
            max_per_room = max_per_room,
            mode = ?mode,
            "Allocating exam rooms"
        );

        if student_ids.is_empty() {
            return Err(ProctorRoomError::InvalidInput(
                "Student roster must not be empty".to_string(),
            ));
        }

        let unique: HashSet<&Uuid> = student_ids.iter().collect();
        if unique.len() != student_ids.len() {
            return Err(ProctorRoomError::InvalidInput(
                "Student roster contains duplicates".to_string(),
            ));
        }

        if max_per_room < 1 {
            return Err(ProctorRoomError::InvalidInput(
                "Room capacity must be at least 1".to_string(),
            ));
        }

        if mode == ExamMode::Proctoring && faculty_ids.is_empty() {
            return Err(ProctorRoomError::InvalidInput(
                "Proctored exams require a non-empty faculty pool".to_string(),
            ));
        }

        // Re-running allocation would double-count the seeded occupancy
        if !self.rooms.find_by_exam(exam_id).await?.is_empty() {
            return Err(ProctorRoomError::AlreadyAllocated { exam_id });
        }

        let mut created_rooms = Vec::new();
        for (index, chunk) in student_ids.chunks(max_per_room as usize).enumerate() {
            match self
                .allocate_chunk(exam_id, index, chunk, max_per_room, mode, faculty_ids)
                .await
            {
                Ok(room_id) => created_rooms.push(room_id),
                Err(e) => {
                    warn!(
                        exam_id = %exam_id,
                        chunk = index,
                        committed = created_rooms.len(),
                        error = %e,
                        "Allocation aborted"
                    );
                    return Err(ProctorRoomError::PartialAllocation {
                        exam_id,
                        created_rooms,
                        source: Box::new(e),
                    });
                }
            }
        }

        log_allocation(
            exam_id,
            created_rooms.len(),
            student_ids.len(),
            mode == ExamMode::Proctoring,
        );

        Ok(created_rooms)
    }

    /// Materialize one roster chunk: provider room, exam room row, seeded
    /// enrollments and (for proctored exams) the round-robin assignment.
    async fn allocate_chunk(
        &self,
        exam_id: Uuid,
        index: usize,
        chunk: &[Uuid],
        max_per_room: i32,
        mode: ExamMode,
        faculty_ids: &[Uuid],
    ) -> Result<Uuid> {
        let room_name = format!("{}-room-{}", exam_id, index + 1);
        let provider_room = self.provider.create_room(&room_name).await?;

        let room = self
            .rooms
            .create(CreateExamRoomRequest {
                exam_id,
                provider_room_id: provider_room.room_id,
                room_name: provider_room.room_name,
                max_students: max_per_room,
                current_students: chunk.len() as i32,
            })
            .await?;

        for student_id in chunk {
            self.enrollments
                .create(CreateEnrollmentRequest {
                    exam_id,
                    student_id: *student_id,
                    exam_room_id: room.id,
                })
                .await?;
        }

        if mode == ExamMode::Proctoring {
            // Validated non-empty above, so the index always resolves
            if let Some(faculty_id) = round_robin(faculty_ids, index) {
                self.assignments
                    .create(CreateAssignmentRequest {
                        exam_id,
                        faculty_id: *faculty_id,
                        exam_room_id: room.id,
                        role: None,
                    })
                    .await?;
            }
        }

        debug!(exam_id = %exam_id, room_id = %room.id, students = chunk.len(), "Room allocated");
        Ok(room.id)
    }

    /// Compensation path: end every room of the exam and tear down the
    /// backing provider rooms. Provider teardown failures are logged and
    /// skipped so the local state always ends up consistent.
    pub async fn deallocate(&self, exam_id: Uuid) -> Result<Vec<Uuid>> {
        let rooms = self.rooms.find_by_exam(exam_id).await?;
        let now = chrono::Utc::now();

        let mut ended = Vec::new();
        for room in rooms {
            if let Err(e) = self.provider.delete_room(&room.provider_room_id).await {
                warn!(
                    exam_id = %exam_id,
                    room_id = %room.id,
                    error = %e,
                    "Provider room teardown failed, ending room locally"
                );
            }
            self.rooms.mark_ended(room.id, now).await?;
            ended.push(room.id);
        }

        info!(exam_id = %exam_id, rooms = ended.len(), "Exam rooms deallocated");
        Ok(ended)
    }
}
