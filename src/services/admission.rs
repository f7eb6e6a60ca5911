//! Admission control service
//!
//! Runs the join-request state machine: students request entry to their
//! allocated room, proctors approve or reject, and approved students receive
//! a provider join token. Room occupancy is only ever touched through the
//! store's atomic increment/decrement primitives, so concurrent approvals
//! against the last free seat resolve to exactly one success.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::AdmissionConfig;
use crate::database::store::{AssignmentStore, EnrollmentStore, JoinRequestStore, RoomStore};
use crate::models::{CreateJoinRequest, ExamRoom, JoinRequestStatus, StudentJoinRequest};
use crate::services::video::{ParticipantRole, VideoRoomProvider};
use crate::utils::errors::{ProctorRoomError, ProviderError, Result};
use crate::utils::logging::log_admission;

/// Outcome of a student's join request submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinRequestTicket {
    pub request_id: Uuid,
    pub status: JoinRequestStatus,
    pub is_rejoin: bool,
}

/// Everything a participant needs to enter their room
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdmissionGrant {
    pub room_id: Uuid,
    pub room_name: String,
    pub auth_token: String,
    pub total_students: i32,
}

/// Admission control engine
#[derive(Clone)]
pub struct AdmissionController {
    rooms: Arc<dyn RoomStore>,
    enrollments: Arc<dyn EnrollmentStore>,
    assignments: Arc<dyn AssignmentStore>,
    requests: Arc<dyn JoinRequestStore>,
    provider: Arc<dyn VideoRoomProvider>,
    config: AdmissionConfig,
}

impl AdmissionController {
    /// Create a new AdmissionController instance
    pub fn new(
        rooms: Arc<dyn RoomStore>,
        enrollments: Arc<dyn EnrollmentStore>,
        assignments: Arc<dyn AssignmentStore>,
        requests: Arc<dyn JoinRequestStore>,
        provider: Arc<dyn VideoRoomProvider>,
        config: AdmissionConfig,
    ) -> Self {
        Self { rooms, enrollments, assignments, requests, provider, config }
    }

    /// Student action: request entry into the allocated room.
    ///
    /// At most one pending request may exist per student per exam; the
    /// rejoin flag is derived from whether the student entered and left
    /// before.
    pub async fn request_join(&self, exam_id: Uuid, student_id: Uuid) -> Result<JoinRequestTicket> {
        debug!(exam_id = %exam_id, student_id = %student_id, "Join requested");

        let enrollment = self
            .enrollments
            .find_by_exam_and_student(exam_id, student_id)
            .await?
            .ok_or(ProctorRoomError::EnrollmentNotFound { exam_id, student_id })?;

        if let Some(pending) = self
            .requests
            .find_pending_by_exam_and_student(exam_id, student_id)
            .await?
        {
            warn!(
                exam_id = %exam_id,
                student_id = %student_id,
                request_id = %pending.id,
                "Duplicate join request while one is pending"
            );
            return Err(ProctorRoomError::DuplicatePendingRequest { exam_id, student_id });
        }

        let is_rejoin = enrollment.is_rejoin();
        let proctor = self.assignments.find_by_room(enrollment.exam_room_id).await?;

        let request = self
            .requests
            .create(CreateJoinRequest {
                exam_id,
                student_id,
                exam_room_id: enrollment.exam_room_id,
                faculty_id: proctor.map(|a| a.faculty_id),
                is_rejoin,
            })
            .await?;

        info!(
            exam_id = %exam_id,
            student_id = %student_id,
            request_id = %request.id,
            is_rejoin = is_rejoin,
            "Join request created"
        );

        Ok(JoinRequestTicket {
            request_id: request.id,
            status: request.status,
            is_rejoin: request.is_rejoin,
        })
    }

    /// Faculty action: list the pending requests of all rooms assigned to
    /// this faculty within the exam. Read-only.
    pub async fn list_pending_requests(
        &self,
        exam_id: Uuid,
        faculty_id: Uuid,
    ) -> Result<Vec<StudentJoinRequest>> {
        let assignments = self
            .assignments
            .find_by_exam_and_faculty(exam_id, faculty_id)
            .await?;

        let room_ids: Vec<Uuid> = assignments.iter().map(|a| a.exam_room_id).collect();
        if room_ids.is_empty() {
            return Ok(Vec::new());
        }

        self.requests.find_pending_by_rooms(&room_ids).await
    }

    /// Faculty action: approve a pending request.
    ///
    /// The seat is claimed with the store's conditional increment before the
    /// join token is minted; a provider failure or timeout after the claim
    /// releases the seat again and leaves the request pending. A full room
    /// also leaves the request pending for manual resolution.
    pub async fn approve(&self, request_id: Uuid, faculty_id: Uuid) -> Result<AdmissionGrant> {
        let request = self
            .requests
            .find_by_id(request_id)
            .await?
            .ok_or(ProctorRoomError::RequestNotFound { request_id })?;

        if request.status != JoinRequestStatus::Pending {
            return Err(ProctorRoomError::InvalidStateTransition {
                from: request.status.as_str().to_string(),
                to: JoinRequestStatus::Approved.as_str().to_string(),
            });
        }

        let room = self.room(request.exam_room_id).await?;
        self.ensure_proctor(&room, faculty_id).await?;

        if !self.rooms.try_increment(room.id).await? {
            warn!(
                request_id = %request_id,
                room_id = %room.id,
                max_students = room.max_students,
                "Approval denied, room at capacity"
            );
            return Err(ProctorRoomError::RoomAtCapacity { room_id: room.id });
        }

        // Seat is held from here on; every failure path below must give it
        // back before surfacing the error.
        let token = match self
            .issue_token_bounded(&room, request.student_id, ParticipantRole::Student)
            .await
        {
            Ok(token) => token,
            Err(e) => {
                self.rooms.decrement(room.id).await?;
                return Err(e);
            }
        };

        let now = Utc::now();
        if !self.requests.approve(request_id, faculty_id, now).await? {
            // Resolved concurrently by another reviewer
            self.rooms.decrement(room.id).await?;
            return Err(ProctorRoomError::InvalidStateTransition {
                from: JoinRequestStatus::Pending.as_str().to_string(),
                to: JoinRequestStatus::Approved.as_str().to_string(),
            });
        }

        self.enrollments
            .mark_joined(request.exam_id, request.student_id, now)
            .await?;

        log_admission(request_id, room.id, faculty_id, true);

        let occupancy = self
            .rooms
            .find_by_id(room.id)
            .await?
            .map(|r| r.current_students)
            .unwrap_or(room.current_students + 1);

        Ok(AdmissionGrant {
            room_id: room.id,
            room_name: room.room_name,
            auth_token: token,
            total_students: occupancy,
        })
    }

    /// Faculty action: reject a pending request. No occupancy change; the
    /// student may submit a fresh request afterwards.
    pub async fn reject(
        &self,
        request_id: Uuid,
        faculty_id: Uuid,
        reason: Option<String>,
    ) -> Result<()> {
        let request = self
            .requests
            .find_by_id(request_id)
            .await?
            .ok_or(ProctorRoomError::RequestNotFound { request_id })?;

        if request.status != JoinRequestStatus::Pending {
            return Err(ProctorRoomError::InvalidStateTransition {
                from: request.status.as_str().to_string(),
                to: JoinRequestStatus::Rejected.as_str().to_string(),
            });
        }

        let room = self.room(request.exam_room_id).await?;
        self.ensure_proctor(&room, faculty_id).await?;

        if !self.requests.reject(request_id, faculty_id, reason, Utc::now()).await? {
            return Err(ProctorRoomError::InvalidStateTransition {
                from: JoinRequestStatus::Pending.as_str().to_string(),
                to: JoinRequestStatus::Rejected.as_str().to_string(),
            });
        }

        log_admission(request_id, room.id, faculty_id, false);
        Ok(())
    }

    /// Faculty action: forcibly end a student's attendance, freeing their
    /// seat.
    pub async fn remove_student(
        &self,
        exam_id: Uuid,
        student_id: Uuid,
        faculty_id: Uuid,
        reason: &str,
    ) -> Result<()> {
        let enrollment = self
            .enrollments
            .find_by_exam_and_student(exam_id, student_id)
            .await?
            .ok_or(ProctorRoomError::EnrollmentNotFound { exam_id, student_id })?;

        let room = self.room(enrollment.exam_room_id).await?;
        self.ensure_proctor(&room, faculty_id).await?;

        self.withdraw(exam_id, student_id, enrollment.status, room.id).await?;

        info!(
            exam_id = %exam_id,
            student_id = %student_id,
            faculty_id = %faculty_id,
            reason = reason,
            "Student removed from room"
        );
        Ok(())
    }

    /// Student action: leave the room voluntarily. Same capacity effect as
    /// a removal, without a reviewer.
    pub async fn update_left_status(&self, exam_id: Uuid, student_id: Uuid) -> Result<()> {
        let enrollment = self
            .enrollments
            .find_by_exam_and_student(exam_id, student_id)
            .await?
            .ok_or(ProctorRoomError::EnrollmentNotFound { exam_id, student_id })?;

        self.withdraw(exam_id, student_id, enrollment.status, enrollment.exam_room_id)
            .await?;

        info!(exam_id = %exam_id, student_id = %student_id, "Student left room");
        Ok(())
    }

    /// Faculty action: enter the assigned room as its proctor. Marks the
    /// assignment and room joined and mints a proctor-scoped token; does not
    /// touch the student occupancy counter.
    pub async fn faculty_join(
        &self,
        exam_id: Uuid,
        faculty_id: Uuid,
        room_id: Uuid,
    ) -> Result<AdmissionGrant> {
        let room = self.room(room_id).await?;
        self.ensure_proctor(&room, faculty_id).await?;

        let token = self
            .issue_token_bounded(&room, faculty_id, ParticipantRole::Proctor)
            .await?;

        let now = Utc::now();
        self.assignments.mark_joined(exam_id, faculty_id, room_id, now).await?;
        self.rooms.mark_faculty_joined(room_id, now).await?;

        info!(exam_id = %exam_id, faculty_id = %faculty_id, room_id = %room_id, "Proctor joined room");

        Ok(AdmissionGrant {
            room_id: room.id,
            room_name: room.room_name,
            auth_token: token,
            total_students: room.current_students,
        })
    }

    async fn room(&self, room_id: Uuid) -> Result<ExamRoom> {
        self.rooms
            .find_by_id(room_id)
            .await?
            .ok_or(ProctorRoomError::RoomNotFound { room_id })
    }

    /// Ownership check: the acting faculty must be the room's assigned
    /// proctor.
    async fn ensure_proctor(&self, room: &ExamRoom, faculty_id: Uuid) -> Result<()> {
        let assignment = self.assignments.find_by_room(room.id).await?;
        match assignment {
            Some(a) if a.faculty_id == faculty_id => Ok(()),
            _ => Err(ProctorRoomError::NotRoomProctor { faculty_id, room_id: room.id }),
        }
    }

    /// Shared withdrawal path for removals and self-service leave
    async fn withdraw(
        &self,
        exam_id: Uuid,
        student_id: Uuid,
        status: crate::models::EnrollmentStatus,
        room_id: Uuid,
    ) -> Result<()> {
        if !status.can_withdraw() {
            return Err(ProctorRoomError::InvalidStateTransition {
                from: status.as_str().to_string(),
                to: crate::models::EnrollmentStatus::Withdrawn.as_str().to_string(),
            });
        }

        self.enrollments.mark_left(exam_id, student_id, Utc::now()).await?;
        self.rooms.decrement(room_id).await?;
        Ok(())
    }

    /// Provider token issuance bounded by the configured timeout. The
    /// caller may hold a capacity slot, so a hanging provider call must not
    /// block indefinitely.
    async fn issue_token_bounded(
        &self,
        room: &ExamRoom,
        participant_id: Uuid,
        role: ParticipantRole,
    ) -> Result<String> {
        let ttl = Duration::from_secs(self.config.token_ttl_seconds);
        let bound = Duration::from_secs(self.config.provider_timeout_seconds);

        match tokio::time::timeout(
            bound,
            self.provider.issue_token(&room.provider_room_id, participant_id, role, ttl),
        )
        .await
        {
            Ok(Ok(token)) => Ok(token),
            Ok(Err(e)) => Err(e.into()),
            Err(_) => Err(ProviderError::Timeout.into()),
        }
    }
}
