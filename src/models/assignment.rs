//! Faculty proctoring assignment model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Default role for faculty assigned to a room
pub const DEFAULT_PROCTOR_ROLE: &str = "PROCTOR";

/// Binds a faculty member to one room of an exam as its proctor.
///
/// Round-robin allocation may give the same faculty several rooms of one
/// exam, so uniqueness holds per (exam, faculty, room).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FacultyAssignment {
    pub id: Uuid,
    pub exam_id: Uuid,
    pub faculty_id: Uuid,
    pub exam_room_id: Uuid,
    pub role: String,
    pub has_joined: bool,
    pub joined_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAssignmentRequest {
    pub exam_id: Uuid,
    pub faculty_id: Uuid,
    pub exam_room_id: Uuid,
    /// Defaults to [`DEFAULT_PROCTOR_ROLE`] when not given
    pub role: Option<String>,
}
