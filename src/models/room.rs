//! Exam room model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Lifecycle of a provider-backed exam room
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoomStatus {
    Created,
    Active,
    Ended,
}

impl RoomStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoomStatus::Created => "CREATED",
            RoomStatus::Active => "ACTIVE",
            RoomStatus::Ended => "ENDED",
        }
    }
}

/// Exam delivery mode; room allocation only assigns proctors in
/// `Proctoring` mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExamMode {
    Auto,
    Proctoring,
}

/// One capacity-bounded video room of an exam.
///
/// `current_students` is bounded by `0..=max_students` at all times and is
/// only ever mutated through the store's atomic increment and decrement
/// primitives.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ExamRoom {
    pub id: Uuid,
    pub exam_id: Uuid,
    /// Identifier of the room at the video provider
    pub provider_room_id: String,
    pub room_name: String,
    pub max_students: i32,
    pub current_students: i32,
    pub status: RoomStatus,
    pub faculty_joined_at: Option<DateTime<Utc>>,
    pub room_ended_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ExamRoom {
    pub fn is_full(&self) -> bool {
        self.current_students >= self.max_students
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateExamRoomRequest {
    pub exam_id: Uuid,
    pub provider_room_id: String,
    pub room_name: String,
    pub max_students: i32,
    /// Seeded with the size of the allocated roster chunk
    pub current_students: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_as_str() {
        assert_eq!(RoomStatus::Created.as_str(), "CREATED");
        assert_eq!(RoomStatus::Active.as_str(), "ACTIVE");
        assert_eq!(RoomStatus::Ended.as_str(), "ENDED");
    }

    #[test]
    fn test_status_serde_uses_wire_names() {
        let json = serde_json::to_string(&RoomStatus::Active).unwrap();
        assert_eq!(json, "\"ACTIVE\"");
        let mode: ExamMode = serde_json::from_str("\"PROCTORING\"").unwrap();
        assert_eq!(mode, ExamMode::Proctoring);
    }
}
