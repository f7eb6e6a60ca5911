//! Exam room repository implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::store::RoomStore;
use crate::models::room::{CreateExamRoomRequest, ExamRoom, RoomStatus};
use crate::utils::errors::Result;

const ROOM_COLUMNS: &str = "id, exam_id, provider_room_id, room_name, max_students, \
     current_students, status, faculty_joined_at, room_ended_at, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct RoomRepository {
    pool: PgPool,
}

impl RoomRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoomStore for RoomRepository {
    async fn create(&self, request: CreateExamRoomRequest) -> Result<ExamRoom> {
        let room = sqlx::query_as::<_, ExamRoom>(&format!(
            r#"
            INSERT INTO exam_rooms (id, exam_id, provider_room_id, room_name, max_students, current_students, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {ROOM_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(request.exam_id)
        .bind(request.provider_room_id)
        .bind(request.room_name)
        .bind(request.max_students)
        .bind(request.current_students)
        .bind(RoomStatus::Created)
        .bind(Utc::now())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(room)
    }

    async fn find_by_id(&self, room_id: Uuid) -> Result<Option<ExamRoom>> {
        let room = sqlx::query_as::<_, ExamRoom>(&format!(
            "SELECT {ROOM_COLUMNS} FROM exam_rooms WHERE id = $1"
        ))
        .bind(room_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(room)
    }

    async fn find_by_exam(&self, exam_id: Uuid) -> Result<Vec<ExamRoom>> {
        let rooms = sqlx::query_as::<_, ExamRoom>(&format!(
            "SELECT {ROOM_COLUMNS} FROM exam_rooms WHERE exam_id = $1 ORDER BY created_at"
        ))
        .bind(exam_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rooms)
    }

    async fn try_increment(&self, room_id: Uuid) -> Result<bool> {
        // Single conditional update; the guard and the increment must not be
        // separate round trips or concurrent approvals could both pass.
        let result = sqlx::query(
            r#"
            UPDATE exam_rooms
            SET current_students = current_students + 1, updated_at = $2
            WHERE id = $1 AND current_students < max_students
            "#
        )
        .bind(room_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn decrement(&self, room_id: Uuid) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE exam_rooms
            SET current_students = GREATEST(current_students - 1, 0), updated_at = $2
            WHERE id = $1
            "#
        )
        .bind(room_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn set_status(&self, room_id: Uuid, status: RoomStatus) -> Result<()> {
        sqlx::query("UPDATE exam_rooms SET status = $2, updated_at = $3 WHERE id = $1")
            .bind(room_id)
            .bind(status)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn mark_faculty_joined(&self, room_id: Uuid, at: DateTime<Utc>) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE exam_rooms
            SET status = $2, faculty_joined_at = $3, updated_at = $4
            WHERE id = $1
            "#
        )
        .bind(room_id)
        .bind(RoomStatus::Active)
        .bind(at)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn mark_ended(&self, room_id: Uuid, at: DateTime<Utc>) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE exam_rooms
            SET status = $2, room_ended_at = $3, updated_at = $4
            WHERE id = $1
            "#
        )
        .bind(room_id)
        .bind(RoomStatus::Ended)
        .bind(at)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
