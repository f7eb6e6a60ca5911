//! Student join request repository implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::store::JoinRequestStore;
use crate::models::join_request::{CreateJoinRequest, JoinRequestStatus, StudentJoinRequest};
use crate::utils::errors::Result;

const REQUEST_COLUMNS: &str = "id, exam_id, student_id, exam_room_id, faculty_id, status, \
     is_rejoin, approved_at, rejected_at, reviewed_by, rejection_reason, is_active, created_at";

#[derive(Debug, Clone)]
pub struct JoinRequestRepository {
    pool: PgPool,
}

impl JoinRequestRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JoinRequestStore for JoinRequestRepository {
    async fn create(&self, request: CreateJoinRequest) -> Result<StudentJoinRequest> {
        let row = sqlx::query_as::<_, StudentJoinRequest>(&format!(
            r#"
            INSERT INTO student_join_requests (id, exam_id, student_id, exam_room_id, faculty_id, status, is_rejoin, is_active, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, TRUE, $8)
            RETURNING {REQUEST_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(request.exam_id)
        .bind(request.student_id)
        .bind(request.exam_room_id)
        .bind(request.faculty_id)
        .bind(JoinRequestStatus::Pending)
        .bind(request.is_rejoin)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn find_by_id(&self, request_id: Uuid) -> Result<Option<StudentJoinRequest>> {
        let row = sqlx::query_as::<_, StudentJoinRequest>(&format!(
            "SELECT {REQUEST_COLUMNS} FROM student_join_requests WHERE id = $1"
        ))
        .bind(request_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn find_pending_by_exam_and_student(
        &self,
        exam_id: Uuid,
        student_id: Uuid,
    ) -> Result<Option<StudentJoinRequest>> {
        let row = sqlx::query_as::<_, StudentJoinRequest>(&format!(
            "SELECT {REQUEST_COLUMNS} FROM student_join_requests WHERE exam_id = $1 AND student_id = $2 AND status = $3"
        ))
        .bind(exam_id)
        .bind(student_id)
        .bind(JoinRequestStatus::Pending)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn find_pending_by_rooms(&self, room_ids: &[Uuid]) -> Result<Vec<StudentJoinRequest>> {
        let rows = sqlx::query_as::<_, StudentJoinRequest>(&format!(
            "SELECT {REQUEST_COLUMNS} FROM student_join_requests WHERE exam_room_id = ANY($1) AND status = $2 ORDER BY created_at"
        ))
        .bind(room_ids)
        .bind(JoinRequestStatus::Pending)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn approve(
        &self,
        request_id: Uuid,
        reviewed_by: Uuid,
        at: DateTime<Utc>,
    ) -> Result<bool> {
        // Guarded on the current status so a terminal row is never rewritten
        let result = sqlx::query(
            r#"
            UPDATE student_join_requests
            SET status = $3, approved_at = $4, reviewed_by = $2
            WHERE id = $1 AND status = $5
            "#
        )
        .bind(request_id)
        .bind(reviewed_by)
        .bind(JoinRequestStatus::Approved)
        .bind(at)
        .bind(JoinRequestStatus::Pending)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn reject(
        &self,
        request_id: Uuid,
        reviewed_by: Uuid,
        reason: Option<String>,
        at: DateTime<Utc>,
    ) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE student_join_requests
            SET status = $3, rejected_at = $4, reviewed_by = $2, rejection_reason = $5
            WHERE id = $1 AND status = $6
            "#
        )
        .bind(request_id)
        .bind(reviewed_by)
        .bind(JoinRequestStatus::Rejected)
        .bind(at)
        .bind(reason)
        .bind(JoinRequestStatus::Pending)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}
