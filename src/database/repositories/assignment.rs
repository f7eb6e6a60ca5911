//! Faculty assignment repository implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::store::AssignmentStore;
use crate::models::assignment::{CreateAssignmentRequest, FacultyAssignment, DEFAULT_PROCTOR_ROLE};
use crate::utils::errors::Result;

const ASSIGNMENT_COLUMNS: &str =
    "id, exam_id, faculty_id, exam_room_id, role, has_joined, joined_at, created_at";

#[derive(Debug, Clone)]
pub struct AssignmentRepository {
    pool: PgPool,
}

impl AssignmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AssignmentStore for AssignmentRepository {
    async fn create(&self, request: CreateAssignmentRequest) -> Result<FacultyAssignment> {
        let assignment = sqlx::query_as::<_, FacultyAssignment>(&format!(
            r#"
            INSERT INTO faculty_assignments (id, exam_id, faculty_id, exam_room_id, role, has_joined, created_at)
            VALUES ($1, $2, $3, $4, $5, FALSE, $6)
            RETURNING {ASSIGNMENT_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(request.exam_id)
        .bind(request.faculty_id)
        .bind(request.exam_room_id)
        .bind(request.role.unwrap_or_else(|| DEFAULT_PROCTOR_ROLE.to_string()))
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(assignment)
    }

    async fn find_by_exam_and_faculty(
        &self,
        exam_id: Uuid,
        faculty_id: Uuid,
    ) -> Result<Vec<FacultyAssignment>> {
        let assignments = sqlx::query_as::<_, FacultyAssignment>(&format!(
            "SELECT {ASSIGNMENT_COLUMNS} FROM faculty_assignments WHERE exam_id = $1 AND faculty_id = $2 ORDER BY created_at"
        ))
        .bind(exam_id)
        .bind(faculty_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(assignments)
    }

    async fn find_by_room(&self, room_id: Uuid) -> Result<Option<FacultyAssignment>> {
        let assignment = sqlx::query_as::<_, FacultyAssignment>(&format!(
            "SELECT {ASSIGNMENT_COLUMNS} FROM faculty_assignments WHERE exam_room_id = $1"
        ))
        .bind(room_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(assignment)
    }

    async fn find_by_exam(&self, exam_id: Uuid) -> Result<Vec<FacultyAssignment>> {
        let assignments = sqlx::query_as::<_, FacultyAssignment>(&format!(
            "SELECT {ASSIGNMENT_COLUMNS} FROM faculty_assignments WHERE exam_id = $1 ORDER BY created_at"
        ))
        .bind(exam_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(assignments)
    }

    async fn mark_joined(
        &self,
        exam_id: Uuid,
        faculty_id: Uuid,
        room_id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<FacultyAssignment> {
        let assignment = sqlx::query_as::<_, FacultyAssignment>(&format!(
            r#"
            UPDATE faculty_assignments
            SET has_joined = TRUE, joined_at = $4
            WHERE exam_id = $1 AND faculty_id = $2 AND exam_room_id = $3
            RETURNING {ASSIGNMENT_COLUMNS}
            "#
        ))
        .bind(exam_id)
        .bind(faculty_id)
        .bind(room_id)
        .bind(at)
        .fetch_one(&self.pool)
        .await?;

        Ok(assignment)
    }
}
