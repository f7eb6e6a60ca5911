//! Student enrollment repository implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::store::EnrollmentStore;
use crate::models::enrollment::{CreateEnrollmentRequest, EnrollmentStatus, StudentEnrollment};
use crate::utils::errors::Result;

const ENROLLMENT_COLUMNS: &str = "id, exam_id, student_id, exam_room_id, status, has_joined, \
     joined_at, left_at, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct EnrollmentRepository {
    pool: PgPool,
}

impl EnrollmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EnrollmentStore for EnrollmentRepository {
    async fn create(&self, request: CreateEnrollmentRequest) -> Result<StudentEnrollment> {
        let enrollment = sqlx::query_as::<_, StudentEnrollment>(&format!(
            r#"
            INSERT INTO student_enrollments (id, exam_id, student_id, exam_room_id, status, has_joined, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, FALSE, $6, $7)
            RETURNING {ENROLLMENT_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(request.exam_id)
        .bind(request.student_id)
        .bind(request.exam_room_id)
        .bind(EnrollmentStatus::Enrolled)
        .bind(Utc::now())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(enrollment)
    }

    async fn find_by_exam_and_student(
        &self,
        exam_id: Uuid,
        student_id: Uuid,
    ) -> Result<Option<StudentEnrollment>> {
        let enrollment = sqlx::query_as::<_, StudentEnrollment>(&format!(
            "SELECT {ENROLLMENT_COLUMNS} FROM student_enrollments WHERE exam_id = $1 AND student_id = $2"
        ))
        .bind(exam_id)
        .bind(student_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(enrollment)
    }

    async fn find_by_room(&self, room_id: Uuid) -> Result<Vec<StudentEnrollment>> {
        let enrollments = sqlx::query_as::<_, StudentEnrollment>(&format!(
            "SELECT {ENROLLMENT_COLUMNS} FROM student_enrollments WHERE exam_room_id = $1 ORDER BY created_at"
        ))
        .bind(room_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(enrollments)
    }

    async fn count_by_exam(&self, exam_id: Uuid) -> Result<i64> {
        let count: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM student_enrollments WHERE exam_id = $1")
                .bind(exam_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count.0)
    }

    async fn mark_joined(
        &self,
        exam_id: Uuid,
        student_id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<StudentEnrollment> {
        let enrollment = sqlx::query_as::<_, StudentEnrollment>(&format!(
            r#"
            UPDATE student_enrollments
            SET status = $3, has_joined = TRUE, joined_at = $4, left_at = NULL, updated_at = $5
            WHERE exam_id = $1 AND student_id = $2
            RETURNING {ENROLLMENT_COLUMNS}
            "#
        ))
        .bind(exam_id)
        .bind(student_id)
        .bind(EnrollmentStatus::Attending)
        .bind(at)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(enrollment)
    }

    async fn mark_left(
        &self,
        exam_id: Uuid,
        student_id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<StudentEnrollment> {
        let enrollment = sqlx::query_as::<_, StudentEnrollment>(&format!(
            r#"
            UPDATE student_enrollments
            SET status = $3, left_at = $4, updated_at = $5
            WHERE exam_id = $1 AND student_id = $2
            RETURNING {ENROLLMENT_COLUMNS}
            "#
        ))
        .bind(exam_id)
        .bind(student_id)
        .bind(EnrollmentStatus::Withdrawn)
        .bind(at)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(enrollment)
    }
}
