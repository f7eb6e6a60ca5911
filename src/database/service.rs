//! Database service layer
//!
//! This module provides a high-level bundle of the Postgres repositories

use crate::database::repositories::{
    AssignmentRepository, EnrollmentRepository, JoinRequestRepository, RoomRepository,
};
use crate::database::DatabasePool;

#[derive(Debug, Clone)]
pub struct DatabaseService {
    pub rooms: RoomRepository,
    pub enrollments: EnrollmentRepository,
    pub assignments: AssignmentRepository,
    pub join_requests: JoinRequestRepository,
}

impl DatabaseService {
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            rooms: RoomRepository::new(pool.clone()),
            enrollments: EnrollmentRepository::new(pool.clone()),
            assignments: AssignmentRepository::new(pool.clone()),
            join_requests: JoinRequestRepository::new(pool),
        }
    }
}
