//! Services module
//!
//! This module contains the allocation and admission engines and the video
//! provider integration

pub mod video;
pub mod allocator;
pub mod admission;

// Re-export commonly used services
pub use video::{VideoRoomProvider, HttpVideoProvider, ProviderRoom, ParticipantRole, JoinTokenClaims};
pub use allocator::RoomAllocator;
pub use admission::{AdmissionController, AdmissionGrant, JoinRequestTicket};

use std::sync::Arc;

use crate::config::settings::Settings;
use crate::database::store::{AssignmentStore, EnrollmentStore, JoinRequestStore, RoomStore};
use crate::database::DatabaseService;
use crate::utils::errors::Result;

/// Service factory wiring stores and the provider into the two engines
#[derive(Clone)]
pub struct ServiceFactory {
    pub allocator: RoomAllocator,
    pub admission: AdmissionController,
}

impl ServiceFactory {
    /// Create a new ServiceFactory over arbitrary store implementations
    pub fn new(
        rooms: Arc<dyn RoomStore>,
        enrollments: Arc<dyn EnrollmentStore>,
        assignments: Arc<dyn AssignmentStore>,
        join_requests: Arc<dyn JoinRequestStore>,
        provider: Arc<dyn VideoRoomProvider>,
        settings: Settings,
    ) -> Self {
        let allocator = RoomAllocator::new(
            rooms.clone(),
            enrollments.clone(),
            assignments.clone(),
            provider.clone(),
        );
        let admission = AdmissionController::new(
            rooms,
            enrollments,
            assignments,
            join_requests,
            provider,
            settings.admission,
        );

        Self { allocator, admission }
    }

    /// Create a ServiceFactory over the Postgres repositories and the HTTP
    /// video provider
    pub fn postgres(database: DatabaseService, settings: Settings) -> Result<Self> {
        let provider = HttpVideoProvider::new(settings.provider.clone())?;
        Ok(Self::new(
            Arc::new(database.rooms),
            Arc::new(database.enrollments),
            Arc::new(database.assignments),
            Arc::new(database.join_requests),
            Arc::new(provider),
            settings,
        ))
    }
}
