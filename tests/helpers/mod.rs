//! Shared test fixtures
//!
//! Wires the engines onto the in-memory stores with a scriptable video
//! provider stub, so the suites cover allocation and admission semantics
//! without Postgres or a real conferencing service.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use uuid::Uuid;

use proctorroom::config::Settings;
use proctorroom::database::memory::{
    InMemoryAssignmentStore, InMemoryEnrollmentStore, InMemoryJoinRequestStore, InMemoryRoomStore,
};
use proctorroom::services::video::{ParticipantRole, ProviderRoom, VideoRoomProvider};
use proctorroom::services::ServiceFactory;
use proctorroom::utils::errors::{ProviderError, ProviderResult};

/// Scriptable in-memory [`VideoRoomProvider`]
#[derive(Default)]
pub struct StubVideoProvider {
    created: AtomicUsize,
    /// When set, room creation fails once this many rooms exist
    fail_create_after: Mutex<Option<usize>>,
    fail_tokens: AtomicBool,
    deleted: Mutex<Vec<String>>,
}

impl StubVideoProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn fail_create_after(&self, successes: usize) {
        *self.fail_create_after.lock().await = Some(successes);
    }

    pub fn fail_tokens(&self, fail: bool) {
        self.fail_tokens.store(fail, Ordering::SeqCst);
    }

    pub fn rooms_created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    pub async fn deleted_rooms(&self) -> Vec<String> {
        self.deleted.lock().await.clone()
    }
}

#[async_trait]
impl VideoRoomProvider for StubVideoProvider {
    async fn create_room(&self, name: &str) -> ProviderResult<ProviderRoom> {
        if let Some(limit) = *self.fail_create_after.lock().await {
            if self.created.load(Ordering::SeqCst) >= limit {
                return Err(ProviderError::Unavailable);
            }
        }
        let n = self.created.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(ProviderRoom {
            room_id: format!("prov-{n}"),
            room_name: name.to_string(),
        })
    }

    async fn delete_room(&self, room_id: &str) -> ProviderResult<()> {
        self.deleted.lock().await.push(room_id.to_string());
        Ok(())
    }

    async fn issue_token(
        &self,
        room_id: &str,
        participant_id: Uuid,
        role: ParticipantRole,
        _ttl: Duration,
    ) -> ProviderResult<String> {
        if self.fail_tokens.load(Ordering::SeqCst) {
            return Err(ProviderError::Unavailable);
        }
        Ok(format!("token:{room_id}:{participant_id}:{}", role.as_str()))
    }
}

/// Engines plus direct handles on the stores backing them
pub struct TestContext {
    pub services: ServiceFactory,
    pub rooms: Arc<InMemoryRoomStore>,
    pub enrollments: Arc<InMemoryEnrollmentStore>,
    pub assignments: Arc<InMemoryAssignmentStore>,
    pub join_requests: Arc<InMemoryJoinRequestStore>,
    pub provider: Arc<StubVideoProvider>,
}

impl TestContext {
    pub fn new() -> Self {
        let rooms = Arc::new(InMemoryRoomStore::new());
        let enrollments = Arc::new(InMemoryEnrollmentStore::new());
        let assignments = Arc::new(InMemoryAssignmentStore::new());
        let join_requests = Arc::new(InMemoryJoinRequestStore::new());
        let provider = Arc::new(StubVideoProvider::new());

        let services = ServiceFactory::new(
            rooms.clone(),
            enrollments.clone(),
            assignments.clone(),
            join_requests.clone(),
            provider.clone(),
            Settings::default(),
        );

        Self { services, rooms, enrollments, assignments, join_requests, provider }
    }
}

/// Fresh ids for rosters and faculty pools
pub fn ids(n: usize) -> Vec<Uuid> {
    (0..n).map(|_| Uuid::new_v4()).collect()
}
