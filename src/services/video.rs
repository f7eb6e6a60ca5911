//! Video room provider integration
//!
//! This service talks to the third-party video conferencing service:
//! room creation and teardown go over its HTTP API, while participant join
//! tokens are minted locally from the shared API secret.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::ProviderConfig;
use crate::utils::errors::{ProctorRoomError, ProviderError, ProviderResult, Result};

/// A room as known by the video provider
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProviderRoom {
    pub room_id: String,
    pub room_name: String,
}

/// Role a join token is scoped to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParticipantRole {
    Proctor,
    Student,
}

impl ParticipantRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParticipantRole::Proctor => "PROCTOR",
            ParticipantRole::Student => "STUDENT",
        }
    }
}

/// Claims carried by a minted join token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinTokenClaims {
    /// Participant id
    pub sub: String,
    /// Provider room id the token is valid for
    pub room: String,
    pub role: String,
    pub iat: usize,
    pub exp: usize,
}

/// Contract to the external video conferencing service
#[async_trait]
pub trait VideoRoomProvider: Send + Sync {
    async fn create_room(&self, name: &str) -> ProviderResult<ProviderRoom>;

    async fn delete_room(&self, room_id: &str) -> ProviderResult<()>;

    /// Mint a time-boxed join token scoped to a room and a role
    async fn issue_token(
        &self,
        room_id: &str,
        participant_id: Uuid,
        role: ParticipantRole,
        ttl: Duration,
    ) -> ProviderResult<String>;
}

#[derive(Debug, Clone, Deserialize)]
struct CreateRoomResponse {
    room_id: String,
    room_name: String,
}

/// HTTP-backed [`VideoRoomProvider`]
#[derive(Debug, Clone)]
pub struct HttpVideoProvider {
    client: Client,
    config: ProviderConfig,
}

impl HttpVideoProvider {
    /// Create a new HttpVideoProvider instance
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent("ProctorRoom/1.0")
            .build()
            .map_err(|e| ProctorRoomError::Config(format!("HTTP client setup failed: {e}")))?;

        Ok(Self { client, config })
    }

    fn classify(e: reqwest::Error) -> ProviderError {
        if e.is_timeout() {
            ProviderError::Timeout
        } else if e.is_connect() {
            ProviderError::Unavailable
        } else {
            ProviderError::RequestFailed(e.to_string())
        }
    }
}

#[async_trait]
impl VideoRoomProvider for HttpVideoProvider {
    async fn create_room(&self, name: &str) -> ProviderResult<ProviderRoom> {
        let url = format!("{}/api/v1/rooms", self.config.base_url);
        debug!(room_name = %name, url = %url, "Creating provider room");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&serde_json::json!({ "name": name }))
            .send()
            .await
            .map_err(Self::classify)?;

        let status = response.status();
        if status.is_server_error() {
            return Err(ProviderError::Unavailable);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::RequestFailed(format!("HTTP {status}: {body}")));
        }

        let created: CreateRoomResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

        Ok(ProviderRoom {
            room_id: created.room_id,
            room_name: created.room_name,
        })
    }

    async fn delete_room(&self, room_id: &str) -> ProviderResult<()> {
        let url = format!("{}/api/v1/rooms/{}", self.config.base_url, room_id);
        debug!(room_id = %room_id, "Deleting provider room");

        let response = self
            .client
            .delete(&url)
            .bearer_auth(&self.config.api_key)
            .send()
            .await
            .map_err(Self::classify)?;

        let status = response.status();
        if status.is_server_error() {
            return Err(ProviderError::Unavailable);
        }
        // A room already gone is fine for teardown
        if status == reqwest::StatusCode::NOT_FOUND {
            warn!(room_id = %room_id, "Provider room already deleted");
            return Ok(());
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::RequestFailed(format!("HTTP {status}: {body}")));
        }

        Ok(())
    }

    async fn issue_token(
        &self,
        room_id: &str,
        participant_id: Uuid,
        role: ParticipantRole,
        ttl: Duration,
    ) -> ProviderResult<String> {
        let now = Utc::now().timestamp() as usize;
        let claims = JoinTokenClaims {
            sub: participant_id.to_string(),
            room: room_id.to_string(),
            role: role.as_str().to_string(),
            iat: now,
            exp: now + ttl.as_secs() as usize,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.api_secret.as_bytes()),
        )
        .map_err(|e| ProviderError::Token(e.to_string()))
    }
}
