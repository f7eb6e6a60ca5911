//! HTTP video provider adapter behavior
//!
//! Exercises room creation and teardown against a mock HTTP server and
//! checks the transient/permanent error classification.

use std::time::Duration;

use assert_matches::assert_matches;
use jsonwebtoken::{decode, DecodingKey, Validation};
use proctorroom::config::ProviderConfig;
use proctorroom::services::video::{
    HttpVideoProvider, JoinTokenClaims, ParticipantRole, VideoRoomProvider,
};
use proctorroom::utils::errors::ProviderError;
use uuid::Uuid;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn provider_for(server: &MockServer) -> HttpVideoProvider {
    HttpVideoProvider::new(ProviderConfig {
        base_url: server.uri(),
        api_key: "api-key".to_string(),
        api_secret: "signing-secret".to_string(),
        timeout_seconds: 2,
    })
    .unwrap()
}

#[tokio::test]
async fn test_create_room_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/rooms"))
        .and(body_partial_json(serde_json::json!({ "name": "exam-1-room-1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "room_id": "prov-abc",
            "room_name": "exam-1-room-1"
        })))
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let room = provider.create_room("exam-1-room-1").await.unwrap();
    assert_eq!(room.room_id, "prov-abc");
    assert_eq!(room.room_name, "exam-1-room-1");
}

#[tokio::test]
async fn test_server_error_is_transient() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/rooms"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let err = provider.create_room("room").await.unwrap_err();
    assert_matches!(err, ProviderError::Unavailable);
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_client_error_is_permanent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/rooms"))
        .respond_with(ResponseTemplate::new(400).set_body_string("bad name"))
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let err = provider.create_room("room").await.unwrap_err();
    assert_matches!(err, ProviderError::RequestFailed(_));
    assert!(!err.is_transient());
}

#[tokio::test]
async fn test_malformed_body_is_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/rooms"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let err = provider.create_room("room").await.unwrap_err();
    assert_matches!(err, ProviderError::InvalidResponse(_));
}

#[tokio::test]
async fn test_delete_room_tolerates_already_gone() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/rooms/prov-1"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    provider.delete_room("prov-1").await.unwrap();
}

#[tokio::test]
async fn test_issued_token_is_scoped_to_room_and_role() {
    let server = MockServer::start().await;
    let provider = provider_for(&server);
    let participant = Uuid::new_v4();

    let token = provider
        .issue_token("prov-7", participant, ParticipantRole::Proctor, Duration::from_secs(900))
        .await
        .unwrap();

    let decoded = decode::<JoinTokenClaims>(
        &token,
        &DecodingKey::from_secret(b"signing-secret"),
        &Validation::default(),
    )
    .unwrap();
    assert_eq!(decoded.claims.room, "prov-7");
    assert_eq!(decoded.claims.role, "PROCTOR");
    assert_eq!(decoded.claims.sub, participant.to_string());
}
