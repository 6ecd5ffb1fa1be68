#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response};
use http_body_util::BodyExt;
use jsonwebtoken::{EncodingKey, Header, encode};
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

use prompt_auth::SecretVerifier;
use prompt_cache::NoopCache;
use prompt_config::{CoreConfig, SdkConfig};
use prompt_sdk::core_service::CoreClient;
use prompt_sdk::modules::NoPhaseSettings;
use prompt_sdk::{AppState, PhaseHandlers, init_router};

pub const SECRET: &str = "test-secret";
pub const CLIENT_ID: &str = "prompt-server";
pub const USER_ID: &str = "2c1b6a3e-0d4f-4e0a-9a57-5d4c2b1f7e10";

pub const LECTURER_ROLE: &str = "ios2425-Lecturer";
pub const EDITOR_ROLE: &str = "ios2425-Editor";
pub const CUSTOM_PREFIX: &str = "ios2425-cr-";

/// Signs an HS256 token carrying `roles` as client roles.
pub fn token(roles: &[&str]) -> String {
    let exp = (chrono::Utc::now() + chrono::Duration::hours(1)).timestamp();
    let claims = json!({
        "sub": USER_ID,
        "exp": exp,
        "iat": chrono::Utc::now().timestamp(),
        "azp": "prompt-client",
        "email": "student@example.com",
        "given_name": "Ada",
        "family_name": "Lovelace",
        "resource_access": { CLIENT_ID: { "roles": roles } },
    });
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap()
}

pub fn bearer(roles: &[&str]) -> String {
    format!("Bearer {}", token(roles))
}

pub fn test_state(core_url: &str) -> AppState {
    let config = SdkConfig {
        core: CoreConfig::new(core_url),
        ..Default::default()
    };
    let core = CoreClient::new(&config.core).unwrap();
    AppState::new(
        config,
        Arc::new(SecretVerifier::new(SECRET, CLIENT_ID)),
        core,
        Arc::new(NoopCache),
    )
}

pub fn build_app(core_url: &str) -> Router {
    let handlers = PhaseHandlers {
        config: Arc::new(NoPhaseSettings),
        copy: Arc::new(NoPhaseSettings),
    };
    init_router(test_state(core_url), handlers)
}

pub fn get(uri: &str, authorization: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(value) = authorization {
        builder = builder.header("authorization", value);
    }
    builder.body(Body::empty()).unwrap()
}

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

pub fn roles_body() -> String {
    json!({
        "courseLecturerRole": LECTURER_ROLE,
        "courseEditorRole": EDITOR_ROLE,
        "customRolePrefix": CUSTOM_PREFIX,
    })
    .to_string()
}

pub fn roles_path(course_phase_id: Uuid) -> String {
    format!("/api/auth/course_phase/{}/roles", course_phase_id)
}

pub fn is_student_path(course_phase_id: Uuid) -> String {
    format!("/api/auth/course_phase/{}/is_student", course_phase_id)
}

pub fn participation(course_phase_id: Uuid, course_participation_id: Uuid) -> Value {
    json!({
        "coursePhaseID": course_phase_id,
        "passStatus": "not_assessed",
        "courseParticipationID": course_participation_id,
        "restrictedData": {},
        "studentReadableData": {},
        "prevData": null,
        "student": { "firstName": "Ada", "lastName": "Lovelace" },
    })
}
