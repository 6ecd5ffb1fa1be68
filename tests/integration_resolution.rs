mod common;

use axum::http::StatusCode;
use mockito::Server;
use serde_json::{Value, json};
use uuid::Uuid;

use prompt_models::Resolution;

use common::{body_json, build_app, bearer, get, participation, send, test_state};

fn resolution(base_url: &str, source_phase: Uuid, dto_name: &str) -> Value {
    json!({
        "dtoName": dto_name,
        "baseURL": base_url,
        "endpointPath": "/scores/",
        "coursePhaseID": source_phase,
    })
}

async fn mock_participations(
    core: &mut Server,
    course_phase_id: Uuid,
    participations: Vec<Value>,
    resolutions: Vec<Value>,
) -> mockito::Mock {
    core.mock(
        "GET",
        format!("/api/course_phases/{}/participations", course_phase_id).as_str(),
    )
    .with_status(200)
    .with_header("content-type", "application/json")
    .with_body(
        json!({ "participations": participations, "resolutions": resolutions }).to_string(),
    )
    .create_async()
    .await
}

#[tokio::test]
async fn test_participations_are_enriched_from_the_owning_module() {
    let mut core = Server::new_async().await;
    let mut module = Server::new_async().await;
    let phase = Uuid::new_v4();
    let source = Uuid::new_v4();
    let (alice, bob) = (Uuid::new_v4(), Uuid::new_v4());
    let header = bearer(&["PROMPT_Admin"]);

    mock_participations(
        &mut core,
        phase,
        vec![participation(phase, alice), participation(phase, bob)],
        vec![resolution(
            &format!("{}/assessment/api/", module.url()),
            source,
            "score",
        )],
    )
    .await;
    let scores = module
        .mock(
            "GET",
            format!("/assessment/api/course_phase/{}/scores", source).as_str(),
        )
        .match_header("authorization", header.as_str())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!([
                { "coursePhaseParticipationID": alice, "score": 4.0 },
                { "coursePhaseParticipationID": bob, "score": 2.5 },
            ])
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;

    let app = build_app(&core.url());
    let response = send(
        app,
        get(&format!("/api/course_phase/{}/participations", phase), Some(&header)),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body[0]["prevData"]["score"], 4.0);
    assert_eq!(body[1]["prevData"]["score"], 2.5);
    scores.assert_async().await;
}

#[tokio::test]
async fn test_unparsable_participant_id_fails_the_batch() {
    let mut core = Server::new_async().await;
    let mut module = Server::new_async().await;
    let phase = Uuid::new_v4();
    let source = Uuid::new_v4();
    let alice = Uuid::new_v4();

    mock_participations(
        &mut core,
        phase,
        vec![participation(phase, alice)],
        vec![resolution(&module.url(), source, "score")],
    )
    .await;
    module
        .mock("GET", format!("/course_phase/{}/scores", source).as_str())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!([
                { "coursePhaseParticipationID": alice, "score": 1 },
                { "coursePhaseParticipationID": "garbage", "score": 2 },
            ])
            .to_string(),
        )
        .create_async()
        .await;

    let app = build_app(&core.url());
    let response = send(
        app,
        get(
            &format!("/api/course_phase/{}/participations", phase),
            Some(&bearer(&["PROMPT_Admin"])),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_invalid_descriptor_fails_before_any_request() {
    let mut core = Server::new_async().await;
    let mut module = Server::new_async().await;
    let phase = Uuid::new_v4();
    let source = Uuid::new_v4();

    let untouched = module
        .mock("GET", mockito::Matcher::Any)
        .expect(0)
        .create_async()
        .await;
    mock_participations(
        &mut core,
        phase,
        vec![participation(phase, Uuid::new_v4())],
        vec![
            resolution(&module.url(), source, "score"),
            resolution("not a url", source, "grade"),
        ],
    )
    .await;

    let app = build_app(&core.url());
    let response = send(
        app,
        get(
            &format!("/api/course_phase/{}/participations", phase),
            Some(&bearer(&["PROMPT_Admin"])),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    untouched.assert_async().await;
}

#[tokio::test]
async fn test_single_participation_uses_participant_url() {
    let mut core = Server::new_async().await;
    let mut module = Server::new_async().await;
    let phase = Uuid::new_v4();
    let source = Uuid::new_v4();
    let alice = Uuid::new_v4();

    core.mock(
        "GET",
        format!("/api/course_phases/{}/participations/{}", phase, alice).as_str(),
    )
    .with_status(200)
    .with_header("content-type", "application/json")
    .with_body(
        json!({
            "participation": participation(phase, alice),
            "resolutions": [resolution(&module.url(), source, "score")],
        })
        .to_string(),
    )
    .create_async()
    .await;
    let score = module
        .mock(
            "GET",
            format!("/course_phase/{}/scores/{}", source, alice).as_str(),
        )
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"score": 3}"#)
        .expect(1)
        .create_async()
        .await;

    let app = build_app(&core.url());
    let response = send(
        app,
        get(
            &format!("/api/course_phase/{}/participations/{}", phase, alice),
            Some(&bearer(&["PROMPT_Admin"])),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["prevData"]["score"], 3);
    score.assert_async().await;
}

#[tokio::test]
async fn test_missing_dto_key_is_an_error() {
    let mut core = Server::new_async().await;
    let mut module = Server::new_async().await;
    let phase = Uuid::new_v4();
    let source = Uuid::new_v4();

    core.mock(
        "GET",
        format!("/api/course_phases/{}/course_phase_data", phase).as_str(),
    )
    .with_status(200)
    .with_header("content-type", "application/json")
    .with_body(
        json!({
            "prevData": {"teamSize": 4},
            "resolutions": [resolution(&module.url(), source, "teams")],
        })
        .to_string(),
    )
    .create_async()
    .await;
    module
        .mock("GET", format!("/course_phase/{}/scores", source).as_str())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"somethingElse": []}"#)
        .create_async()
        .await;

    let app = build_app(&core.url());
    let response = send(
        app,
        get(
            &format!("/api/course_phase/{}/course_phase_data", phase),
            Some(&bearer(&["PROMPT_Admin"])),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_course_phase_data_is_merged() {
    let mut core = Server::new_async().await;
    let mut module = Server::new_async().await;
    let phase = Uuid::new_v4();
    let source = Uuid::new_v4();

    core.mock(
        "GET",
        format!("/api/course_phases/{}/course_phase_data", phase).as_str(),
    )
    .with_status(200)
    .with_header("content-type", "application/json")
    .with_body(
        json!({
            "prevData": {"teamSize": 4},
            "resolutions": [resolution(&module.url(), source, "teams")],
        })
        .to_string(),
    )
    .create_async()
    .await;
    module
        .mock("GET", format!("/course_phase/{}/scores", source).as_str())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"teams": ["red", "blue"]}"#)
        .create_async()
        .await;

    let app = build_app(&core.url());
    let response = send(
        app,
        get(
            &format!("/api/course_phase/{}/course_phase_data", phase),
            Some(&bearer(&["PROMPT_Admin"])),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["teamSize"], 4);
    assert_eq!(body["teams"], json!(["red", "blue"]));
}

#[tokio::test]
async fn test_engine_resolve_all_rekeys_by_participant() {
    let mut module = Server::new_async().await;
    let source = Uuid::new_v4();
    let alice = Uuid::new_v4();
    module
        .mock("GET", format!("/course_phase/{}/scores", source).as_str())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!([{ "coursePhaseParticipationID": alice, "score": 7 }]).to_string())
        .create_async()
        .await;

    let state = test_state("http://localhost:1");
    let descriptor: Resolution =
        serde_json::from_value(resolution(&module.url(), source, "score")).unwrap();
    let resolved = state
        .resolution
        .resolve_all("Bearer t", &descriptor)
        .await
        .unwrap();

    assert_eq!(resolved.len(), 1);
    assert_eq!(resolved[&alice], 7);
}

#[tokio::test]
async fn test_root_endpoint_path_targets_the_phase_url() {
    let mut core = Server::new_async().await;
    let mut module = Server::new_async().await;
    let phase = Uuid::new_v4();
    let source = Uuid::new_v4();

    let mut descriptor = resolution(&format!("{}/", module.url()), source, "teams");
    descriptor["endpointPath"] = json!("/");

    core.mock(
        "GET",
        format!("/api/course_phases/{}/course_phase_data", phase).as_str(),
    )
    .with_status(200)
    .with_header("content-type", "application/json")
    .with_body(json!({ "prevData": {}, "resolutions": [descriptor] }).to_string())
    .create_async()
    .await;
    let teams = module
        .mock("GET", format!("/course_phase/{}", source).as_str())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"teams": ["green"]}"#)
        .expect(1)
        .create_async()
        .await;

    let app = build_app(&core.url());
    let response = send(
        app,
        get(
            &format!("/api/course_phase/{}/course_phase_data", phase),
            Some(&bearer(&["PROMPT_Admin"])),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["teams"], json!(["green"]));
    teams.assert_async().await;
}
