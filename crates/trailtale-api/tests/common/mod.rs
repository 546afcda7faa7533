//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{TimeZone, Utc};
use http_body_util::BodyExt;
use tower::ServiceExt;

use trailtale_core::clock::Clock;
use trailtale_core::rng::DeterministicRng;
use trailtale_core::storyteller::Storyteller;
use trailtale_narrative::coordinator::{GenerationWorker, generation_channel};
use trailtale_session::application::controller::SessionController;
use trailtale_session::domain::plan::{CheckpointSpec, HuntConfig, HuntPlan, SlotSpec};
use trailtale_test_support::{FixedClock, MockRng};

use trailtale_api::routes;
use trailtale_api::state::AppState;

/// Fixed timestamp used across all integration tests.
fn fixed_clock() -> Arc<dyn Clock> {
    Arc::new(FixedClock(
        Utc.with_ymd_and_hms(2026, 8, 1, 18, 0, 0).unwrap(),
    ))
}

fn slot(label: &str, kind: &str) -> SlotSpec {
    SlotSpec {
        label: label.to_owned(),
        kind: kind.to_owned(),
        guidance: None,
    }
}

/// Two checkpoints (2 slots + 1 slot), three participants.
pub fn sample_hunt_config() -> HuntConfig {
    HuntConfig {
        participants: vec!["Ada".to_owned(), "Ben".to_owned(), "Cleo".to_owned()],
        strict_roster: true,
        plan: HuntPlan {
            checkpoints: vec![
                CheckpointSpec {
                    id: 1,
                    hint: "Look closely where the coats are hung".to_owned(),
                    slots: vec![slot("A place", "Place"), slot("A treat", "Noun (Plural)")],
                },
                CheckpointSpec {
                    id: 2,
                    hint: "Check under the most comfortable pillow".to_owned(),
                    slots: vec![slot("An action", "Verb (Past Tense)")],
                },
            ],
        },
    }
}

/// Build the full app router over `storyteller`, with a deterministic
/// clock and RNG, and spawn the generation worker. Uses the same route
/// structure as `main.rs`.
pub fn build_test_app(storyteller: Arc<dyn Storyteller>) -> Router {
    let clock = fixed_clock();
    let rng: Arc<Mutex<dyn DeterministicRng + Send>> = Arc::new(Mutex::new(MockRng));
    let (jobs, job_queue) = generation_channel();
    let controller = Arc::new(
        SessionController::new(sample_hunt_config(), Arc::clone(&clock), rng, jobs).unwrap(),
    );
    tokio::spawn(GenerationWorker::new(controller.session(), storyteller, clock, job_queue).run());
    let app_state = AppState::new(controller);

    Router::new()
        .merge(routes::health::router())
        .merge(routes::hunt::router())
        .merge(routes::admin::router())
        .with_state(app_state)
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

/// Send a POST request with no body and return the response.
pub async fn post_empty(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

/// Fills and approves the current checkpoint's slots through the API.
pub async fn fill_and_approve(app: &Router, values: &[&str]) {
    for (index, value) in values.iter().enumerate() {
        let (status, _) = post_json(
            app.clone(),
            "/api/update_input",
            &serde_json::json!({"index": index, "value": value}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }
    let (status, _) = post_empty(app.clone(), "/api/admin/approve_step").await;
    assert_eq!(status, StatusCode::OK);
}

/// Polls status until generation settles, then returns the final body.
pub async fn wait_until_idle(app: &Router) -> serde_json::Value {
    for _ in 0..200 {
        let (status, body) = get_json(app.clone(), "/api/status").await;
        assert_eq!(status, StatusCode::OK);
        if body["generation_in_flight"] == false {
            return body;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("generation never settled");
}
