//! End-to-end hunt flow through the HTTP layer.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use trailtale_test_support::{ScriptedResponse, ScriptedStoryteller};

use common::{build_test_app, fill_and_approve, get_json, post_empty, post_json, wait_until_idle};

#[tokio::test]
async fn test_full_hunt_from_first_word_to_completed_story() {
    let storyteller = Arc::new(ScriptedStoryteller::new(vec![
        ScriptedResponse::ok("Up the Chimney went the Cookies."),
        ScriptedResponse::ok("And then everyone Danced. The end."),
    ]));
    let app = build_test_app(storyteller);

    // Fresh session: collecting input for checkpoint 1.
    let (status, body) = get_json(app.clone(), "/api/status").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["phase"], "INPUT");
    assert_eq!(body["step_number"], 1);
    assert_eq!(body["total_steps"], 2);
    assert_eq!(body["slots"].as_array().unwrap().len(), 2);

    // Submit both words and approve.
    fill_and_approve(&app, &["Chimney", "Cookies"]).await;
    let (_, body) = get_json(app.clone(), "/api/status").await;
    assert_eq!(body["phase"], "HINT");
    assert_eq!(body["hint"], "Look closely where the coats are hung");
    assert_eq!(body["narrative"], "");

    // Scanning a future code must not move the session.
    let (status, body) = get_json(app.clone(), "/found/2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"], "wrong_step");
    let (_, body) = get_json(app.clone(), "/api/status").await;
    assert_eq!(body["phase"], "HINT");
    assert_eq!(body["step_number"], 1);

    // The right code advances to checkpoint 2.
    let (_, body) = get_json(app.clone(), "/found/1").await;
    assert_eq!(body["outcome"], "advanced");
    assert_eq!(body["completed"], false);
    let (_, body) = get_json(app.clone(), "/api/status").await;
    assert_eq!(body["phase"], "INPUT");
    assert_eq!(body["step_number"], 2);
    assert_eq!(body["slots"].as_array().unwrap().len(), 1);

    // Finish the hunt.
    fill_and_approve(&app, &["Danced"]).await;
    let (_, body) = get_json(app.clone(), "/found/2").await;
    assert_eq!(body["outcome"], "advanced");
    assert_eq!(body["completed"], true);

    // The story arrives asynchronously, in confirmation order.
    let body = wait_until_idle(&app).await;
    assert_eq!(body["phase"], "COMPLETED");
    let narrative = body["narrative"].as_str().unwrap();
    assert!(narrative.contains("Chimney"));
    assert!(narrative.contains("Cookies"));
    assert!(narrative.contains("Danced"));
    assert!(
        narrative.find("Chimney").unwrap() < narrative.find("Danced").unwrap(),
        "segments out of order: {narrative}"
    );

    // Completed status carries the full word history.
    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 3);
    assert_eq!(results[0]["value"], "Chimney");
    assert_eq!(results[1]["value"], "Cookies");
    assert_eq!(results[2]["value"], "Danced");
}

#[tokio::test]
async fn test_approve_step_with_blank_slot_is_rejected_without_commit() {
    let app = build_test_app(Arc::new(ScriptedStoryteller::new(vec![])));

    let (status, _) = post_json(
        app.clone(),
        "/api/update_input",
        &serde_json::json!({"index": 0, "value": "Chimney"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = post_empty(app.clone(), "/api/admin/approve_step").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "incomplete_inputs");

    let (_, body) = get_json(app.clone(), "/api/status").await;
    assert_eq!(body["phase"], "INPUT");
}

#[tokio::test]
async fn test_update_input_during_hint_phase_is_a_conflict() {
    let app = build_test_app(Arc::new(ScriptedStoryteller::new(vec![])));
    fill_and_approve(&app, &["Chimney", "Cookies"]).await;

    let (status, body) = post_json(
        app.clone(),
        "/api/update_input",
        &serde_json::json!({"index": 0, "value": "Sleigh"}),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "invalid_phase");
}

#[tokio::test]
async fn test_unparseable_code_joins_without_mutation() {
    let app = build_test_app(Arc::new(ScriptedStoryteller::new(vec![])));

    let (status, body) = get_json(app.clone(), "/found/not-a-number").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"], "joined");

    let (_, body) = get_json(app.clone(), "/api/status").await;
    assert_eq!(body["phase"], "INPUT");
    assert_eq!(body["step_number"], 1);
}

#[tokio::test]
async fn test_reset_starts_a_fresh_session() {
    let app = build_test_app(Arc::new(ScriptedStoryteller::new(vec![])));
    fill_and_approve(&app, &["Chimney", "Cookies"]).await;

    let (status, body) = get_json(app.clone(), "/reset").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (_, body) = get_json(app.clone(), "/api/status").await;
    assert_eq!(body["epoch"], 2);
    assert_eq!(body["phase"], "INPUT");
    assert_eq!(body["step_number"], 1);
    assert_eq!(body["narrative"], "");
    for slot in body["slots"].as_array().unwrap() {
        assert_eq!(slot["value"], "");
    }
}
