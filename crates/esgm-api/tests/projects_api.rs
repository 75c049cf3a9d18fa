//! Project endpoints and background evaluation.

#![allow(clippy::unwrap_used)]
#![allow(clippy::panic)]

mod common;

use std::time::Duration;

use common::{TestApp, project_body, test_config};
use esgm_core::EvaluationMode;
use http::{Method, StatusCode};
use serde_json::{Value, json};

/// Poll a project until its status leaves PROCESSING.
async fn settled(app: &TestApp, token: &str, project_id: i64) -> Value {
    for _ in 0..100 {
        let (status, body) = app
            .get(&format!("/api/projects/{project_id}"), Some(token))
            .await;
        assert_eq!(status, StatusCode::OK);
        if body["data"]["status"] != "PROCESSING" {
            return body["data"].clone();
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("project {project_id} never finished evaluating");
}

// ============================================================================
// Authentication
// ============================================================================

#[tokio::test]
async fn test_project_routes_require_token() {
    let app = TestApp::new().await;
    for uri in [
        "/api/projects",
        "/api/projects/key-issues",
        "/api/projects/stats",
        "/api/projects/1",
    ] {
        let (status, body) = app.get(uri, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
        assert_eq!(body["success"], false);
    }
}

// ============================================================================
// Key issues
// ============================================================================

#[tokio::test]
async fn test_key_issues() {
    let app = TestApp::new().await;
    let token = app.register("issues@example.com").await;
    let (status, body) = app.get("/api/projects/key-issues", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);

    let issues = body["data"].as_array().unwrap();
    assert_eq!(issues.len(), 23);
    assert_eq!(issues[0]["pillar"], "E");
    assert_eq!(issues[0]["input_type"], "numeric");
    let dropdown = issues
        .iter()
        .find(|i| i["input_type"] == "dropdown")
        .unwrap();
    assert!(!dropdown["dropdown_options"].as_array().unwrap().is_empty());
}

// ============================================================================
// Create
// ============================================================================

#[tokio::test]
async fn test_create_project_and_evaluate() {
    let app = TestApp::new().await;
    let token = app.register("create@example.com").await;
    let project = app.create_project(&token, "Solar Farm").await;
    assert_eq!(project["project_name"], "Solar Farm");
    assert_eq!(project["status"], "PROCESSING");

    let project_id = project["project_id"].as_i64().unwrap();
    let view = settled(&app, &token, project_id).await;
    assert_eq!(view["status"], "COMPLETED");
    assert_eq!(view["project_data"].as_array().unwrap().len(), 3);
    assert_eq!(view["project_data"][0]["issue_name"], "Carbon emissions");

    let evaluation = &view["evaluation"];
    assert_eq!(evaluation["overall_score"], 80.0);
    assert_eq!(evaluation["status"], "PASSED");
    assert_eq!(evaluation["pillar_scores"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_create_project_noop_stays_pending() {
    let mut config = test_config();
    config.evaluation.mode = EvaluationMode::Noop;
    let app = TestApp::with_config(config).await;
    let token = app.register("noop@example.com").await;
    let project = app.create_project(&token, "Idle").await;
    assert_eq!(project["status"], "PENDING");

    let project_id = project["project_id"].as_i64().unwrap();
    let view = settled(&app, &token, project_id).await;
    assert_eq!(view["status"], "PENDING");
    assert!(view.get("evaluation").is_none());
}

#[tokio::test]
async fn test_create_project_validation() {
    let app = TestApp::new().await;
    let token = app.register("invalid@example.com").await;

    let mut body = project_body("x");
    body["project_name"] = json!("   ");
    let (status, resp) = app.post("/api/projects", Some(&token), body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(resp["message"], "Project name is required");

    let mut body = project_body("x");
    body["project_data"] = json!([]);
    let (status, resp) = app.post("/api/projects", Some(&token), body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(resp["message"], "Project data is required");

    let mut body = project_body("x");
    body["project_data"] = json!([{ "issue_id": 1, "value": "  " }]);
    let (status, resp) = app.post("/api/projects", Some(&token), body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        resp["message"],
        "Each project data item must have issue_id and non-empty value"
    );
}

#[tokio::test]
async fn test_create_project_unknown_issue() {
    let app = TestApp::new().await;
    let token = app.register("unknown@example.com").await;
    let mut body = project_body("x");
    body["project_data"] = json!([
        { "issue_id": 1, "value": "5" },
        { "issue_id": 404, "value": "5" }
    ]);
    let (status, resp) = app.post("/api/projects", Some(&token), body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(resp["message"], "Invalid issue_id: 404");
}

// ============================================================================
// List, show, delete
// ============================================================================

#[tokio::test]
async fn test_list_only_own_projects() {
    let app = TestApp::new().await;
    let alice = app.register("alice@example.com").await;
    let bob = app.register("bob@example.com").await;
    app.create_project(&alice, "First").await;
    app.create_project(&alice, "Second").await;
    app.create_project(&bob, "Bob's").await;

    let (status, body) = app.get("/api/projects", Some(&alice)).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["project_name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Second", "First"]);
}

#[tokio::test]
async fn test_show_other_users_project_is_404() {
    let app = TestApp::new().await;
    let alice = app.register("alice2@example.com").await;
    let bob = app.register("bob2@example.com").await;
    let project = app.create_project(&alice, "Private").await;
    let id = project["project_id"].as_i64().unwrap();

    let (status, body) = app.get(&format!("/api/projects/{id}"), Some(&bob)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Project not found");
}

#[tokio::test]
async fn test_invalid_project_id() {
    let app = TestApp::new().await;
    let token = app.register("badid@example.com").await;
    let (status, body) = app.get("/api/projects/abc", Some(&token)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid project ID");
}

#[tokio::test]
async fn test_delete_project() {
    let app = TestApp::new().await;
    let token = app.register("delete@example.com").await;
    let project = app.create_project(&token, "Doomed").await;
    let id = project["project_id"].as_i64().unwrap();
    settled(&app, &token, id).await;

    let uri = format!("/api/projects/{id}");
    let (status, body) = app.send(Method::DELETE, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Project deleted successfully");

    let (status, _) = app.send(Method::DELETE, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = app.get(&uri, Some(&token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ============================================================================
// Re-evaluation and stats
// ============================================================================

#[tokio::test]
async fn test_reevaluate_project() {
    let app = TestApp::new().await;
    let token = app.register("again@example.com").await;
    let project = app.create_project(&token, "Again").await;
    let id = project["project_id"].as_i64().unwrap();
    let first = settled(&app, &token, id).await;

    let (status, body) = app
        .send(
            Method::POST,
            &format!("/api/projects/{id}/evaluate"),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body["data"]["status"], "PROCESSING");
    assert_eq!(body["data"]["evaluator"], "fixed");

    let second = settled(&app, &token, id).await;
    assert_eq!(second["status"], "COMPLETED");
    assert_ne!(
        first["evaluation"]["evaluation_id"],
        second["evaluation"]["evaluation_id"]
    );
}

#[tokio::test]
async fn test_reevaluate_missing_project() {
    let app = TestApp::new().await;
    let token = app.register("missing@example.com").await;
    let (status, _) = app
        .send(Method::POST, "/api/projects/77/evaluate", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_stats() {
    let app = TestApp::new().await;
    let token = app.register("stats@example.com").await;
    let (status, body) = app.get("/api/projects/stats", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total_projects"], 0);
    assert_eq!(body["data"]["average_score"], 0.0);

    let project = app.create_project(&token, "Counted").await;
    settled(&app, &token, project["project_id"].as_i64().unwrap()).await;

    let (_, body) = app.get("/api/projects/stats", Some(&token)).await;
    assert_eq!(body["data"]["total_projects"], 1);
    assert_eq!(body["data"]["completed_projects"], 1);
    assert_eq!(body["data"]["passed_projects"], 1);
    assert_eq!(body["data"]["average_score"], 80.0);
}
