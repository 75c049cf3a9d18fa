//! Shared helpers for API integration tests.

#![allow(dead_code)]
#![allow(clippy::unwrap_used)]

use axum::Router;
use axum::body::Body;
use esgm_api::{AppState, router};
use esgm_core::{EsgmConfig, EvaluationMode};
use esgm_store::Store;
use http::{Method, Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;

/// Config for tests: fast bcrypt, instant fixed-score evaluation.
pub fn test_config() -> EsgmConfig {
    let mut config = EsgmConfig::default();
    config.auth.bcrypt_cost = 4;
    config.evaluation.mode = EvaluationMode::Fixed;
    config.evaluation.delay_ms = 0;
    config.evaluation.fixed_score = 80.0;
    config
}

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_config(test_config()).await
    }

    pub async fn with_config(config: EsgmConfig) -> Self {
        let store = Store::open_in_memory().unwrap();
        store.migrate().await.unwrap();
        let state = AppState::new(config, store).unwrap();
        Self {
            router: router(state.clone()),
            state,
        }
    }

    /// Send a request and return the status and decoded JSON body.
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.send_request(request).await
    }

    pub async fn send_request(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, token, Some(body)).await
    }

    /// Register a user and return their token.
    pub async fn register(&self, email: &str) -> String {
        let (status, body) = self
            .post(
                "/api/auth/register",
                None,
                json!({
                    "firstName": "Test",
                    "lastName": "User",
                    "email": email,
                    "password": "Password1",
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["data"]["token"].as_str().unwrap().to_string()
    }

    /// Submit a project with answers for issues 1, 11 and 19.
    pub async fn create_project(&self, token: &str, name: &str) -> Value {
        let (status, body) = self
            .post("/api/projects", Some(token), project_body(name))
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["data"].clone()
    }
}

pub fn project_body(name: &str) -> Value {
    json!({
        "project_name": name,
        "industry": "Energy",
        "annual_revenue": 1250000.0,
        "description": "Integration test project",
        "project_data": [
            { "issue_id": 1, "value": "1200" },
            { "issue_id": 11, "value": "Yes" },
            { "issue_id": 19, "value": "75" }
        ]
    })
}
