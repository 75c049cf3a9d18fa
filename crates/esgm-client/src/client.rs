//! ESGM client implementation

use std::time::Duration;

use esgm_core::{
    AuthResponse, CreateProjectRequest, Envelope, KeyIssue, LoginRequest, Project, ProjectId,
    ProjectStats, ProjectStatus, ProjectWithEvaluation, PublicUser, RegisterRequest,
};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Acknowledgement of `POST /api/projects/{id}/evaluate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationTriggered {
    /// Project being evaluated
    pub project_id: ProjectId,
    /// Status right after the trigger
    pub status: ProjectStatus,
    /// Evaluator the server runs (`noop`, `fixed`, `random`)
    pub evaluator: String,
}

/// ESGM API client.
///
/// Holds the bearer token after [`EsgmClient::login`] or
/// [`EsgmClient::register`]; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct EsgmClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl EsgmClient {
    /// Client for the API at `base_url` (e.g. `http://localhost:3001`).
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Use `token` for authenticated requests.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// The current bearer token, if any.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ------------------------------------------------------------------------
    // Public endpoints
    // ------------------------------------------------------------------------

    /// `GET /health`; returns the server's status message.
    pub async fn health(&self) -> Result<String> {
        let envelope: Envelope<serde_json::Value> =
            self.send(self.request(Method::GET, "/health")).await?;
        Ok(envelope.message.unwrap_or_default())
    }

    /// Register an account and keep its token.
    pub async fn register(&mut self, request: &RegisterRequest) -> Result<AuthResponse> {
        let auth: AuthResponse = self
            .data(
                "POST /api/auth/register",
                self.request(Method::POST, "/api/auth/register").json(request),
            )
            .await?;
        self.token = Some(auth.token.clone());
        Ok(auth)
    }

    /// Log in and keep the token.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<AuthResponse> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let auth: AuthResponse = self
            .data(
                "POST /api/auth/login",
                self.request(Method::POST, "/api/auth/login").json(&body),
            )
            .await?;
        self.token = Some(auth.token.clone());
        Ok(auth)
    }

    // ------------------------------------------------------------------------
    // Authenticated endpoints
    // ------------------------------------------------------------------------

    /// The logged-in user.
    pub async fn profile(&self) -> Result<PublicUser> {
        self.data(
            "GET /api/auth/profile",
            self.request(Method::GET, "/api/auth/profile"),
        )
        .await
    }

    /// All key issues with their input types.
    pub async fn key_issues(&self) -> Result<Vec<KeyIssue>> {
        self.data(
            "GET /api/projects/key-issues",
            self.request(Method::GET, "/api/projects/key-issues"),
        )
        .await
    }

    /// Submit a project. The server starts its evaluation.
    pub async fn create_project(&self, request: &CreateProjectRequest) -> Result<Project> {
        self.data(
            "POST /api/projects",
            self.request(Method::POST, "/api/projects").json(request),
        )
        .await
    }

    /// The user's projects, newest first.
    pub async fn list_projects(&self) -> Result<Vec<ProjectWithEvaluation>> {
        self.data("GET /api/projects", self.request(Method::GET, "/api/projects"))
            .await
    }

    /// One project with answers and evaluation.
    pub async fn get_project(&self, project_id: ProjectId) -> Result<ProjectWithEvaluation> {
        let path = format!("/api/projects/{project_id}");
        self.data(&format!("GET {path}"), self.request(Method::GET, &path))
            .await
    }

    /// Delete a project.
    pub async fn delete_project(&self, project_id: ProjectId) -> Result<()> {
        let path = format!("/api/projects/{project_id}");
        let _: Envelope<serde_json::Value> = self.send(self.request(Method::DELETE, &path)).await?;
        Ok(())
    }

    /// Re-run the evaluation of a project.
    pub async fn evaluate_project(&self, project_id: ProjectId) -> Result<EvaluationTriggered> {
        let path = format!("/api/projects/{project_id}/evaluate");
        self.data(&format!("POST {path}"), self.request(Method::POST, &path))
            .await
    }

    /// Dashboard statistics.
    pub async fn stats(&self) -> Result<ProjectStats> {
        self.data(
            "GET /api/projects/stats",
            self.request(Method::GET, "/api/projects/stats"),
        )
        .await
    }

    // ------------------------------------------------------------------------
    // Plumbing
    // ------------------------------------------------------------------------

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, self.url(path));
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<Envelope<T>> {
        let response = request.send().await?;
        let status = response.status();
        let decoded = response.json::<Envelope<T>>().await;

        if !status.is_success() {
            let message = match decoded {
                Ok(envelope) => envelope.message.unwrap_or_default(),
                Err(_) => status.canonical_reason().unwrap_or_default().to_string(),
            };
            tracing::debug!(status = status.as_u16(), %message, "API request failed");
            return Err(Error::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(decoded?)
    }

    async fn data<T: DeserializeOwned>(&self, what: &str, request: RequestBuilder) -> Result<T> {
        self.send(request)
            .await?
            .data
            .ok_or_else(|| Error::MissingData(what.to_string()))
    }
}
