#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::{json, Value};
use tokio::task::JoinHandle;

use donation_api::config::AppConfig;
use donation_api::database::MemoryStore;
use donation_api::{app, AppState};

/// In-process server on a free port, backed by a fresh in-memory store.
/// Each test gets its own, so tests never see each other's rows.
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub client: reqwest::Client,
    handle: JoinHandle<()>,
}

impl TestServer {
    pub async fn start() -> Result<Self> {
        Self::start_with(AppConfig::development()).await
    }

    pub async fn start_with(config: AppConfig) -> Result<Self> {
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .context("failed to bind test listener")?;
        let router = app(AppState::new(Arc::new(MemoryStore::new()), config));

        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        Ok(Self {
            port,
            base_url,
            client: reqwest::Client::new(),
            handle,
        })
    }

    /// URL under the versioned API prefix
    pub fn api(&self, path: &str) -> String {
        format!("{}/api/v1{}", self.base_url, path)
    }

    pub async fn register(&self, name: &str, email: &str, password: &str, is_organization: bool) -> Result<(StatusCode, Value)> {
        let res = self
            .client
            .post(self.api("/user/register"))
            .json(&json!({
                "name": name,
                "email": email,
                "password": password,
                "is_organization": is_organization,
            }))
            .send()
            .await?;
        Ok((res.status(), res.json().await?))
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<(StatusCode, Value)> {
        let res = self
            .client
            .post(self.api("/user/login"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;
        Ok((res.status(), res.json().await?))
    }

    /// Register and log in, returning `(user_id, token)`.
    pub async fn account(&self, name: &str, email: &str, is_organization: bool) -> Result<(i64, String)> {
        let (status, body) = self.register(name, email, "secret123", is_organization).await?;
        anyhow::ensure!(status == StatusCode::CREATED, "register failed: {} {}", status, body);
        let user_id = body["data"]["id"].as_i64().context("user id missing")?;

        let (status, body) = self.login(email, "secret123").await?;
        anyhow::ensure!(status == StatusCode::OK, "login failed: {} {}", status, body);
        let token = body["data"]["access_token"]
            .as_str()
            .context("access_token missing")?
            .to_string();
        Ok((user_id, token))
    }

    /// Create an organization as `token`, returning its id.
    pub async fn organization(&self, token: &str, name: &str) -> Result<i64> {
        let res = self
            .client
            .post(self.api("/organization/"))
            .bearer_auth(token)
            .json(&json!({
                "name": name,
                "description": format!("{} serves the community", name),
                "email": "contact@example.org",
            }))
            .send()
            .await?;
        let status = res.status();
        let body: Value = res.json().await?;
        anyhow::ensure!(status == StatusCode::CREATED, "create organization failed: {} {}", status, body);
        body["data"]["id"].as_i64().context("organization id missing")
    }

    /// Create a food/open requirement for `organization_id`, returning its id.
    pub async fn requirement(&self, token: &str, organization_id: i64, description: &str) -> Result<i64> {
        let res = self
            .client
            .post(self.api("/requirement/"))
            .bearer_auth(token)
            .json(&json!({
                "organization_id": organization_id,
                "type_id": 1,
                "status_id": 1,
                "description": description,
                "quantity": 10,
            }))
            .send()
            .await?;
        let status = res.status();
        let body: Value = res.json().await?;
        anyhow::ensure!(status == StatusCode::CREATED, "create requirement failed: {} {}", status, body);
        body["data"]["id"].as_i64().context("requirement id missing")
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
