mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn health_endpoint_responds() -> Result<()> {
    let server = common::TestServer::start().await?;

    let res = server.client.get(format!("{}/health", server.base_url)).send().await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = res.json().await?;
    assert_eq!(body["message"], "Service healthy");
    assert_eq!(body["data"]["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn root_describes_service() -> Result<()> {
    let server = common::TestServer::start().await?;

    let res = server.client.get(format!("{}/", server.base_url)).send().await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = res.json().await?;
    assert_eq!(body["data"]["name"], "donation-api");
    assert!(body["data"]["endpoints"].is_object());
    Ok(())
}

#[tokio::test]
async fn unknown_route_is_enveloped_404() -> Result<()> {
    let server = common::TestServer::start().await?;

    for url in [
        format!("{}/nope", server.base_url),
        server.api("/nope"),
    ] {
        let res = server.client.get(url).send().await?;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let body: Value = res.json().await?;
        assert_eq!(body, json!({ "message": "Not found" }));
    }
    Ok(())
}

#[tokio::test]
async fn responses_carry_request_id() -> Result<()> {
    let server = common::TestServer::start().await?;

    let res = server.client.get(format!("{}/health", server.base_url)).send().await?;
    assert!(res.headers().contains_key("x-request-id"));

    let res = server
        .client
        .get(format!("{}/health", server.base_url))
        .header("x-request-id", "trace-me-123")
        .send()
        .await?;
    assert_eq!(res.headers()["x-request-id"], "trace-me-123");
    Ok(())
}

#[tokio::test]
async fn oversized_body_is_413() -> Result<()> {
    let mut config = donation_api::config::AppConfig::development();
    config.api.max_request_size_bytes = 64;
    let server = common::TestServer::start_with(config).await?;

    let res = server
        .client
        .post(server.api("/user/register"))
        .header("content-type", "application/json")
        .body(format!("{{\"name\": \"{}\"}}", "x".repeat(256)))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let body: Value = res.json().await?;
    assert_eq!(body["message"], "Request body too large");
    Ok(())
}
