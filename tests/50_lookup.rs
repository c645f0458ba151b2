mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn types_and_statuses_are_seeded() -> Result<()> {
    let server = common::TestServer::start().await?;

    let res = server.client.get(server.api("/type/")).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["food", "clothing", "medical", "education", "money"]);
    assert_eq!(body["data"][0]["id"], 1);

    let body: Value = server.client.get(server.api("/status/")).send().await?.json().await?;
    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["open", "in_progress", "fulfilled", "closed"]);
    Ok(())
}

#[tokio::test]
async fn donations_are_readable() -> Result<()> {
    let server = common::TestServer::start().await?;

    let res = server.client.get(server.api("/donation/")).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body, json!({ "message": "Donations retrieved successfully", "data": [] }));

    let res = server.client.get(server.api("/donation/?organization=1")).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    Ok(())
}
