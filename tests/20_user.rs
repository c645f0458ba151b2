mod common;

use anyhow::Result;
use futures::future::join_all;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn register_returns_user_without_password() -> Result<()> {
    let server = common::TestServer::start().await?;

    let (status, body) = server.register("Alice Donor", "alice@example.org", "secret123", false).await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "User registered successfully");

    let user = &body["data"];
    assert!(user["id"].as_i64().is_some());
    assert_eq!(user["name"], "Alice Donor");
    assert_eq!(user["email"], "alice@example.org");
    assert_eq!(user["is_organization"], false);
    assert!(user.get("password").is_none());
    assert!(user.get("password_hash").is_none());
    Ok(())
}

#[tokio::test]
async fn is_organization_defaults_to_false() -> Result<()> {
    let server = common::TestServer::start().await?;

    let res = server
        .client
        .post(server.api("/user/register"))
        .json(&json!({ "name": "Bob", "email": "bob@example.org", "password": "secret123" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = res.json().await?;
    assert_eq!(body["data"]["is_organization"], false);
    Ok(())
}

#[tokio::test]
async fn duplicate_email_is_rejected_and_first_account_survives() -> Result<()> {
    let server = common::TestServer::start().await?;

    let (status, first) = server.register("Alice", "alice@example.org", "secret123", false).await?;
    assert_eq!(status, StatusCode::CREATED);

    // Letter case does not make a different email.
    let (status, body) = server.register("Imposter", "ALICE@Example.org", "other-pass", true).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "message": "User already exists" }));

    let (status, body) = server.login("alice@example.org", "secret123").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["user"]["id"], first["data"]["id"]);
    assert_eq!(body["data"]["user"]["name"], "Alice");

    let (status, _) = server.login("alice@example.org", "other-pass").await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_duplicate_registrations_create_one_user() -> Result<()> {
    let server = common::TestServer::start().await?;

    let attempts = (0..6).map(|i| {
        let client = server.client.clone();
        let url = server.api("/user/register");
        async move {
            client
                .post(url)
                .json(&json!({
                    "name": format!("Racer {}", i),
                    "email": "race@example.org",
                    "password": "secret123",
                }))
                .send()
                .await
                .map(|res| res.status())
        }
    });

    let mut created = 0;
    let mut rejected = 0;
    for status in join_all(attempts).await {
        match status? {
            StatusCode::CREATED => created += 1,
            StatusCode::BAD_REQUEST => rejected += 1,
            other => panic!("unexpected status {}", other),
        }
    }
    assert_eq!(created, 1);
    assert_eq!(rejected, 5);
    Ok(())
}

#[tokio::test]
async fn login_token_resolves_to_same_user() -> Result<()> {
    let server = common::TestServer::start().await?;
    server.register("Carol", "carol@example.org", "secret123", true).await?;

    let (status, body) = server.login("Carol@Example.org", "secret123").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Login successful");
    assert_eq!(body["data"]["token_type"], "Bearer");
    assert!(body["data"]["expires_in"].as_i64().unwrap() > 0);

    let token = body["data"]["access_token"].as_str().unwrap();
    let res = server.client.get(server.api("/user/me")).bearer_auth(token).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let me: Value = res.json().await?;
    assert_eq!(me["data"]["id"], body["data"]["user"]["id"]);
    assert_eq!(me["data"]["email"], "carol@example.org");
    Ok(())
}

#[tokio::test]
async fn wrong_password_and_unknown_email_look_identical() -> Result<()> {
    let server = common::TestServer::start().await?;
    server.register("Dave", "dave@example.org", "secret123", false).await?;

    let (wrong_status, wrong_body) = server.login("dave@example.org", "not-his-password").await?;
    let (unknown_status, unknown_body) = server.login("nobody@example.org", "secret123").await?;

    assert_eq!(wrong_status, StatusCode::BAD_REQUEST);
    assert_eq!(wrong_status, unknown_status);
    assert_eq!(wrong_body, unknown_body);
    assert_eq!(wrong_body, json!({ "message": "Invalid email or password" }));
    Ok(())
}

#[tokio::test]
async fn register_reports_every_field_error() -> Result<()> {
    let server = common::TestServer::start().await?;

    let res = server
        .client
        .post(server.api("/user/register"))
        .json(&json!({ "name": "Al", "email": "not-an-email", "password": "123", "role": "admin" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body: Value = res.json().await?;
    assert_eq!(body["message"], "Invalid request body");
    assert_eq!(body["data"]["name"], json!(["Shorter than minimum length 3."]));
    assert_eq!(body["data"]["email"], json!(["Not a valid email address."]));
    assert_eq!(body["data"]["password"], json!(["Shorter than minimum length 6."]));
    assert_eq!(body["data"]["role"], json!(["Unknown field."]));
    Ok(())
}

#[tokio::test]
async fn blank_or_padded_name_is_rejected_not_stored_empty() -> Result<()> {
    let server = common::TestServer::start().await?;

    for (name, email) in [("     ", "blank@example.org"), ("  Al  ", "padded@example.org")] {
        let (status, body) = server.register(name, email, "secret123", false).await?;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["data"]["name"],
            json!(["Must not be blank or padded with whitespace."])
        );

        // Nothing was stored under that email.
        let (status, _) = server.login(email, "secret123").await?;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
    Ok(())
}

#[tokio::test]
async fn malformed_json_is_a_validation_error() -> Result<()> {
    let server = common::TestServer::start().await?;

    let res = server
        .client
        .post(server.api("/user/login"))
        .header("content-type", "application/json")
        .body("{\"email\": ")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await?;
    assert_eq!(body["data"]["_schema"], json!(["Invalid JSON body."]));
    Ok(())
}

#[tokio::test]
async fn me_requires_a_usable_token() -> Result<()> {
    let server = common::TestServer::start().await?;

    let res = server.client.get(server.api("/user/me")).send().await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(res.headers()["www-authenticate"], "Bearer");
    let body: Value = res.json().await?;
    assert_eq!(body["message"], "Missing Authorization header");

    let res = server
        .client
        .get(server.api("/user/me"))
        .bearer_auth("not.a.jwt")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = res.json().await?;
    assert_eq!(body["message"], "Invalid token");
    Ok(())
}

#[tokio::test]
async fn token_from_another_secret_is_rejected() -> Result<()> {
    let server = common::TestServer::start().await?;
    let (user_id, _) = server.account("Erin", "erin@example.org", false).await?;

    let forged = donation_api::auth::TokenIssuer::new(
        "some-other-secret-that-is-long-enough",
        chrono::Duration::hours(1),
    )
    .issue(user_id)?;

    let res = server
        .client
        .get(server.api("/user/me"))
        .bearer_auth(&forged.access_token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}
