mod common;

use anyhow::Result;
use common::{bearer_token, ensure_server, TEST_ADMIN_EMAIL};
use reqwest::StatusCode;
use serde_json::Value;

#[tokio::test]
async fn whoami_without_token_is_unauthorized() -> Result<()> {
    let server = ensure_server().await?;
    let client = reqwest::Client::new();

    let resp = client
        .get(format!("{}/auth/whoami", server.base_url))
        .send()
        .await?;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = resp.json().await?;
    assert_eq!(body["success"], Value::Bool(false));
    assert_eq!(body["code"], "UNAUTHORIZED");
    Ok(())
}

#[tokio::test]
async fn whoami_reports_admin_flag_from_allow_list() -> Result<()> {
    let server = ensure_server().await?;
    let client = reqwest::Client::new();

    let resp = client
        .get(format!("{}/auth/whoami", server.base_url))
        .bearer_auth(bearer_token(TEST_ADMIN_EMAIL))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await?;
    assert_eq!(body["data"]["email"], TEST_ADMIN_EMAIL);
    assert_eq!(body["data"]["is_admin"], Value::Bool(true));

    let resp = client
        .get(format!("{}/auth/whoami", server.base_url))
        .bearer_auth(bearer_token("visitor@example.com"))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await?;
    assert_eq!(body["data"]["is_admin"], Value::Bool(false));
    Ok(())
}

#[tokio::test]
async fn garbage_token_is_unauthorized() -> Result<()> {
    let server = ensure_server().await?;
    let client = reqwest::Client::new();

    let resp = client
        .get(format!("{}/auth/whoami", server.base_url))
        .bearer_auth("not-a-jwt")
        .send()
        .await?;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn login_requires_email_and_password() -> Result<()> {
    let server = ensure_server().await?;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{}/auth/login", server.base_url))
        .json(&serde_json::json!({ "email": "", "password": "" }))
        .send()
        .await?;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn logout_acknowledges_an_authenticated_session() -> Result<()> {
    let server = ensure_server().await?;
    let client = reqwest::Client::new();

    let resp = client
        .delete(format!("{}/auth/session", server.base_url))
        .bearer_auth(bearer_token(TEST_ADMIN_EMAIL))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .delete(format!("{}/auth/session", server.base_url))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}
