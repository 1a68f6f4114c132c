mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
async fn protected_routes_require_bearer_token() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    // No Authorization header at all; rejected before any database access
    let res = client.get(format!("{}/posts", server.base_url)).send().await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["code"], "UNAUTHORIZED");
    Ok(())
}

#[tokio::test]
async fn malformed_credentials_are_rejected() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    // Wrong scheme
    let res = client
        .get(format!("{}/posts", server.base_url))
        .header("Authorization", "Basic dXNlcjpwYXNz")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    // Bearer, but not a JWT
    let res = client
        .get(format!("{}/posts", server.base_url))
        .bearer_auth("not-a-valid-token")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn register_then_login_round_trip() -> Result<()> {
    let server = common::ensure_server().await?;
    if !common::db_ready(server).await? {
        eprintln!("skipping register_then_login_round_trip: database unavailable");
        return Ok(());
    }
    let client = reqwest::Client::new();

    let email = common::unique_email("round-trip");
    let res = client
        .post(format!("{}/users", server.base_url))
        .json(&json!({ "email": email, "password": "correct-horse" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["data"]["email"], email.as_str());
    // The digest must never appear in a response
    assert!(body["data"].get("password").is_none(), "password leaked: {}", body);

    let res = client
        .post(format!("{}/login", server.base_url))
        .json(&json!({ "email": email, "password": "correct-horse" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["data"]["token_type"], "bearer");
    let token = body["data"]["access_token"].as_str().unwrap().to_string();

    // The issued token resolves back to the same account
    let res = client
        .get(format!("{}/whoami", server.base_url))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["data"]["email"], email.as_str());
    Ok(())
}

#[tokio::test]
async fn bad_credentials_yield_the_same_unauthorized() -> Result<()> {
    let server = common::ensure_server().await?;
    if !common::db_ready(server).await? {
        eprintln!("skipping bad_credentials_yield_the_same_unauthorized: database unavailable");
        return Ok(());
    }
    let client = reqwest::Client::new();

    let email = common::unique_email("bad-creds");
    let (_user, _token) =
        common::register_and_login(&client, &server.base_url, &email, "correct-horse").await?;

    // Wrong password
    let res = client
        .post(format!("{}/login", server.base_url))
        .json(&json!({ "email": email, "password": "wrong-horse" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let wrong_password = res.json::<serde_json::Value>().await?;

    // Unknown email; indistinguishable from the wrong-password case
    let res = client
        .post(format!("{}/login", server.base_url))
        .json(&json!({ "email": common::unique_email("never-registered"), "password": "correct-horse" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let unknown_email = res.json::<serde_json::Value>().await?;

    assert_eq!(wrong_password["message"], unknown_email["message"]);
    Ok(())
}

#[tokio::test]
async fn duplicate_email_is_a_conflict() -> Result<()> {
    let server = common::ensure_server().await?;
    if !common::db_ready(server).await? {
        eprintln!("skipping duplicate_email_is_a_conflict: database unavailable");
        return Ok(());
    }
    let client = reqwest::Client::new();

    let email = common::unique_email("duplicate");
    let payload = json!({ "email": email, "password": "correct-horse" });

    let res = client.post(format!("{}/users", server.base_url)).json(&payload).send().await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = client.post(format!("{}/users", server.base_url)).json(&payload).send().await?;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    Ok(())
}

#[tokio::test]
async fn invalid_registration_input_is_rejected() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    // Validation runs before any database access, so no gating needed
    let res = client
        .post(format!("{}/users", server.base_url))
        .json(&json!({ "email": "not-an-email", "password": "short" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(body["field_errors"].get("email").is_some());
    assert!(body["field_errors"].get("password").is_some());
    Ok(())
}
