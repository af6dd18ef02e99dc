mod common;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::json;

use common::{registration, TestApp, PASSWORD};

#[tokio::test]
async fn register_returns_record_without_password() -> Result<()> {
    let app = TestApp::new();
    let res = app.post("/users", None, registration("a")).await?;

    assert_eq!(res.status, StatusCode::CREATED);
    assert_eq!(res.body["message"], "User created successfully");
    let user = &res.body["data"];
    assert_eq!(user["id"], 1);
    assert_eq!(user["email"], "a@x.com");
    assert_eq!(user["is_active"], true);
    assert!(user.get("password").is_none());
    assert!(user.get("is_deleted").is_none());
    Ok(())
}

#[tokio::test]
async fn duplicate_email_is_rejected() -> Result<()> {
    let app = TestApp::new();
    app.register("a").await?;

    let mut again = registration("a");
    again["username"] = json!("other");
    let res = app.post("/users", None, again).await?;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["message"], "Email already exists");
    assert_eq!(res.body["error"], "CONFLICT");
    Ok(())
}

#[tokio::test]
async fn missing_fields_are_listed() -> Result<()> {
    let app = TestApp::new();
    let res = app.post("/users", None, json!({ "email": "bad" })).await?;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["message"], "Validation failed");
    assert_eq!(
        res.body["error"],
        json!([
            "invalid email",
            "username is required",
            "first_name is required",
            "last_name is required",
            "password is required",
        ])
    );
    Ok(())
}

#[tokio::test]
async fn login_returns_token_pair() -> Result<()> {
    let app = TestApp::new();
    app.register("a").await?;

    let res = app
        .post("/users/login", None, json!({ "email": "a@x.com", "password": PASSWORD }))
        .await?;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["message"], "Login successful");
    assert!(res.body["data"]["access"].as_str().is_some());
    assert!(res.body["data"]["refresh"].as_str().is_some());
    assert_eq!(res.body["data"]["expires_in"], 15 * 60);
    Ok(())
}

#[tokio::test]
async fn wrong_password_is_401() -> Result<()> {
    let app = TestApp::new();
    app.register("a").await?;

    let res = app
        .post("/users/login", None, json!({ "email": "a@x.com", "password": "wrong" }))
        .await?;

    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.body["message"], "Invalid email or password");
    Ok(())
}

#[tokio::test]
async fn refresh_token_buys_new_pair_but_cannot_authenticate() -> Result<()> {
    let app = TestApp::new();
    app.register("a").await?;
    let login = app.login("a").await?;
    let refresh = login["refresh"].as_str().unwrap_or_default();

    let res = app.post("/users/refresh", None, json!({ "refresh": refresh })).await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["message"], "Tokens refreshed successfully");

    let res = app.get("/posts", Some(refresh)).await?;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);

    let access = login["access"].as_str().unwrap_or_default();
    let res = app.post("/users/refresh", None, json!({ "refresh": access })).await?;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn list_is_public() -> Result<()> {
    let app = TestApp::new();
    app.register("a").await?;
    app.register("b").await?;

    let res = app.get("/users", None).await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["data"].as_array().map(Vec::len), Some(2));
    Ok(())
}

#[tokio::test]
async fn users_only_see_themselves() -> Result<()> {
    let app = TestApp::new();
    let (a, a_token) = app.signup("a").await?;
    let (b, _) = app.signup("b").await?;

    let res = app.get(&format!("/users/{}", a), Some(&a_token)).await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["data"]["username"], "a");

    let res = app.get(&format!("/users/{}", b), Some(&a_token)).await?;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
    assert_eq!(res.body["error"], "FORBIDDEN");
    Ok(())
}

#[tokio::test]
async fn non_numeric_id_is_400() -> Result<()> {
    let app = TestApp::new();
    let (_, token) = app.signup("a").await?;

    let res = app.get("/users/abc", Some(&token)).await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["message"], "Invalid identifier");
    Ok(())
}

#[tokio::test]
async fn update_changes_only_given_fields() -> Result<()> {
    let app = TestApp::new();
    let (a, token) = app.signup("a").await?;

    let res = app
        .put(&format!("/users/{}", a), Some(&token), json!({ "first_name": "Z" }))
        .await?;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["message"], "User updated successfully");
    assert_eq!(res.body["data"]["first_name"], "Z");
    assert_eq!(res.body["data"]["last_name"], "B");
    assert_eq!(res.body["data"]["email"], "a@x.com");
    Ok(())
}

#[tokio::test]
async fn update_cannot_steal_an_email() -> Result<()> {
    let app = TestApp::new();
    let (a, token) = app.signup("a").await?;
    app.register("b").await?;

    let res = app
        .put(&format!("/users/{}", a), Some(&token), json!({ "email": "b@x.com" }))
        .await?;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["message"], "Email already exists");
    Ok(())
}

#[tokio::test]
async fn delete_is_soft_and_final() -> Result<()> {
    let app = TestApp::new();
    let (a, token) = app.signup("a").await?;

    let res = app.delete(&format!("/users/{}", a), Some(&token)).await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["message"], "User deleted successfully");
    assert_eq!(res.body["data"]["is_active"], true);

    let res = app.get("/users", None).await?;
    assert_eq!(res.body["data"], json!([]));

    // The token is still valid until expiry, but the record is gone
    let res = app.get(&format!("/users/{}", a), Some(&token)).await?;
    assert_eq!(res.status, StatusCode::NOT_FOUND);

    let res = app
        .post("/users/login", None, json!({ "email": "a@x.com", "password": PASSWORD }))
        .await?;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);

    // Email and username are free again
    app.register("a").await?;
    Ok(())
}
