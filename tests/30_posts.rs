mod common;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::{json, Value};

use common::TestApp;

async fn create_post(app: &TestApp, token: &str, title: &str) -> Result<Value> {
    let res = app
        .post("/posts", Some(token), json!({ "title": title, "content": "body" }))
        .await?;
    anyhow::ensure!(res.status == StatusCode::CREATED, "create failed: {}", res.body);
    Ok(res.body["data"].clone())
}

#[tokio::test]
async fn create_assigns_caller_as_owner() -> Result<()> {
    let app = TestApp::new();
    let (a, token) = app.signup("a").await?;

    let res = app
        .post("/posts", Some(&token), json!({ "title": "Hello", "content": "World", "user_id": 999 }))
        .await?;

    assert_eq!(res.status, StatusCode::CREATED);
    assert_eq!(res.body["message"], "Post created successfully");
    assert_eq!(res.body["data"]["user_id"], a);
    assert_eq!(res.body["data"]["title"], "Hello");
    Ok(())
}

#[tokio::test]
async fn create_requires_title_and_content() -> Result<()> {
    let app = TestApp::new();
    let (_, token) = app.signup("a").await?;

    let res = app.post("/posts", Some(&token), json!({})).await?;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["error"], json!(["title is required", "content is required"]));
    Ok(())
}

#[tokio::test]
async fn list_shows_all_authors() -> Result<()> {
    let app = TestApp::new();
    let (_, a) = app.signup("a").await?;
    let (_, b) = app.signup("b").await?;
    create_post(&app, &a, "from a").await?;
    create_post(&app, &b, "from b").await?;

    let res = app.get("/posts", Some(&a)).await?;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["message"], "Posts fetched successfully");
    assert_eq!(res.body["data"].as_array().map(Vec::len), Some(2));
    Ok(())
}

#[tokio::test]
async fn other_users_are_forbidden() -> Result<()> {
    let app = TestApp::new();
    let (_, a) = app.signup("a").await?;
    let (_, b) = app.signup("b").await?;
    let post = create_post(&app, &a, "mine").await?;
    let uri = format!("/posts/{}", post["id"]);

    let res = app.get(&uri, Some(&b)).await?;
    assert_eq!(res.status, StatusCode::FORBIDDEN);

    let res = app.put(&uri, Some(&b), json!({ "title": "theirs" })).await?;
    assert_eq!(res.status, StatusCode::FORBIDDEN);

    let res = app.put(&format!("{}/delete", uri), Some(&b), json!({})).await?;
    assert_eq!(res.status, StatusCode::FORBIDDEN);

    // Still intact for the owner
    let res = app.get(&uri, Some(&a)).await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["data"]["title"], "mine");
    Ok(())
}

#[tokio::test]
async fn owner_can_update() -> Result<()> {
    let app = TestApp::new();
    let (_, a) = app.signup("a").await?;
    let post = create_post(&app, &a, "draft").await?;

    let res = app
        .put(&format!("/posts/{}", post["id"]), Some(&a), json!({ "title": "final" }))
        .await?;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["message"], "Post updated successfully");
    assert_eq!(res.body["data"]["title"], "final");
    assert_eq!(res.body["data"]["content"], "body");
    Ok(())
}

#[tokio::test]
async fn missing_post_is_404_even_for_strangers() -> Result<()> {
    let app = TestApp::new();
    let (_, a) = app.signup("a").await?;

    let res = app.get("/posts/42", Some(&a)).await?;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.body["message"], "Post not found");
    Ok(())
}

#[tokio::test]
async fn deleted_posts_are_gone() -> Result<()> {
    let app = TestApp::new();
    let (_, a) = app.signup("a").await?;
    let post = create_post(&app, &a, "short-lived").await?;
    let uri = format!("/posts/{}", post["id"]);

    let res = app.put(&format!("{}/delete", uri), Some(&a), json!({})).await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["message"], "Post deleted successfully");
    assert_eq!(res.body["data"]["title"], "short-lived");

    let res = app.get("/posts", Some(&a)).await?;
    assert_eq!(res.body["data"], json!([]));

    let res = app.get(&uri, Some(&a)).await?;
    assert_eq!(res.status, StatusCode::NOT_FOUND);

    let res = app.put(&uri, Some(&a), json!({ "title": "again" })).await?;
    assert_eq!(res.status, StatusCode::NOT_FOUND);

    let res = app.put(&format!("{}/delete", uri), Some(&a), json!({})).await?;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    Ok(())
}
