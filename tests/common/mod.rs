#![allow(dead_code)]

use std::sync::{Arc, OnceLock};

use anyhow::{Context, Result};
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::Duration;
use serde_json::{json, Value};
use tower::ServiceExt;

use posts_api::auth::TokenCodec;
use posts_api::config::AppConfig;
use posts_api::database::MemoryStorage;
use posts_api::AppState;

pub const TEST_SECRET: &str = "integration-test-secret";
pub const PASSWORD: &str = "secret";

static TRACING: OnceLock<()> = OnceLock::new();

/// A full router over a fresh in-memory store. Each test gets its own.
pub struct TestApp {
    router: Router,
}

pub struct Reply {
    pub status: StatusCode,
    pub body: Value,
}

impl TestApp {
    pub fn new() -> Self {
        TRACING.get_or_init(|| {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::new("posts_api=debug"))
                .with_test_writer()
                .try_init();
        });

        let tokens = TokenCodec::new(TEST_SECRET, Duration::minutes(15), Duration::days(7))
            .expect("test token codec");
        let state = AppState::new(Arc::new(MemoryStorage::new()), tokens);
        let router = posts_api::app(state, &AppConfig::development());
        Self { router }
    }

    pub async fn send(&self, request: Request<Body>) -> Result<Reply> {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .context("router failed")?;

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await?;
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).with_context(|| {
                format!("response is not JSON: {}", String::from_utf8_lossy(&bytes))
            })?
        };
        Ok(Reply { status, body })
    }

    pub async fn call(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Result<Reply> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))?,
            None => builder.body(Body::empty())?,
        };
        self.send(request).await
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> Result<Reply> {
        self.call(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> Result<Reply> {
        self.call(Method::POST, uri, token, Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: Option<&str>, body: Value) -> Result<Reply> {
        self.call(Method::PUT, uri, token, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> Result<Reply> {
        self.call(Method::DELETE, uri, token, None).await
    }

    /// Register `<name>@x.com` / username `<name>`; returns the created record.
    pub async fn register(&self, name: &str) -> Result<Value> {
        let reply = self.post("/users", None, registration(name)).await?;
        anyhow::ensure!(reply.status == StatusCode::CREATED, "register {} failed: {}", name, reply.body);
        Ok(reply.body["data"].clone())
    }

    /// Login data (`access`, `refresh`, profile) for a registered user.
    pub async fn login(&self, name: &str) -> Result<Value> {
        let reply = self
            .post("/users/login", None, json!({ "email": email(name), "password": PASSWORD }))
            .await?;
        anyhow::ensure!(reply.status == StatusCode::OK, "login {} failed: {}", name, reply.body);
        Ok(reply.body["data"].clone())
    }

    /// Register and log in; returns the user id and an access token.
    pub async fn signup(&self, name: &str) -> Result<(i64, String)> {
        let user = self.register(name).await?;
        let login = self.login(name).await?;
        let id = user["id"].as_i64().context("user id")?;
        let access = login["access"].as_str().context("access token")?.to_string();
        Ok((id, access))
    }
}

pub fn email(name: &str) -> String {
    format!("{}@x.com", name)
}

pub fn registration(name: &str) -> Value {
    json!({
        "email": email(name),
        "username": name,
        "first_name": "A",
        "last_name": "B",
        "password": PASSWORD,
    })
}
