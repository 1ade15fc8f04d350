use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use usersvc::{
    app::build_app,
    config::{AppConfig, JwtConfig},
    state::AppState,
};

pub const PASSWORD: &str = "correct-horse-battery";

pub fn test_config() -> AppConfig {
    AppConfig {
        database_url: "sqlite::memory:".into(),
        host: "127.0.0.1".into(),
        port: 0,
        jwt: JwtConfig {
            secret: "integration-secret".into(),
            issuer: "usersvc-test".into(),
            audience: "usersvc-test-clients".into(),
            ttl_minutes: 5,
            refresh_ttl_minutes: 60,
        },
    }
}

/// A fresh app over its own in-memory store.
pub async fn setup_test_app() -> Router {
    let state = AppState::from_config(test_config())
        .await
        .expect("in-memory state should initialize");
    build_app(state)
}

pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(t) = token {
        builder = builder.header("authorization", format!("Bearer {t}"));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).unwrap())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

pub async fn create_user(app: &Router, name: &str, email: &str) -> Value {
    let (status, json) = send(
        app,
        "POST",
        "/users",
        None,
        Some(serde_json::json!({ "name": name, "email": email, "password": PASSWORD })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create_user failed: {json}");
    json
}

pub async fn login(app: &Router, email: &str) -> Value {
    let (status, json) = send(
        app,
        "POST",
        "/login",
        None,
        Some(serde_json::json!({ "email": email, "password": PASSWORD })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {json}");
    json
}

/// Register a user and return an access token for it.
pub async fn token_for(app: &Router, email: &str) -> String {
    create_user(app, "Test User", email).await;
    login(app, email).await["access_token"]
        .as_str()
        .unwrap()
        .to_string()
}
