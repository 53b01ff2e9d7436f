//! Shared helpers for HTTP-level tests

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use registre_server::{api, auth::USER_ID_HEADER, config::Config};
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt; // for `oneshot`
use uuid::Uuid;

pub fn setup_test_app(pool: PgPool) -> Router {
    api::create_router(pool, &Config::default())
}

pub async fn insert_user(pool: &PgPool, name: &str, email: &str, role: &str) -> Uuid {
    sqlx::query_scalar("INSERT INTO users (name, email, role) VALUES ($1, $2, $3) RETURNING id")
        .bind(name)
        .bind(email)
        .bind(role)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn admin(pool: &PgPool) -> Uuid {
    insert_user(pool, "Admin Principal", "admin@registre.cd", "admin").await
}

pub async fn agent(pool: &PgPool) -> Uuid {
    insert_user(pool, "Agent Kasongo", "agent@registre.cd", "agent").await
}

/// Send one request and decode the JSON body (`Value::Null` when empty)
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    user: Option<Uuid>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user) = user {
        builder = builder.header(USER_ID_HEADER, user.to_string());
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, json)
}

/// Ledger entries for one entity through the public API, newest first
pub async fn trail(app: &Router, user: Uuid, entity_type: &str, entity_id: &str) -> Vec<Value> {
    let (status, json) = send(
        app,
        Method::GET,
        &format!("/api/v1/audit-logs/{}/{}", entity_type, entity_id),
        Some(user),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    json["data"].as_array().unwrap().clone()
}
