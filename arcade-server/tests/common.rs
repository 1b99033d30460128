use std::{sync::Arc, time::Duration};

use anyhow::Result;
use arcade_core::PostgresDatabase;
use arcade_server::{
    AppState, create_app,
    infra::config::{Config, DatabaseConfig, ServerConfig},
};
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
    response::Response,
};
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;

pub fn test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        database: DatabaseConfig {
            url: String::new(),
            max_connections: 5,
            min_connections: 0,
            max_idle_time: Duration::from_secs(60),
            query_timeout: Duration::from_secs(3),
        },
        environment: "testing".to_string(),
        cors_allowed_origins: Vec::new(),
    }
}

pub fn test_app(pool: PgPool) -> Router {
    let db = PostgresDatabase::from_pool(pool);
    create_app(AppState::from_database(&db, Arc::new(test_config())))
}

// Not every test binary uses every helper.
#[allow(unused)]
pub fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("valid request")
}

#[allow(unused)]
pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("valid request")
}

pub async fn send(app: &Router, request: Request<Body>) -> Result<(StatusCode, Value)> {
    let response: Response = app.clone().oneshot(request).await?;
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)?
    };
    Ok((status, body))
}
