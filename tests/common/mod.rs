//! 测试公共模块
//! 提供测试配置、应用状态与请求辅助函数

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use secrecy::Secret;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;
use user_service::{
    auth::{PasswordHasher, TokenCodec},
    config::{AppConfig, DatabaseConfig, LoggingConfig, SecurityConfig, ServerConfig},
    middleware::AppState,
    repository::InMemoryUserStore,
    services::UserService,
};

pub const TEST_SECRET: &str = "test-secret-key-for-testing-only-min-32-chars";

/// 创建测试配置
pub fn create_test_config() -> AppConfig {
    AppConfig {
        server: ServerConfig {
            addr: "127.0.0.1:0".to_string(),
            graceful_shutdown_timeout_secs: 5,
            max_body_bytes: 16 * 1024,
        },
        database: DatabaseConfig {
            url: None,
            max_connections: 5,
            min_connections: 1,
            acquire_timeout_secs: 5,
        },
        logging: LoggingConfig {
            level: "debug".to_string(),
            format: "pretty".to_string(),
        },
        security: SecurityConfig {
            jwt_secret: Secret::new(TEST_SECRET.to_string()),
            token_ttl_secs: 86400,
        },
    }
}

/// 创建测试应用状态（内存存储 + 低成本哈希参数）
pub fn create_test_app_state() -> Arc<AppState> {
    let config = create_test_config();
    let token_codec =
        Arc::new(TokenCodec::from_config(&config).expect("Failed to create token codec"));
    let user_service = Arc::new(UserService::new(
        Arc::new(InMemoryUserStore::new()),
        PasswordHasher::with_params(8, 1, 1).expect("Invalid test hasher params"),
        token_codec.clone(),
    ));

    Arc::new(AppState {
        config,
        token_codec,
        user_service,
    })
}

pub fn create_test_app() -> (Router, Arc<AppState>) {
    let state = create_test_app_state();
    (user_service::routes::create_router(state.clone()), state)
}

/// 发送请求并解析 JSON 响应体（非 JSON 时返回 Null）
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    send_request(app, builder.body(body).unwrap()).await
}

pub async fn send_request(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

    (status, json)
}

/// 注册并登录，返回令牌
pub async fn register_and_login(app: &Router, name: &str, email: &str, password: &str) -> String {
    let (status, _) = send(
        app,
        "POST",
        "/api/auth/register",
        None,
        Some(serde_json::json!({"name": name, "email": email, "password": password})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        app,
        "POST",
        "/api/auth/login",
        None,
        Some(serde_json::json!({"email": email, "password": password})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    body["token"].as_str().expect("token in login response").to_string()
}
