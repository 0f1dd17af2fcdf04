//! 路由注册
//! 创建所有 API 路由并应用中间件

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::limit::RequestBodyLimitLayer;

use crate::{
    auth::{access_policy_middleware, authentication_gate, AccessPolicy},
    handlers,
    middleware::AppState,
};

/// 创建应用路由
///
/// 中间件顺序（由外到内）：请求追踪 → 请求体限制 → 认证闸门 → 访问策略 → 处理器。
/// 未匹配路由同样经过闸门与策略，匿名访问返回 403。
pub fn create_router(state: Arc<AppState>) -> Router {
    let policy = Arc::new(AccessPolicy::standard());

    // 认证路由（公开）
    let auth_routes = Router::new()
        .route("/api/auth/register", post(handlers::auth::register))
        .route("/api/auth/login", post(handlers::auth::login));

    // 用户路由（需要身份）
    let user_routes = Router::new()
        .route("/api/users/me", get(handlers::user::me))
        .route("/api/users/update/{id}", put(handlers::user::update_user))
        .route("/api/users/{id}", delete(handlers::user::delete_user));

    Router::new()
        .merge(auth_routes)
        .merge(user_routes)
        .fallback(handlers::not_found)
        .layer(axum::middleware::from_fn_with_state(
            policy,
            access_policy_middleware,
        ))
        .layer(axum::middleware::from_fn_with_state(
            state.token_codec.clone(),
            authentication_gate,
        ))
        .layer(RequestBodyLimitLayer::new(state.config.server.max_body_bytes))
        .layer(axum::middleware::from_fn(crate::middleware::request_tracking_middleware))
        .with_state(state)
}
