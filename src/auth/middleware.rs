//! 认证闸门中间件
//! 每个请求运行一次：解析 Bearer 令牌并把结果写入请求扩展，从不拦截请求

use crate::{auth::jwt::TokenCodec, error::AppError};
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use chrono::{DateTime, Utc};
use std::{convert::Infallible, sync::Arc};

const BEARER_PREFIX: &str = "Bearer ";

/// 请求级认证上下文（附加到请求扩展）
///
/// 每个请求新建一份，由闸门写入一次，请求结束即丢弃。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestAuthContext {
    identity: Option<String>,
}

impl RequestAuthContext {
    pub fn anonymous() -> Self {
        Self { identity: None }
    }

    pub fn authenticated(identity: String) -> Self {
        Self {
            identity: Some(identity),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    pub fn identity(&self) -> Option<&str> {
        self.identity.as_deref()
    }
}

// 闸门之外调用时视为匿名
impl<S> FromRequestParts<S> for RequestAuthContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<RequestAuthContext>()
            .cloned()
            .unwrap_or_default())
    }
}

/// 已认证调用者的身份（邮箱），匿名请求返回 403
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser(pub String);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<RequestAuthContext>()
            .and_then(|ctx| ctx.identity())
            .map(|identity| CurrentUser(identity.to_string()))
            .ok_or(AppError::Forbidden)
    }
}

/// 从 Authorization 头提取令牌（区分大小写的 "Bearer " 前缀）
pub fn extract_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix(BEARER_PREFIX))
}

/// 根据请求头解析认证上下文
///
/// 任何校验失败都折叠为匿名，具体原因只写入 debug 日志。
pub fn resolve_auth_context(
    headers: &HeaderMap,
    codec: &TokenCodec,
    now: DateTime<Utc>,
) -> RequestAuthContext {
    let Some(token) = extract_token(headers) else {
        return RequestAuthContext::anonymous();
    };

    match codec.verify(token, now) {
        Ok(identity) => RequestAuthContext::authenticated(identity),
        Err(e) => {
            tracing::debug!(reason = e.kind(), "Bearer token rejected");
            metrics::counter!("auth_token_rejected_total", "reason" => e.kind()).increment(1);
            RequestAuthContext::anonymous()
        }
    }
}

/// 认证闸门 - 不强制要求令牌，是否放行由访问策略决定
pub async fn authentication_gate(
    State(codec): State<Arc<TokenCodec>>,
    mut req: Request,
    next: Next,
) -> Response {
    let context = resolve_auth_context(req.headers(), &codec, Utc::now());

    req.extensions_mut().insert(context);

    next.run(req).await
}
