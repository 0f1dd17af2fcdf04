//! HTTP 处理器模块

pub mod auth;
pub mod user;

use crate::error::AppError;

/// 未匹配路由
pub async fn not_found() -> AppError {
    AppError::NotFound
}
