//! 用户管理的 HTTP 处理器

use crate::{
    auth::middleware::CurrentUser,
    error::AppError,
    middleware::AppState,
    models::user::{UpdateUserRequest, UserResponse},
};
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde_json::json;
use std::sync::Arc;

/// 当前调用者身份
pub async fn me(CurrentUser(identity): CurrentUser) -> impl IntoResponse {
    Json(json!({
        "authenticated": true,
        "identity": identity,
    }))
}

/// 更新用户
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    CurrentUser(caller): CurrentUser,
    Path(id): Path<i32>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = state.user_service.update_user(id, req).await?;

    tracing::debug!(caller = %caller, user_id = id, "Update performed");

    Ok(Json(json!({
        "message": "User updated successfully",
        "user": UserResponse::from(user)
    })))
}

/// 删除用户
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    CurrentUser(caller): CurrentUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    state.user_service.delete_user(id).await?;

    tracing::debug!(caller = %caller, user_id = id, "Delete performed");

    Ok(Json(json!({
        "message": "User deleted successfully"
    })))
}
