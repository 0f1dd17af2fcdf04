//! 数据模型模块

pub mod auth;
pub mod user;

use crate::error::AppError;
use validator::ValidationErrors;

/// 必填字段检查（去除空白后不能为空）
pub(crate) fn ensure_not_blank(value: &str, message: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(message.to_string()));
    }
    Ok(())
}

/// 将 validator 的错误折叠为第一条消息（按字段名排序，保证稳定）
pub(crate) fn first_validation_message(errors: &ValidationErrors) -> AppError {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    let message = fields
        .first()
        .and_then(|(_, errs)| errs.first())
        .and_then(|e| e.message.as_ref())
        .map(|m| m.to_string())
        .unwrap_or_else(|| "Invalid request".to_string());

    AppError::Validation(message)
}
