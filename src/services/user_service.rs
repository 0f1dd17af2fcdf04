//! 用户业务逻辑：注册、登录、更新、删除

use crate::{
    auth::{jwt::TokenCodec, password::PasswordHasher},
    error::AppError,
    models::{
        auth::{LoginRequest, RegisterRequest},
        user::{NewUser, UpdateUserRequest, User, UserChanges, DEFAULT_ROLE},
    },
    repository::UserStore,
};
use chrono::Utc;
use std::sync::Arc;

pub struct UserService {
    store: Arc<dyn UserStore>,
    hasher: PasswordHasher,
    token_codec: Arc<TokenCodec>,
}

impl UserService {
    pub fn new(
        store: Arc<dyn UserStore>,
        hasher: PasswordHasher,
        token_codec: Arc<TokenCodec>,
    ) -> Self {
        Self {
            store,
            hasher,
            token_codec,
        }
    }

    /// 注册新用户
    pub async fn register(&self, req: RegisterRequest) -> Result<User, AppError> {
        req.check()?;

        if self.store.find_by_email(&req.email).await?.is_some() {
            tracing::info!(email = %req.email, "Registration rejected: email already registered");
            return Err(AppError::UserAlreadyExists(req.email));
        }

        let password_hash = self.hasher.hash(&req.password)?;

        let user = self
            .store
            .create(&NewUser {
                name: req.name,
                email: req.email,
                password_hash,
                role: DEFAULT_ROLE.to_string(),
            })
            .await?;

        tracing::info!(user_id = user.id, "User registered");
        Ok(user)
    }

    /// 登录并签发令牌
    ///
    /// 邮箱不存在与密码错误对外返回同一错误，日志中保留具体原因。
    pub async fn login(&self, req: LoginRequest) -> Result<String, AppError> {
        req.check()?;

        let Some(user) = self.store.find_by_email(&req.email).await? else {
            tracing::info!(reason = "unknown_email", "Login failed");
            return Err(AppError::InvalidCredentials);
        };

        if !self.hasher.matches(&req.password, &user.password_hash) {
            tracing::info!(reason = "password_mismatch", user_id = user.id, "Login failed");
            return Err(AppError::InvalidCredentials);
        }

        let token = self.token_codec.issue(&user.email, Utc::now())?;

        tracing::info!(user_id = user.id, "Login succeeded");
        Ok(token)
    }

    /// 更新用户（姓名、邮箱、密码整体替换）
    pub async fn update_user(&self, id: i32, req: UpdateUserRequest) -> Result<User, AppError> {
        req.check()?;

        if self.store.find_by_id(id).await?.is_none() {
            return Err(AppError::UserNotFound(id));
        }

        let password_hash = self.hasher.hash(&req.password)?;

        let user = self
            .store
            .update(
                id,
                &UserChanges {
                    name: req.name,
                    email: req.email,
                    password_hash,
                },
            )
            .await?
            .ok_or(AppError::UserNotFound(id))?;

        tracing::info!(user_id = id, "User updated");
        Ok(user)
    }

    /// 删除用户
    pub async fn delete_user(&self, id: i32) -> Result<(), AppError> {
        if !self.store.delete(id).await? {
            return Err(AppError::UserNotFound(id));
        }

        tracing::info!(user_id = id, "User deleted");
        Ok(())
    }
}
