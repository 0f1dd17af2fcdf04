//! User repository (数据库访问层)

use crate::{
    error::AppError,
    models::user::{NewUser, User, UserChanges},
};
use async_trait::async_trait;
use sqlx::PgPool;

/// 用户存储抽象
#[async_trait]
pub trait UserStore: Send + Sync {
    /// 根据邮箱查找用户
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// 根据 ID 查找用户
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, AppError>;

    /// 创建用户，邮箱重复时返回 `UserAlreadyExists`
    async fn create(&self, new_user: &NewUser) -> Result<User, AppError>;

    /// 更新用户，不存在时返回 `None`
    async fn update(&self, id: i32, changes: &UserChanges) -> Result<Option<User>, AppError>;

    /// 删除用户，返回是否有记录被删除
    async fn delete(&self, id: i32) -> Result<bool, AppError>;
}

pub struct PgUserRepository {
    db: PgPool,
}

impl PgUserRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

/// 唯一索引冲突映射为业务错误
fn map_unique_violation(e: sqlx::Error, email: &str) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            return AppError::UserAlreadyExists(email.to_string());
        }
    }
    AppError::Database(e)
}

#[async_trait]
impl UserStore for PgUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.db)
            .await?;

        Ok(user)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        Ok(user)
    }

    async fn create(&self, new_user: &NewUser) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password_hash, role)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&new_user.name)
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .bind(&new_user.role)
        .fetch_one(&self.db)
        .await
        .map_err(|e| map_unique_violation(e, &new_user.email))
    }

    async fn update(&self, id: i32, changes: &UserChanges) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET
                name = $2,
                email = $3,
                password_hash = $4,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&changes.name)
        .bind(&changes.email)
        .bind(&changes.password_hash)
        .fetch_optional(&self.db)
        .await
        .map_err(|e| map_unique_violation(e, &changes.email))
    }

    async fn delete(&self, id: i32) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
