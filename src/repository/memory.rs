//! In-memory user store

use crate::{
    error::AppError,
    models::user::{NewUser, User, UserChanges},
    repository::user_repo::UserStore,
};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

#[derive(Default)]
struct Inner {
    next_id: i32,
    users: BTreeMap<i32, User>,
}

/// 基于内存的用户存储，进程退出即丢失
#[derive(Default)]
pub struct InMemoryUserStore {
    inner: RwLock<Inner>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.users.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let inner = self.inner.read().await;
        Ok(inner.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<User>, AppError> {
        Ok(self.inner.read().await.users.get(&id).cloned())
    }

    async fn create(&self, new_user: &NewUser) -> Result<User, AppError> {
        let mut inner = self.inner.write().await;

        if inner.users.values().any(|u| u.email == new_user.email) {
            return Err(AppError::UserAlreadyExists(new_user.email.clone()));
        }

        inner.next_id += 1;
        let now = Utc::now();
        let user = User {
            id: inner.next_id,
            name: new_user.name.clone(),
            email: new_user.email.clone(),
            password_hash: new_user.password_hash.clone(),
            role: new_user.role.clone(),
            created_at: now,
            updated_at: now,
        };

        inner.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, id: i32, changes: &UserChanges) -> Result<Option<User>, AppError> {
        let mut inner = self.inner.write().await;

        if !inner.users.contains_key(&id) {
            return Ok(None);
        }

        if inner
            .users
            .values()
            .any(|u| u.id != id && u.email == changes.email)
        {
            return Err(AppError::UserAlreadyExists(changes.email.clone()));
        }

        let Some(user) = inner.users.get_mut(&id) else {
            return Ok(None);
        };

        user.name = changes.name.clone();
        user.email = changes.email.clone();
        user.password_hash = changes.password_hash.clone();
        user.updated_at = Utc::now();

        Ok(Some(user.clone()))
    }

    async fn delete(&self, id: i32) -> Result<bool, AppError> {
        Ok(self.inner.write().await.users.remove(&id).is_some())
    }
}
