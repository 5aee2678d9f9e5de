use std::sync::Arc;

use async_trait::async_trait;

use crate::adapter::memory::MemoryStore;
use crate::application::app_error::{AppError, AppResult};
use crate::application::interface::gateway::activity::ActivityWriter;
use crate::application::interface::gateway::user::{UserFilter, UserReader, UserWriter};
use crate::domain::entities::activity::ActivityEntry;
use crate::domain::entities::id::Id;
use crate::domain::entities::user::User;

#[derive(Clone)]
pub struct MemoryUserGateway {
    store: Arc<MemoryStore>,
}

impl MemoryUserGateway {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl UserWriter for MemoryUserGateway {
    async fn insert(&self, user: User) -> AppResult<Id<User>> {
        let mut users = self.store.users.write().await;
        let taken = users
            .values()
            .any(|existing| existing.email == user.email || existing.phone_number == user.phone_number);
        if taken {
            return Err(AppError::DuplicateIdentity);
        }
        let id = user.id;
        users.insert(id, user);
        Ok(id)
    }

    async fn update_password(&self, user_id: &Id<User>, password_hash: &str) -> AppResult<()> {
        let mut users = self.store.users.write().await;
        let user = users.get_mut(user_id).ok_or(AppError::UserNotFound)?;
        user.password = password_hash.to_string();
        Ok(())
    }
}

#[async_trait]
impl UserReader for MemoryUserGateway {
    async fn find_by_id(&self, user_id: &Id<User>) -> AppResult<Option<User>> {
        Ok(self.store.users.read().await.get(user_id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let users = self.store.users.read().await;
        Ok(users.values().find(|user| user.email == email).cloned())
    }

    async fn exists_by_email_or_phone(&self, email: &str, phone_number: &str) -> AppResult<bool> {
        let users = self.store.users.read().await;
        Ok(users
            .values()
            .any(|user| user.email == email || user.phone_number == phone_number))
    }

    async fn list(&self, filter: &UserFilter) -> AppResult<Vec<User>> {
        let users = self.store.users.read().await;
        let mut matching: Vec<User> = users.values().filter(|user| filter.matches(user)).cloned().collect();
        matching.sort_by_key(|user| user.registered_at);
        Ok(matching)
    }
}

#[async_trait]
impl ActivityWriter for MemoryUserGateway {
    async fn record_login(&self, user_id: &Id<User>, entry: ActivityEntry) -> AppResult<()> {
        let mut users = self.store.users.write().await;
        let user = users.get_mut(user_id).ok_or(AppError::UserNotFound)?;
        user.record_login(entry);
        Ok(())
    }

    async fn record_logout(&self, user_id: &Id<User>, entry: ActivityEntry) -> AppResult<()> {
        let mut users = self.store.users.write().await;
        let user = users.get_mut(user_id).ok_or(AppError::UserNotFound)?;
        user.record_logout(entry);
        Ok(())
    }
}
