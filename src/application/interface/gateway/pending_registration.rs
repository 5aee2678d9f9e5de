use async_trait::async_trait;

use crate::application::app_error::AppResult;
use crate::domain::entities::pending_registration::PendingRegistration;

#[async_trait]
pub trait PendingRegistrationWriter: Send + Sync {
    /// Stores the entry under its email, overwriting any previous one.
    async fn put(&self, entry: PendingRegistration) -> AppResult<()>;
    async fn delete(&self, email: &str) -> AppResult<()>;
}

#[async_trait]
pub trait PendingRegistrationReader: Send + Sync {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<PendingRegistration>>;
}
