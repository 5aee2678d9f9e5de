use async_trait::async_trait;

use crate::application::app_error::AppResult;
use crate::domain::entities::activity::ActivityEntry;
use crate::domain::entities::id::Id;
use crate::domain::entities::user::User;

#[async_trait]
pub trait ActivityWriter: Send + Sync {
    /// Appends to the login history and moves `last_login`.
    async fn record_login(&self, user_id: &Id<User>, entry: ActivityEntry) -> AppResult<()>;
    /// Appends to the logout history, moves `last_logout` and bumps the counter.
    async fn record_logout(&self, user_id: &Id<User>, entry: ActivityEntry) -> AppResult<()>;
}
