use crate::{
    application::app_error::AppResult,
    domain::entities::{id::Id, user::User},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    pub district: Option<String>,
    pub taluka: Option<String>,
    pub police_station: Option<String>,
    pub registered_from: Option<DateTime<Utc>>,
    pub registered_to: Option<DateTime<Utc>>,
}

impl UserFilter {
    pub fn matches(&self, user: &User) -> bool {
        let eq = |wanted: &Option<String>, actual: &str| wanted.as_deref().is_none_or(|w| w == actual);
        eq(&self.district, &user.locality.district)
            && eq(&self.taluka, &user.locality.taluka)
            && eq(&self.police_station, &user.locality.police_station)
            && self.registered_from.is_none_or(|from| user.registered_at >= from)
            && self.registered_to.is_none_or(|to| user.registered_at <= to)
    }
}

#[async_trait]
pub trait UserWriter: Send + Sync {
    /// Inserts only if no user holds the same email or phone number;
    /// otherwise fails with `DuplicateIdentity`.
    async fn insert(&self, user: User) -> AppResult<Id<User>>;
    async fn update_password(&self, user_id: &Id<User>, password_hash: &str) -> AppResult<()>;
}

#[async_trait]
pub trait UserReader: Send + Sync {
    async fn find_by_id(&self, user_id: &Id<User>) -> AppResult<Option<User>>;
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;
    async fn exists_by_email_or_phone(&self, email: &str, phone_number: &str) -> AppResult<bool>;
    /// Users matching the filter, oldest registration first, with history loaded.
    async fn list(&self, filter: &UserFilter) -> AppResult<Vec<User>>;
}
