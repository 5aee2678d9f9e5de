use chrono::{DateTime, Utc};

use crate::domain::entities::activity::ActivityEntry;
use crate::domain::entities::user::User;

#[derive(Debug, Clone)]
pub struct ActivityDTO {
    pub timestamp: DateTime<Utc>,
    pub origin: Option<String>,
}

impl From<&ActivityEntry> for ActivityDTO {
    fn from(entry: &ActivityEntry) -> Self {
        Self {
            timestamp: entry.at,
            origin: entry.origin.clone(),
        }
    }
}

/// A user as it may leave the service: no password hash, no codes.
#[derive(Debug, Clone)]
pub struct UserDTO {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub district: String,
    pub taluka: String,
    pub police_station: String,
    pub is_verified: bool,
    pub is_active: bool,
    pub registered_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
    pub last_logout: Option<DateTime<Utc>>,
    pub login_history: Vec<ActivityDTO>,
    pub logout_history: Vec<ActivityDTO>,
    pub logout_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserDTO {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_string(),
            is_active: user.is_active(),
            login_history: user.login_history.iter().map(ActivityDTO::from).collect(),
            logout_history: user.logout_history.iter().map(ActivityDTO::from).collect(),
            name: user.name,
            email: user.email,
            phone_number: user.phone_number,
            district: user.locality.district,
            taluka: user.locality.taluka,
            police_station: user.locality.police_station,
            is_verified: user.is_verified,
            registered_at: user.registered_at,
            last_login: user.last_login,
            last_logout: user.last_logout,
            logout_count: user.logout_count,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}
