use chrono::{DateTime, Utc};

use crate::domain::entities::user::User;

#[derive(Debug, Clone)]
pub enum UserQueryDTO {
    All,
    /// Users with at least one recorded login.
    LoggedIn,
    Active,
    Location {
        district: Option<String>,
        taluka: Option<String>,
        police_station: Option<String>,
    },
    RegisteredBetween {
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    },
    TopActive {
        limit: usize,
    },
}

#[derive(Debug, Clone)]
pub struct UserOverviewDTO {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub district: String,
    pub taluka: String,
    pub police_station: String,
    pub registered_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
    pub last_logout: Option<DateTime<Utc>>,
    pub login_count: usize,
    pub logout_count: i64,
    pub last_known_ip: Option<String>,
    pub is_verified: bool,
    pub is_active: bool,
}

impl From<User> for UserOverviewDTO {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_string(),
            login_count: user.login_count(),
            last_known_ip: user.last_known_origin().map(str::to_string),
            is_active: user.is_active(),
            name: user.name,
            email: user.email,
            phone_number: user.phone_number,
            district: user.locality.district,
            taluka: user.locality.taluka,
            police_station: user.locality.police_station,
            registered_at: user.registered_at,
            last_login: user.last_login,
            last_logout: user.last_logout,
            logout_count: user.logout_count,
            is_verified: user.is_verified,
        }
    }
}
