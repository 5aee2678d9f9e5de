use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::application::dto::user::{ActivityDTO, UserDTO};

#[derive(Debug, Serialize, ToSchema)]
pub struct ActivityResponse {
    pub timestamp: DateTime<Utc>,
    pub ip: Option<String>,
}

impl From<ActivityDTO> for ActivityResponse {
    fn from(dto: ActivityDTO) -> Self {
        Self {
            timestamp: dto.timestamp,
            ip: dto.origin,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
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
    pub login_history: Vec<ActivityResponse>,
    pub logout_history: Vec<ActivityResponse>,
    pub logout_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserDTO> for UserResponse {
    fn from(user: UserDTO) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            phone_number: user.phone_number,
            district: user.district,
            taluka: user.taluka,
            police_station: user.police_station,
            is_verified: user.is_verified,
            is_active: user.is_active,
            registered_at: user.registered_at,
            last_login: user.last_login,
            last_logout: user.last_logout,
            login_history: user.login_history.into_iter().map(ActivityResponse::from).collect(),
            logout_history: user.logout_history.into_iter().map(ActivityResponse::from).collect(),
            logout_count: user.logout_count,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}
