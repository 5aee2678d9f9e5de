use chrono::{DateTime, Duration, Utc};

use crate::domain::entities::user::User;

pub const ADMIN_SUBJECT: &str = "admin";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

/// Claims carried by a bearer token. Tokens are stateless; nothing on the
/// server can revoke one before `expires_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionClaims {
    pub subject: String,
    pub email: Option<String>,
    pub role: Role,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl SessionClaims {
    pub fn for_user(user: &User, now: DateTime<Utc>, ttl_seconds: i64) -> Self {
        Self {
            subject: user.id.to_string(),
            email: Some(user.email.clone()),
            role: Role::User,
            issued_at: now,
            expires_at: now + Duration::seconds(ttl_seconds),
        }
    }

    pub fn for_admin(now: DateTime<Utc>, ttl_seconds: i64) -> Self {
        Self {
            subject: ADMIN_SUBJECT.to_string(),
            email: None,
            role: Role::Admin,
            issued_at: now,
            expires_at: now + Duration::seconds(ttl_seconds),
        }
    }
}
