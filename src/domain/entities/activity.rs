use chrono::{DateTime, Utc};

use crate::application::app_error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityKind {
    Login,
    Logout,
}

impl ActivityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityKind::Login => "login",
            ActivityKind::Logout => "logout",
        }
    }
}

impl TryFrom<&str> for ActivityKind {
    type Error = AppError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "login" => Ok(ActivityKind::Login),
            "logout" => Ok(ActivityKind::Logout),
            other => Err(AppError::StorageError(format!("Unknown activity kind: {other}"))),
        }
    }
}

/// One login or logout event with the address it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityEntry {
    pub at: DateTime<Utc>,
    pub origin: Option<String>,
}

impl ActivityEntry {
    pub fn new(at: DateTime<Utc>, origin: Option<String>) -> Self {
        Self { at, origin }
    }
}
