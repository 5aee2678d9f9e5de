use chrono::{DateTime, Duration, Utc};

use crate::application::app_error::{AppError, AppResult};
use crate::domain::entities::id::Id;
use crate::domain::entities::user::{Locality, User};

/// How long an entry outlives its code. Within this window a late
/// confirmation is answered as expired; afterwards the entry is gone.
pub const EXPIRED_RETENTION_SECONDS: i64 = 86_400;

/// A signup waiting for its confirmation code. Keyed by email; staging again
/// for the same email replaces the entry.
#[derive(Debug, Clone)]
pub struct PendingRegistration {
    pub id: Id<PendingRegistration>,
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub locality: Locality,
    pub password_hash: String,
    pub code: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

pub struct Candidate {
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub locality: Locality,
    pub password_hash: String,
}

impl PendingRegistration {
    pub fn new(candidate: Candidate, code: String, now: DateTime<Utc>, ttl_seconds: i64) -> Self {
        Self {
            id: Id::generate(),
            name: candidate.name,
            email: candidate.email,
            phone_number: candidate.phone_number,
            locality: candidate.locality,
            password_hash: candidate.password_hash,
            code,
            expires_at: now + Duration::seconds(ttl_seconds),
            created_at: now,
        }
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Expiry instant before which other entries may be swept.
    pub fn sweep_horizon(now: DateTime<Utc>) -> DateTime<Utc> {
        now - Duration::seconds(EXPIRED_RETENTION_SECONDS)
    }

    pub fn check(&self, code: &str, now: DateTime<Utc>) -> AppResult<()> {
        if self.is_expired_at(now) {
            return Err(AppError::ChallengeExpired);
        }
        if self.code != code {
            return Err(AppError::ChallengeMismatch);
        }
        Ok(())
    }

    /// First required profile field that is blank, if any.
    pub fn missing_field(&self) -> Option<&'static str> {
        let fields = [
            ("name", &self.name),
            ("email", &self.email),
            ("password", &self.password_hash),
            ("phoneNumber", &self.phone_number),
            ("district", &self.locality.district),
            ("taluka", &self.locality.taluka),
            ("policeStation", &self.locality.police_station),
        ];
        fields
            .into_iter()
            .find(|(_, value)| value.trim().is_empty())
            .map(|(field, _)| field)
    }

    pub fn into_user(self, now: DateTime<Utc>) -> User {
        let mut user = User::new(
            self.name,
            self.email,
            self.phone_number,
            self.locality,
            self.password_hash,
            now,
        );
        user.is_verified = true;
        user
    }
}
