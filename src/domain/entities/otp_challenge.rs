use chrono::{DateTime, Duration, Utc};

use crate::application::app_error::{AppError, AppResult};
use crate::domain::entities::id::Id;
use crate::domain::entities::user::User;

/// What a stored challenge unlocks. Each purpose has its own slot per user,
/// so issuing one never invalidates the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChallengePurpose {
    Login,
    PasswordReset,
}

impl ChallengePurpose {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChallengePurpose::Login => "login",
            ChallengePurpose::PasswordReset => "password_reset",
        }
    }
}

impl TryFrom<&str> for ChallengePurpose {
    type Error = AppError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "login" => Ok(ChallengePurpose::Login),
            "password_reset" => Ok(ChallengePurpose::PasswordReset),
            other => Err(AppError::StorageError(format!("Unknown challenge purpose: {other}"))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct OtpChallenge {
    pub id: Id<OtpChallenge>,
    pub user_id: Id<User>,
    pub purpose: ChallengePurpose,
    pub code: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl OtpChallenge {
    pub fn new(
        user_id: Id<User>,
        purpose: ChallengePurpose,
        code: String,
        now: DateTime<Utc>,
        ttl_seconds: i64,
    ) -> Self {
        Self {
            id: Id::generate(),
            user_id,
            purpose,
            code,
            expires_at: now + Duration::seconds(ttl_seconds),
            created_at: now,
        }
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Expiry is checked before the code so a stale challenge never matches.
    pub fn check(&self, code: &str, now: DateTime<Utc>) -> AppResult<()> {
        if self.is_expired_at(now) {
            return Err(AppError::ChallengeExpired);
        }
        if self.code != code {
            return Err(AppError::ChallengeMismatch);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use rstest::rstest;

    use crate::application::app_error::AppError;
    use crate::domain::entities::id::Id;
    use crate::domain::entities::otp_challenge::{ChallengePurpose, OtpChallenge};

    const TTL: i64 = 600;

    #[rstest]
    fn test_new_challenge_expires_after_ttl() {
        let now = Utc::now();
        let challenge = OtpChallenge::new(Id::generate(), ChallengePurpose::Login, "123456".to_string(), now, TTL);
        assert_eq!(challenge.expires_at, now + Duration::seconds(TTL));
        assert_eq!(challenge.created_at, now);
    }

    #[rstest]
    #[case(-1, true)]
    #[case(0, true)]
    #[case(1, false)]
    fn test_check_expiry_boundary(#[case] offset_ms: i64, #[case] accepted: bool) {
        let now = Utc::now();
        let challenge = OtpChallenge::new(Id::generate(), ChallengePurpose::Login, "123456".to_string(), now, TTL);
        let at = challenge.expires_at + Duration::milliseconds(offset_ms);
        assert_eq!(challenge.check("123456", at).is_ok(), accepted);
    }

    #[rstest]
    fn test_check_wrong_code() {
        let now = Utc::now();
        let challenge =
            OtpChallenge::new(Id::generate(), ChallengePurpose::PasswordReset, "123456".to_string(), now, TTL);
        assert!(matches!(challenge.check("654321", now), Err(AppError::ChallengeMismatch)));
    }

    #[rstest]
    fn test_expired_wins_over_correct_code() {
        let now = Utc::now();
        let challenge = OtpChallenge::new(Id::generate(), ChallengePurpose::Login, "123456".to_string(), now, TTL);
        let later = now + Duration::seconds(TTL + 1);
        assert!(matches!(challenge.check("123456", later), Err(AppError::ChallengeExpired)));
    }

    #[rstest]
    #[case(ChallengePurpose::Login)]
    #[case(ChallengePurpose::PasswordReset)]
    fn test_purpose_round_trips_through_str(#[case] purpose: ChallengePurpose) {
        assert_eq!(ChallengePurpose::try_from(purpose.as_str()).unwrap(), purpose);
    }
}
