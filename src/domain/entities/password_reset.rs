use chrono::{DateTime, Duration, Utc};

use crate::domain::entities::id::Id;
use crate::domain::entities::otp_challenge::OtpChallenge;
use crate::domain::entities::user::User;

/// Issued once a reset code has been verified. Bound to the challenge it was
/// issued for, so it stops working as soon as that challenge is consumed or
/// replaced.
#[derive(Debug, Clone)]
pub struct ResetProof {
    pub user_id: Id<User>,
    pub challenge_id: Id<OtpChallenge>,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl ResetProof {
    pub fn new(challenge: &OtpChallenge, now: DateTime<Utc>, ttl_seconds: i64) -> Self {
        Self {
            user_id: challenge.user_id,
            challenge_id: challenge.id,
            issued_at: now,
            expires_at: now + Duration::seconds(ttl_seconds),
        }
    }
}
