use async_trait::async_trait;

use crate::application::app_error::AppResult;
use crate::domain::entities::id::Id;
use crate::domain::entities::otp_challenge::{ChallengePurpose, OtpChallenge};
use crate::domain::entities::user::User;

#[async_trait]
pub trait ChallengeWriter: Send + Sync {
    /// Stores the challenge, replacing any live one with the same user and purpose.
    async fn upsert(&self, challenge: OtpChallenge) -> AppResult<()>;
    /// Deletes the challenge only if it is still the stored one. Returns
    /// whether anything was deleted.
    async fn consume(&self, challenge_id: &Id<OtpChallenge>) -> AppResult<bool>;
}

#[async_trait]
pub trait ChallengeReader: Send + Sync {
    async fn find(&self, user_id: &Id<User>, purpose: ChallengePurpose) -> AppResult<Option<OtpChallenge>>;
}
