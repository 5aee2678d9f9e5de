use std::sync::Arc;

use async_trait::async_trait;

use crate::adapter::memory::MemoryStore;
use crate::application::app_error::AppResult;
use crate::application::interface::gateway::challenge::{ChallengeReader, ChallengeWriter};
use crate::domain::entities::id::Id;
use crate::domain::entities::otp_challenge::{ChallengePurpose, OtpChallenge};
use crate::domain::entities::user::User;

#[derive(Clone)]
pub struct MemoryChallengeGateway {
    store: Arc<MemoryStore>,
}

impl MemoryChallengeGateway {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ChallengeWriter for MemoryChallengeGateway {
    async fn upsert(&self, challenge: OtpChallenge) -> AppResult<()> {
        let mut challenges = self.store.challenges.write().await;
        challenges.insert((challenge.user_id, challenge.purpose), challenge);
        Ok(())
    }

    async fn consume(&self, challenge_id: &Id<OtpChallenge>) -> AppResult<bool> {
        let mut challenges = self.store.challenges.write().await;
        let key = challenges
            .iter()
            .find(|(_, challenge)| challenge.id == *challenge_id)
            .map(|(key, _)| *key);
        Ok(key.and_then(|key| challenges.remove(&key)).is_some())
    }
}

#[async_trait]
impl ChallengeReader for MemoryChallengeGateway {
    async fn find(&self, user_id: &Id<User>, purpose: ChallengePurpose) -> AppResult<Option<OtpChallenge>> {
        let challenges = self.store.challenges.read().await;
        Ok(challenges.get(&(*user_id, purpose)).cloned())
    }
}
