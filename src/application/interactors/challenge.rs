use std::sync::Arc;

use tracing::warn;

use crate::application::app_error::{AppError, AppResult};
use crate::application::interface::clock::Clock;
use crate::application::interface::gateway::challenge::{ChallengeReader, ChallengeWriter};
use crate::application::interface::otp::OtpGenerator;
use crate::domain::entities::id::Id;
use crate::domain::entities::otp_challenge::{ChallengePurpose, OtpChallenge};
use crate::domain::entities::user::User;

/// Writes a fresh code into the user's slot for one purpose.
#[derive(Clone)]
pub struct ChallengeIssuer {
    challenge_writer: Arc<dyn ChallengeWriter>,
    otp_generator: Arc<dyn OtpGenerator>,
    clock: Arc<dyn Clock>,
}

impl ChallengeIssuer {
    pub fn new(
        challenge_writer: Arc<dyn ChallengeWriter>,
        otp_generator: Arc<dyn OtpGenerator>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            challenge_writer,
            otp_generator,
            clock,
        }
    }

    pub async fn issue(&self, user_id: Id<User>, purpose: ChallengePurpose, ttl: i64) -> AppResult<OtpChallenge> {
        let challenge = OtpChallenge::new(user_id, purpose, self.otp_generator.generate(), self.clock.now(), ttl);
        self.challenge_writer.upsert(challenge.clone()).await?;
        Ok(challenge)
    }
}

#[derive(Clone)]
pub struct ChallengeVerifier {
    challenge_reader: Arc<dyn ChallengeReader>,
    challenge_writer: Arc<dyn ChallengeWriter>,
    clock: Arc<dyn Clock>,
}

impl ChallengeVerifier {
    pub fn new(
        challenge_reader: Arc<dyn ChallengeReader>,
        challenge_writer: Arc<dyn ChallengeWriter>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            challenge_reader,
            challenge_writer,
            clock,
        }
    }

    /// Validates the code against the live challenge without using it up.
    pub async fn check(&self, user_id: &Id<User>, purpose: ChallengePurpose, code: &str) -> AppResult<OtpChallenge> {
        let challenge = self.challenge_reader.find(user_id, purpose).await?.ok_or_else(|| {
            warn!("No {} challenge for user {}", purpose.as_str(), user_id);
            AppError::ChallengeNotFound
        })?;
        if let Err(err) = challenge.check(code, self.clock.now()) {
            warn!("Rejected {} challenge for user {}: {}", purpose.as_str(), user_id, err);
            return Err(err);
        }
        Ok(challenge)
    }

    /// Deletes the challenge if it is still the stored one. Losing a race with
    /// another consumer or a re-issue reads as the challenge being gone.
    pub async fn consume(&self, challenge: &OtpChallenge) -> AppResult<()> {
        if !self.challenge_writer.consume(&challenge.id).await? {
            warn!("Challenge {} was already consumed or replaced", challenge.id);
            return Err(AppError::ChallengeNotFound);
        }
        Ok(())
    }

    pub async fn verify(&self, user_id: &Id<User>, purpose: ChallengePurpose, code: &str) -> AppResult<OtpChallenge> {
        let challenge = self.check(user_id, purpose, code).await?;
        self.consume(&challenge).await?;
        Ok(challenge)
    }
}
