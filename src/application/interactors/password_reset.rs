use std::sync::Arc;

use tracing::{info, warn};

use crate::application::app_error::{AppError, AppResult};
use crate::application::dto::auth::TokenDTO;
use crate::application::dto::id::IdDTO;
use crate::application::dto::password_reset::{
    RequestPasswordResetDTO, ResetPasswordDTO, VerifyPasswordResetDTO,
};
use crate::application::interactors::challenge::{ChallengeIssuer, ChallengeVerifier};
use crate::application::interface::clock::Clock;
use crate::application::interface::crypto::CredentialsHasher;
use crate::application::interface::db::DBSession;
use crate::application::interface::email::EmailSender;
use crate::application::interface::gateway::challenge::{ChallengeReader, ChallengeWriter};
use crate::application::interface::gateway::user::{UserReader, UserWriter};
use crate::application::interface::token::TokenCodec;
use crate::application::notification::{OtpMessage, spawn_otp_email};
use crate::domain::entities::id::Id;
use crate::domain::entities::otp_challenge::ChallengePurpose;
use crate::domain::entities::password_reset::ResetProof;
use crate::domain::entities::user::{User, normalize_email};

#[derive(Clone)]
pub struct RequestPasswordResetInteractor {
    db_session: Arc<dyn DBSession>,
    user_reader: Arc<dyn UserReader>,
    issuer: ChallengeIssuer,
    email_sender: Arc<dyn EmailSender>,
}

impl RequestPasswordResetInteractor {
    pub fn new(
        db_session: Arc<dyn DBSession>,
        user_reader: Arc<dyn UserReader>,
        issuer: ChallengeIssuer,
        email_sender: Arc<dyn EmailSender>,
    ) -> Self {
        Self {
            db_session,
            user_reader,
            issuer,
            email_sender,
        }
    }

    pub async fn execute(&self, dto: RequestPasswordResetDTO) -> AppResult<IdDTO> {
        let email = normalize_email(&dto.email);
        let user = self.user_reader.find_by_email(&email).await?.ok_or_else(|| {
            warn!("Password reset requested for unknown email: {}", email);
            AppError::UserNotFound
        })?;

        let challenge = self
            .issuer
            .issue(user.id, ChallengePurpose::PasswordReset, dto.ttl)
            .await?;
        self.db_session.commit().await?;
        info!("Password reset code issued for user {}", user.id);

        spawn_otp_email(
            Arc::clone(&self.email_sender),
            user.email,
            OtpMessage::PasswordReset,
            challenge.code,
            dto.ttl,
        );
        Ok(IdDTO { id: user.id.to_string() })
    }
}

/// Checks a reset code and hands back a proof bound to that challenge. The
/// challenge itself stays in place until the password is actually changed.
#[derive(Clone)]
pub struct VerifyPasswordResetInteractor {
    verifier: ChallengeVerifier,
    token_codec: Arc<dyn TokenCodec>,
    clock: Arc<dyn Clock>,
}

impl VerifyPasswordResetInteractor {
    pub fn new(verifier: ChallengeVerifier, token_codec: Arc<dyn TokenCodec>, clock: Arc<dyn Clock>) -> Self {
        Self {
            verifier,
            token_codec,
            clock,
        }
    }

    pub async fn execute(&self, dto: VerifyPasswordResetDTO) -> AppResult<TokenDTO> {
        let user_id: Id<User> = dto.user_id.as_str().try_into()?;
        let challenge = self
            .verifier
            .check(&user_id, ChallengePurpose::PasswordReset, dto.code.trim())
            .await?;
        let proof = ResetProof::new(&challenge, self.clock.now(), dto.ttl);
        let token = self.token_codec.sign_reset_proof(&proof)?;
        info!("Password reset code verified for user {}", user_id);
        Ok(TokenDTO { token })
    }
}

#[derive(Clone)]
pub struct ResetPasswordInteractor {
    db_session: Arc<dyn DBSession>,
    user_reader: Arc<dyn UserReader>,
    user_writer: Arc<dyn UserWriter>,
    challenge_reader: Arc<dyn ChallengeReader>,
    challenge_writer: Arc<dyn ChallengeWriter>,
    hasher: Arc<dyn CredentialsHasher>,
    token_codec: Arc<dyn TokenCodec>,
}

impl ResetPasswordInteractor {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        db_session: Arc<dyn DBSession>,
        user_reader: Arc<dyn UserReader>,
        user_writer: Arc<dyn UserWriter>,
        challenge_reader: Arc<dyn ChallengeReader>,
        challenge_writer: Arc<dyn ChallengeWriter>,
        hasher: Arc<dyn CredentialsHasher>,
        token_codec: Arc<dyn TokenCodec>,
    ) -> Self {
        Self {
            db_session,
            user_reader,
            user_writer,
            challenge_reader,
            challenge_writer,
            hasher,
            token_codec,
        }
    }

    pub async fn execute(&self, dto: ResetPasswordDTO) -> AppResult<()> {
        let user_id: Id<User> = dto.user_id.as_str().try_into()?;
        let proof = self.token_codec.verify_reset_proof(&dto.reset_token)?;
        if proof.user_id != user_id {
            warn!("Reset proof for {} presented for user {}", proof.user_id, user_id);
            return Err(AppError::InvalidResetProof);
        }

        // The proof only counts while the challenge it was issued for is
        // still the stored one.
        let challenge = self
            .challenge_reader
            .find(&user_id, ChallengePurpose::PasswordReset)
            .await?
            .filter(|challenge| challenge.id == proof.challenge_id)
            .ok_or_else(|| {
                warn!("Reset proof for user {} no longer matches a live challenge", user_id);
                AppError::InvalidResetProof
            })?;
        if self.user_reader.find_by_id(&user_id).await?.is_none() {
            return Err(AppError::UserNotFound);
        }

        let hash = self.hasher.hash_password(&dto.password).await?;
        if !self.challenge_writer.consume(&challenge.id).await? {
            warn!("Reset challenge for user {} consumed concurrently", user_id);
            return Err(AppError::InvalidResetProof);
        }
        self.user_writer.update_password(&user_id, &hash).await?;
        self.db_session.commit().await?;
        info!("Password reset for user {}", user_id);
        Ok(())
    }
}
