use std::sync::Arc;

use subtle::ConstantTimeEq;
use tracing::{info, warn};

use crate::application::app_error::{AppError, AppResult};
use crate::application::dto::auth::{AdminLoginDTO, LoginDTO, LoginOutcomeDTO, LogoutDTO, TokenDTO, VerifyOtpDTO};
use crate::application::interactors::challenge::{ChallengeIssuer, ChallengeVerifier};
use crate::application::interface::clock::Clock;
use crate::application::interface::crypto::CredentialsHasher;
use crate::application::interface::db::DBSession;
use crate::application::interface::email::EmailSender;
use crate::application::interface::gateway::activity::ActivityWriter;
use crate::application::interface::gateway::user::UserReader;
use crate::application::interface::token::TokenCodec;
use crate::application::notification::{OtpMessage, spawn_otp_email};
use crate::domain::entities::activity::ActivityEntry;
use crate::domain::entities::id::Id;
use crate::domain::entities::otp_challenge::ChallengePurpose;
use crate::domain::entities::session::{Role, SessionClaims};
use crate::domain::entities::user::{User, normalize_email};

/// First half of sign in. Either resumes a still-valid bearer token or checks
/// credentials and sends a login code.
#[derive(Clone)]
pub struct LoginInteractor {
    db_session: Arc<dyn DBSession>,
    user_reader: Arc<dyn UserReader>,
    activity_writer: Arc<dyn ActivityWriter>,
    issuer: ChallengeIssuer,
    hasher: Arc<dyn CredentialsHasher>,
    token_codec: Arc<dyn TokenCodec>,
    clock: Arc<dyn Clock>,
    email_sender: Arc<dyn EmailSender>,
}

impl LoginInteractor {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        db_session: Arc<dyn DBSession>,
        user_reader: Arc<dyn UserReader>,
        activity_writer: Arc<dyn ActivityWriter>,
        issuer: ChallengeIssuer,
        hasher: Arc<dyn CredentialsHasher>,
        token_codec: Arc<dyn TokenCodec>,
        clock: Arc<dyn Clock>,
        email_sender: Arc<dyn EmailSender>,
    ) -> Self {
        Self {
            db_session,
            user_reader,
            activity_writer,
            issuer,
            hasher,
            token_codec,
            clock,
            email_sender,
        }
    }

    pub async fn execute(&self, dto: LoginDTO) -> AppResult<LoginOutcomeDTO> {
        if let Some(token) = dto.token.as_deref().filter(|token| !token.is_empty()) {
            if let Some(outcome) = self.resume(token, dto.origin.clone()).await? {
                return Ok(outcome);
            }
        }

        let (Some(email), Some(password)) = (dto.email.as_deref(), dto.password.as_deref()) else {
            warn!("Login attempt without credentials");
            return Err(AppError::InvalidCredentials);
        };
        let email = normalize_email(email);
        let user = self.user_reader.find_by_email(&email).await?.ok_or_else(|| {
            warn!("Login attempt with unknown email: {}", email);
            AppError::InvalidCredentials
        })?;
        if !self.hasher.verify_password(password, &user.password).await? {
            warn!("Invalid password for user {}", user.id);
            return Err(AppError::InvalidCredentials);
        }

        let entry = ActivityEntry::new(self.clock.now(), dto.origin);
        self.activity_writer.record_login(&user.id, entry).await?;
        let challenge = self.issuer.issue(user.id, ChallengePurpose::Login, dto.ttl).await?;
        self.db_session.commit().await?;
        info!("Login code issued for user {}", user.id);

        spawn_otp_email(
            Arc::clone(&self.email_sender),
            user.email,
            OtpMessage::Login,
            challenge.code,
            dto.ttl,
        );
        Ok(LoginOutcomeDTO::ChallengeIssued {
            user_id: user.id.to_string(),
        })
    }

    /// `None` means the token did not identify a live user and the caller
    /// falls back to credentials.
    async fn resume(&self, token: &str, origin: Option<String>) -> AppResult<Option<LoginOutcomeDTO>> {
        let claims = match self.token_codec.verify_session(token) {
            Ok(claims) if claims.role == Role::User => claims,
            _ => {
                warn!("Presented login token is not a valid user session");
                return Ok(None);
            }
        };
        let Ok(user_id) = Id::<User>::try_from(claims.subject.as_str()) else {
            return Ok(None);
        };
        if self.user_reader.find_by_id(&user_id).await?.is_none() {
            warn!("Login token refers to missing user {}", user_id);
            return Ok(None);
        }

        self.activity_writer
            .record_login(&user_id, ActivityEntry::new(self.clock.now(), origin))
            .await?;
        self.db_session.commit().await?;
        info!("User {} resumed session with existing token", user_id);
        Ok(Some(LoginOutcomeDTO::Resumed {
            token: token.to_string(),
        }))
    }
}

#[derive(Clone)]
pub struct VerifyLoginInteractor {
    db_session: Arc<dyn DBSession>,
    user_reader: Arc<dyn UserReader>,
    verifier: ChallengeVerifier,
    token_codec: Arc<dyn TokenCodec>,
    clock: Arc<dyn Clock>,
}

impl VerifyLoginInteractor {
    pub fn new(
        db_session: Arc<dyn DBSession>,
        user_reader: Arc<dyn UserReader>,
        verifier: ChallengeVerifier,
        token_codec: Arc<dyn TokenCodec>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            db_session,
            user_reader,
            verifier,
            token_codec,
            clock,
        }
    }

    pub async fn execute(&self, dto: VerifyOtpDTO) -> AppResult<TokenDTO> {
        let user_id: Id<User> = dto.user_id.as_str().try_into()?;
        let challenge = self
            .verifier
            .verify(&user_id, ChallengePurpose::Login, dto.code.trim())
            .await?;
        let user = self.user_reader.find_by_id(&challenge.user_id).await?.ok_or(AppError::UserNotFound)?;

        let claims = SessionClaims::for_user(&user, self.clock.now(), dto.ttl);
        let token = self.token_codec.sign_session(&claims)?;
        self.db_session.commit().await?;
        info!("User {} signed in", user.id);
        Ok(TokenDTO { token })
    }
}

#[derive(Clone)]
pub struct LogoutInteractor {
    db_session: Arc<dyn DBSession>,
    user_reader: Arc<dyn UserReader>,
    activity_writer: Arc<dyn ActivityWriter>,
    clock: Arc<dyn Clock>,
}

impl LogoutInteractor {
    pub fn new(
        db_session: Arc<dyn DBSession>,
        user_reader: Arc<dyn UserReader>,
        activity_writer: Arc<dyn ActivityWriter>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            db_session,
            user_reader,
            activity_writer,
            clock,
        }
    }

    /// Records the event only; the bearer token stays valid until it expires.
    pub async fn execute(&self, dto: LogoutDTO) -> AppResult<()> {
        let user_id: Id<User> = dto.user_id.as_str().try_into()?;
        if self.user_reader.find_by_id(&user_id).await?.is_none() {
            return Err(AppError::UserNotFound);
        }
        self.activity_writer
            .record_logout(&user_id, ActivityEntry::new(self.clock.now(), dto.origin))
            .await?;
        self.db_session.commit().await?;
        info!("User {} logged out", user_id);
        Ok(())
    }
}

#[derive(Clone)]
pub struct AdminLoginInteractor {
    token_codec: Arc<dyn TokenCodec>,
    clock: Arc<dyn Clock>,
    admin_secret: String,
}

impl AdminLoginInteractor {
    pub fn new(token_codec: Arc<dyn TokenCodec>, clock: Arc<dyn Clock>, admin_secret: String) -> Self {
        Self {
            token_codec,
            clock,
            admin_secret,
        }
    }

    pub fn execute(&self, dto: AdminLoginDTO) -> AppResult<TokenDTO> {
        if self.admin_secret.is_empty() || !secret_matches(&dto.secret, &self.admin_secret) {
            warn!("Admin login rejected");
            return Err(AppError::InvalidAdminSecret);
        }
        let token = self
            .token_codec
            .sign_session(&SessionClaims::for_admin(self.clock.now(), dto.ttl))?;
        info!("Admin signed in");
        Ok(TokenDTO { token })
    }
}

fn secret_matches(given: &str, expected: &str) -> bool {
    given.as_bytes().ct_eq(expected.as_bytes()).into()
}
