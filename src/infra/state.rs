use std::sync::Arc;

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use sqlx::PgPool;

use crate::adapter::db::gateway::activity::ActivityGateway;
use crate::adapter::db::gateway::challenge::ChallengeGateway;
use crate::adapter::db::gateway::pending_registration::PendingRegistrationGateway;
use crate::adapter::db::gateway::user::UserGateway;
use crate::adapter::db::session::SqlxSession;
use crate::adapter::memory::challenge::MemoryChallengeGateway;
use crate::adapter::memory::pending_registration::MemoryPendingRegistrationGateway;
use crate::adapter::memory::user::MemoryUserGateway;
use crate::adapter::memory::{MemoryBackend, MemorySession};
use crate::application::app_error::{AppError, AppResult};
use crate::application::interactors::admin::{GetUserByIdInteractor, GetUserOverviewInteractor, ListUsersInteractor};
use crate::application::interactors::auth::{
    AdminLoginInteractor, LoginInteractor, LogoutInteractor, VerifyLoginInteractor,
};
use crate::application::interactors::challenge::{ChallengeIssuer, ChallengeVerifier};
use crate::application::interactors::password_reset::{
    RequestPasswordResetInteractor, ResetPasswordInteractor, VerifyPasswordResetInteractor,
};
use crate::application::interactors::registration::{PromoteRegistrationInteractor, StageRegistrationInteractor};
use crate::application::interactors::users::GetProfileInteractor;
use crate::application::interface::clock::Clock;
use crate::application::interface::crypto::CredentialsHasher;
use crate::application::interface::db::DBSession;
use crate::application::interface::email::EmailSender;
use crate::application::interface::gateway::activity::ActivityWriter;
use crate::application::interface::gateway::challenge::{ChallengeReader, ChallengeWriter};
use crate::application::interface::gateway::pending_registration::{
    PendingRegistrationReader, PendingRegistrationWriter,
};
use crate::application::interface::gateway::user::{UserReader, UserWriter};
use crate::application::interface::otp::OtpGenerator;
use crate::application::interface::token::TokenCodec;
use crate::infra::config::AppConfig;

#[derive(Clone)]
pub enum Backend {
    Postgres(PgPool),
    Memory(MemoryBackend),
}

/// Gateways sharing one unit of work. Built fresh for every request.
#[derive(Clone)]
pub struct Gateways {
    pub db_session: Arc<dyn DBSession>,
    pub user_reader: Arc<dyn UserReader>,
    pub user_writer: Arc<dyn UserWriter>,
    pub activity_writer: Arc<dyn ActivityWriter>,
    pub challenge_reader: Arc<dyn ChallengeReader>,
    pub challenge_writer: Arc<dyn ChallengeWriter>,
    pub pending_reader: Arc<dyn PendingRegistrationReader>,
    pub pending_writer: Arc<dyn PendingRegistrationWriter>,
}

impl Gateways {
    pub fn postgres(pool: &PgPool) -> Self {
        let session = SqlxSession::new_lazy(pool.clone());
        let users = Arc::new(UserGateway::new(session.clone()));
        let challenges = Arc::new(ChallengeGateway::new(session.clone()));
        let pending = Arc::new(PendingRegistrationGateway::new(session.clone()));

        Self {
            user_reader: users.clone(),
            user_writer: users,
            activity_writer: Arc::new(ActivityGateway::new(session.clone())),
            challenge_reader: challenges.clone(),
            challenge_writer: challenges,
            pending_reader: pending.clone(),
            pending_writer: pending,
            db_session: Arc::new(session),
        }
    }

    pub fn memory(backend: &MemoryBackend) -> Self {
        let users = Arc::new(MemoryUserGateway::new(backend.store()));
        let challenges = Arc::new(MemoryChallengeGateway::new(backend.store()));
        let pending = Arc::new(MemoryPendingRegistrationGateway::new(backend.pending()));

        Self {
            db_session: Arc::new(MemorySession),
            user_reader: users.clone(),
            user_writer: users.clone(),
            activity_writer: users,
            challenge_reader: challenges.clone(),
            challenge_writer: challenges,
            pending_reader: pending.clone(),
            pending_writer: pending,
        }
    }
}

impl Backend {
    pub fn gateways(&self) -> Gateways {
        match self {
            Backend::Postgres(pool) => Gateways::postgres(pool),
            Backend::Memory(backend) => Gateways::memory(backend),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub backend: Backend,
    pub hasher: Arc<dyn CredentialsHasher>,
    pub token_codec: Arc<dyn TokenCodec>,
    pub otp_generator: Arc<dyn OtpGenerator>,
    pub clock: Arc<dyn Clock>,
    pub config: Arc<AppConfig>,
    pub email_sender: Arc<dyn EmailSender>,
}

impl AppState {
    fn issuer(&self, gateways: &Gateways) -> ChallengeIssuer {
        ChallengeIssuer::new(
            gateways.challenge_writer.clone(),
            self.otp_generator.clone(),
            self.clock.clone(),
        )
    }

    fn verifier(&self, gateways: &Gateways) -> ChallengeVerifier {
        ChallengeVerifier::new(
            gateways.challenge_reader.clone(),
            gateways.challenge_writer.clone(),
            self.clock.clone(),
        )
    }
}

impl FromRef<AppState> for Arc<AppConfig> {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

pub trait FromAppState: Sized {
    fn from_app_state(state: &AppState) -> AppResult<Self>;
}

/// Lets handlers take an interactor as an extractor argument.
macro_rules! interactor_extractor {
    ($($interactor:ty),+ $(,)?) => {
        $(
            impl<S> FromRequestParts<S> for $interactor
            where
                S: Send + Sync,
                AppState: FromRef<S>,
            {
                type Rejection = AppError;

                async fn from_request_parts(_parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
                    let app_state = AppState::from_ref(state);
                    <$interactor>::from_app_state(&app_state)
                }
            }
        )+
    };
}

interactor_extractor!(
    StageRegistrationInteractor,
    PromoteRegistrationInteractor,
    LoginInteractor,
    VerifyLoginInteractor,
    LogoutInteractor,
    RequestPasswordResetInteractor,
    VerifyPasswordResetInteractor,
    ResetPasswordInteractor,
    GetProfileInteractor,
    AdminLoginInteractor,
    ListUsersInteractor,
    GetUserOverviewInteractor,
    GetUserByIdInteractor,
);

impl FromAppState for StageRegistrationInteractor {
    fn from_app_state(state: &AppState) -> AppResult<Self> {
        let g = state.backend.gateways();
        Ok(StageRegistrationInteractor::new(
            g.db_session,
            g.user_reader,
            g.pending_writer,
            state.hasher.clone(),
            state.otp_generator.clone(),
            state.clock.clone(),
            state.email_sender.clone(),
        ))
    }
}

impl FromAppState for PromoteRegistrationInteractor {
    fn from_app_state(state: &AppState) -> AppResult<Self> {
        let g = state.backend.gateways();
        Ok(PromoteRegistrationInteractor::new(
            g.db_session,
            g.pending_reader,
            g.pending_writer,
            g.user_writer,
            state.clock.clone(),
        ))
    }
}

impl FromAppState for LoginInteractor {
    fn from_app_state(state: &AppState) -> AppResult<Self> {
        let g = state.backend.gateways();
        Ok(LoginInteractor::new(
            g.db_session.clone(),
            g.user_reader.clone(),
            g.activity_writer.clone(),
            state.issuer(&g),
            state.hasher.clone(),
            state.token_codec.clone(),
            state.clock.clone(),
            state.email_sender.clone(),
        ))
    }
}

impl FromAppState for VerifyLoginInteractor {
    fn from_app_state(state: &AppState) -> AppResult<Self> {
        let g = state.backend.gateways();
        Ok(VerifyLoginInteractor::new(
            g.db_session.clone(),
            g.user_reader.clone(),
            state.verifier(&g),
            state.token_codec.clone(),
            state.clock.clone(),
        ))
    }
}

impl FromAppState for LogoutInteractor {
    fn from_app_state(state: &AppState) -> AppResult<Self> {
        let g = state.backend.gateways();
        Ok(LogoutInteractor::new(
            g.db_session,
            g.user_reader,
            g.activity_writer,
            state.clock.clone(),
        ))
    }
}

impl FromAppState for RequestPasswordResetInteractor {
    fn from_app_state(state: &AppState) -> AppResult<Self> {
        let g = state.backend.gateways();
        Ok(RequestPasswordResetInteractor::new(
            g.db_session.clone(),
            g.user_reader.clone(),
            state.issuer(&g),
            state.email_sender.clone(),
        ))
    }
}

impl FromAppState for VerifyPasswordResetInteractor {
    fn from_app_state(state: &AppState) -> AppResult<Self> {
        let g = state.backend.gateways();
        Ok(VerifyPasswordResetInteractor::new(
            state.verifier(&g),
            state.token_codec.clone(),
            state.clock.clone(),
        ))
    }
}

impl FromAppState for ResetPasswordInteractor {
    fn from_app_state(state: &AppState) -> AppResult<Self> {
        let g = state.backend.gateways();
        Ok(ResetPasswordInteractor::new(
            g.db_session,
            g.user_reader,
            g.user_writer,
            g.challenge_reader,
            g.challenge_writer,
            state.hasher.clone(),
            state.token_codec.clone(),
        ))
    }
}

impl FromAppState for GetProfileInteractor {
    fn from_app_state(state: &AppState) -> AppResult<Self> {
        Ok(GetProfileInteractor::new(state.backend.gateways().user_reader))
    }
}

impl FromAppState for AdminLoginInteractor {
    fn from_app_state(state: &AppState) -> AppResult<Self> {
        Ok(AdminLoginInteractor::new(
            state.token_codec.clone(),
            state.clock.clone(),
            state.config.admin.secret.clone(),
        ))
    }
}

impl FromAppState for ListUsersInteractor {
    fn from_app_state(state: &AppState) -> AppResult<Self> {
        Ok(ListUsersInteractor::new(state.backend.gateways().user_reader))
    }
}

impl FromAppState for GetUserOverviewInteractor {
    fn from_app_state(state: &AppState) -> AppResult<Self> {
        Ok(GetUserOverviewInteractor::new(state.backend.gateways().user_reader))
    }
}

impl FromAppState for GetUserByIdInteractor {
    fn from_app_state(state: &AppState) -> AppResult<Self> {
        Ok(GetUserByIdInteractor::new(state.backend.gateways().user_reader))
    }
}
