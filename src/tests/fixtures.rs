#![cfg(test)]

use std::sync::Arc;

use rstest::fixture;
use sqlx::PgPool;

use crate::adapter::crypto::jwt::JwtTokenCodec;
use crate::adapter::memory::MemoryBackend;
use crate::application::interface::clock::Clock;
use crate::application::interface::crypto::CredentialsHasher;
use crate::application::interface::token::TokenCodec;
use crate::domain::entities::session::SessionClaims;
use crate::domain::entities::user::{Locality, User};
use crate::infra::config::{
    AdminConfig, AppConfig, ApplicationConfig, DatabaseConfig, EmailConfig, LoggerConfig, OtpConfig, SMTPConfig,
    StorageConfig, StorageDriver, TokenConfig,
};
use crate::infra::db::init_db;
use crate::infra::state::{AppState, Backend, Gateways};
use crate::tests::helpers::{FixedClock, PlainHasher, RecordingEmailSender, SequenceOtpGenerator, epoch};

pub const TEST_ADMIN_SECRET: &str = "admin-secret";
pub const TEST_TOKEN_SECRET: &str = "test-token-secret";

/// Everything a test needs to drive the application layer against the
/// in-memory backend with a controllable clock and predictable codes.
pub struct TestEnv {
    pub backend: MemoryBackend,
    pub gateways: Gateways,
    pub clock: FixedClock,
    pub otp: SequenceOtpGenerator,
    pub hasher: Arc<dyn CredentialsHasher>,
    pub email: RecordingEmailSender,
    pub tokens: Arc<dyn TokenCodec>,
    pub config: AppConfig,
}

#[fixture]
pub fn test_config() -> AppConfig {
    AppConfig {
        db: DatabaseConfig::default(),
        logger: LoggerConfig {
            level: "debug".to_string(),
            log_path: None,
        },
        application: ApplicationConfig {
            allow_origins: vec!["*".to_string()],
            address: "127.0.0.1:0".to_string(),
        },
        storage: StorageConfig {
            driver: StorageDriver::Memory,
        },
        otp: OtpConfig { ttl_seconds: 600 },
        token: TokenConfig {
            secret: TEST_TOKEN_SECRET.to_string(),
            session_ttl_seconds: 86_400,
            admin_ttl_seconds: 7_200,
            reset_proof_ttl_seconds: 600,
        },
        admin: AdminConfig {
            secret: TEST_ADMIN_SECRET.to_string(),
        },
        email: EmailConfig {
            provider: "local".to_string(),
            local_output_dir: "./tmp/test-emails".to_string(),
        },
        smtp: SMTPConfig {
            host: "smtp.example.com".to_string(),
            port: 587,
            username: String::new(),
            password: String::new(),
            from: "no-reply@example.com".to_string(),
        },
    }
}

/// Migrated pool for the Postgres gateway tests, which only run when
/// `TEST_DATABASE_URL` is set.
#[fixture]
pub async fn pg_pool(mut test_config: AppConfig) -> PgPool {
    test_config.db.url = std::env::var("TEST_DATABASE_URL").expect("TEST_DATABASE_URL must be set");
    init_db(&test_config).await.expect("init test database")
}

#[fixture]
pub fn env(test_config: AppConfig) -> TestEnv {
    let backend = MemoryBackend::new(test_config.otp.ttl_seconds);
    let clock = FixedClock::at(epoch());
    let tokens = Arc::new(JwtTokenCodec::new(&test_config.token.secret, Arc::new(clock.clone())));

    TestEnv {
        gateways: Gateways::memory(&backend),
        backend,
        clock,
        otp: SequenceOtpGenerator::default(),
        hasher: Arc::new(PlainHasher),
        email: RecordingEmailSender::default(),
        tokens,
        config: test_config,
    }
}

impl TestEnv {
    /// Inserts a verified user registered at the current clock time.
    pub async fn seed_user(&self, email: &str, phone: &str, password: &str) -> User {
        self.insert_user(email, phone, password, "Pune").await
    }

    pub async fn seed_user_in(&self, email: &str, phone: &str, district: &str) -> User {
        self.insert_user(email, phone, "secret123", district).await
    }

    async fn insert_user(&self, email: &str, phone: &str, password: &str, district: &str) -> User {
        let hash = self.hasher.hash_password(password).await.unwrap();
        let mut user = User::new(
            "Test User".to_string(),
            email.to_string(),
            phone.to_string(),
            Locality {
                district: district.to_string(),
                taluka: "Haveli".to_string(),
                police_station: "Central".to_string(),
            },
            hash,
            self.clock.now(),
        );
        user.is_verified = true;
        self.gateways.user_writer.insert(user.clone()).await.unwrap();
        user
    }

    pub fn session_token(&self, user: &User) -> String {
        let claims = SessionClaims::for_user(user, self.clock.now(), self.config.token.session_ttl_seconds);
        self.tokens.sign_session(&claims).unwrap()
    }

    pub fn admin_token(&self) -> String {
        let claims = SessionClaims::for_admin(self.clock.now(), self.config.token.admin_ttl_seconds);
        self.tokens.sign_session(&claims).unwrap()
    }

    /// Application state wired to this environment, for router tests.
    pub fn app_state(&self) -> AppState {
        AppState {
            backend: Backend::Memory(self.backend.clone()),
            hasher: self.hasher.clone(),
            token_codec: self.tokens.clone(),
            otp_generator: Arc::new(self.otp.clone()),
            clock: Arc::new(self.clock.clone()),
            config: Arc::new(self.config.clone()),
            email_sender: Arc::new(self.email.clone()),
        }
    }
}
