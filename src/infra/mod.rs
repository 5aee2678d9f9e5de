use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use crate::adapter::clock::SystemClock;
use crate::adapter::crypto::argon2::ArgonPasswordHasher;
use crate::adapter::crypto::jwt::JwtTokenCodec;
use crate::adapter::crypto::otp::RandomOtpGenerator;
use crate::adapter::email::local::LocalEmailSender;
use crate::adapter::email::smtp::SMTPEmailSender;
use crate::adapter::memory::MemoryBackend;
use crate::application::interface::clock::Clock;
use crate::application::interface::email::EmailSender;
use crate::infra::config::{AppConfig, StorageDriver};
use crate::infra::db::init_db;
use crate::infra::state::{AppState, Backend};

pub mod app;
pub mod config;
pub mod db;
pub mod setup;
pub mod state;

fn email_sender(config: &AppConfig) -> anyhow::Result<Arc<dyn EmailSender>> {
    match config.email.provider.as_str() {
        "local" => Ok(Arc::new(LocalEmailSender::new(&config.email.local_output_dir))),
        "smtp" => {
            let sender = SMTPEmailSender::new(&config.smtp).context("configure SMTP sender")?;
            Ok(Arc::new(sender))
        }
        other => anyhow::bail!("Unknown email provider `{other}`"),
    }
}

async fn backend(config: &AppConfig) -> anyhow::Result<Backend> {
    match config.storage.driver {
        StorageDriver::Postgres => Ok(Backend::Postgres(init_db(config).await?)),
        StorageDriver::Memory => {
            info!("Using in-memory storage; data is lost on restart");
            Ok(Backend::Memory(MemoryBackend::new(config.otp.ttl_seconds)))
        }
    }
}

pub async fn init_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    anyhow::ensure!(!config.token.secret.is_empty(), "`token.secret` must not be empty");
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    Ok(AppState {
        backend: backend(config).await?,
        hasher: Arc::new(ArgonPasswordHasher::default()),
        token_codec: Arc::new(JwtTokenCodec::new(&config.token.secret, clock.clone())),
        otp_generator: Arc::new(RandomOtpGenerator),
        clock,
        config: Arc::new(config.clone()),
        email_sender: email_sender(config)?,
    })
}
