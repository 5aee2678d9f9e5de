use std::sync::Arc;

use tracing::{info, warn};

use crate::application::app_error::{AppError, AppResult};
use crate::application::dto::id::IdDTO;
use crate::application::dto::registration::{PromoteRegistrationDTO, StageRegistrationDTO};
use crate::application::interface::clock::Clock;
use crate::application::interface::crypto::CredentialsHasher;
use crate::application::interface::db::DBSession;
use crate::application::interface::email::EmailSender;
use crate::application::interface::gateway::pending_registration::{
    PendingRegistrationReader, PendingRegistrationWriter,
};
use crate::application::interface::gateway::user::{UserReader, UserWriter};
use crate::application::interface::otp::OtpGenerator;
use crate::application::notification::{OtpMessage, spawn_otp_email};
use crate::domain::entities::pending_registration::{Candidate, PendingRegistration};
use crate::domain::entities::user::{Locality, normalize_email};

#[derive(Clone)]
pub struct StageRegistrationInteractor {
    db_session: Arc<dyn DBSession>,
    user_reader: Arc<dyn UserReader>,
    pending_writer: Arc<dyn PendingRegistrationWriter>,
    hasher: Arc<dyn CredentialsHasher>,
    otp_generator: Arc<dyn OtpGenerator>,
    clock: Arc<dyn Clock>,
    email_sender: Arc<dyn EmailSender>,
}

impl StageRegistrationInteractor {
    pub fn new(
        db_session: Arc<dyn DBSession>,
        user_reader: Arc<dyn UserReader>,
        pending_writer: Arc<dyn PendingRegistrationWriter>,
        hasher: Arc<dyn CredentialsHasher>,
        otp_generator: Arc<dyn OtpGenerator>,
        clock: Arc<dyn Clock>,
        email_sender: Arc<dyn EmailSender>,
    ) -> Self {
        Self {
            db_session,
            user_reader,
            pending_writer,
            hasher,
            otp_generator,
            clock,
            email_sender,
        }
    }

    pub async fn execute(&self, dto: StageRegistrationDTO) -> AppResult<()> {
        let email = normalize_email(&dto.email);
        let phone_number = dto.phone_number.trim().to_string();
        if self.user_reader.exists_by_email_or_phone(&email, &phone_number).await? {
            warn!("Signup rejected, identity already registered: {}", email);
            return Err(AppError::DuplicateIdentity);
        }

        let candidate = Candidate {
            name: dto.name.trim().to_string(),
            email: email.clone(),
            phone_number,
            locality: Locality {
                district: dto.district.trim().to_string(),
                taluka: dto.taluka.trim().to_string(),
                police_station: dto.police_station.trim().to_string(),
            },
            password_hash: self.hasher.hash_password(&dto.password).await?,
        };
        let code = self.otp_generator.generate();
        let entry = PendingRegistration::new(candidate, code.clone(), self.clock.now(), dto.ttl);
        self.pending_writer.put(entry).await?;
        self.db_session.commit().await?;
        info!("Signup staged for {}", email);

        spawn_otp_email(Arc::clone(&self.email_sender), email, OtpMessage::Signup, code, dto.ttl);
        Ok(())
    }
}

#[derive(Clone)]
pub struct PromoteRegistrationInteractor {
    db_session: Arc<dyn DBSession>,
    pending_reader: Arc<dyn PendingRegistrationReader>,
    pending_writer: Arc<dyn PendingRegistrationWriter>,
    user_writer: Arc<dyn UserWriter>,
    clock: Arc<dyn Clock>,
}

impl PromoteRegistrationInteractor {
    pub fn new(
        db_session: Arc<dyn DBSession>,
        pending_reader: Arc<dyn PendingRegistrationReader>,
        pending_writer: Arc<dyn PendingRegistrationWriter>,
        user_writer: Arc<dyn UserWriter>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            db_session,
            pending_reader,
            pending_writer,
            user_writer,
            clock,
        }
    }

    pub async fn execute(&self, dto: PromoteRegistrationDTO) -> AppResult<IdDTO> {
        let email = normalize_email(&dto.email);
        let entry = self.pending_reader.find_by_email(&email).await?.ok_or_else(|| {
            warn!("Signup confirmation without a pending entry: {}", email);
            AppError::PendingRegistrationNotFound
        })?;

        let now = self.clock.now();
        if entry.is_expired_at(now) {
            self.pending_writer.delete(&email).await?;
            self.db_session.commit().await?;
            warn!("Signup code expired for {}, entry purged", email);
            return Err(AppError::ChallengeExpired);
        }
        if let Err(err) = entry.check(dto.code.trim(), now) {
            warn!("Signup confirmation rejected for {}: {}", email, err);
            return Err(err);
        }
        if let Some(field) = entry.missing_field() {
            warn!("Pending signup for {} is incomplete: {}", email, field);
            return Err(AppError::Validation(format!("Missing field: {field}")));
        }

        let user_id = match self.user_writer.insert(entry.into_user(now)).await {
            Ok(user_id) => user_id,
            Err(err) => {
                self.db_session.rollback().await?;
                warn!("Signup for {} could not be promoted: {}", email, err);
                return Err(err);
            }
        };
        self.pending_writer.delete(&email).await?;
        self.db_session.commit().await?;
        info!("User {} registered as {}", email, user_id);

        Ok(IdDTO { id: user_id.to_string() })
    }
}
