use async_trait::async_trait;
use futures::FutureExt;
use sqlx::Row;
use sqlx::postgres::PgRow;

use crate::adapter::db::session::SqlxSession;
use crate::application::app_error::AppResult;
use crate::application::interface::gateway::pending_registration::{
    PendingRegistrationReader, PendingRegistrationWriter,
};
use crate::domain::entities::id::Id;
use crate::domain::entities::pending_registration::PendingRegistration;
use crate::domain::entities::user::Locality;

/// Durable ledger of signups awaiting their code, one row per email.
/// Staging sweeps entries whose code expired more than the retention window ago.
#[derive(Clone)]
pub struct PendingRegistrationGateway {
    session: SqlxSession,
}

impl PendingRegistrationGateway {
    pub fn new(session: SqlxSession) -> Self {
        Self { session }
    }

    fn get_entry(row: &PgRow) -> AppResult<PendingRegistration> {
        Ok(PendingRegistration {
            id: Id::new(row.try_get("id")?),
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            phone_number: row.try_get("phone_number")?,
            locality: Locality {
                district: row.try_get("district")?,
                taluka: row.try_get("taluka")?,
                police_station: row.try_get("police_station")?,
            },
            password_hash: row.try_get("password_hash")?,
            code: row.try_get("code")?,
            expires_at: row.try_get("expires_at")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

#[async_trait]
impl PendingRegistrationWriter for PendingRegistrationGateway {
    async fn put(&self, entry: PendingRegistration) -> AppResult<()> {
        self.session
            .with_tx(move |tx| {
                async move {
                    sqlx::query("DELETE FROM pending_registrations WHERE expires_at < $1 AND email <> $2")
                        .bind(PendingRegistration::sweep_horizon(entry.created_at))
                        .bind(&entry.email)
                        .execute(tx.as_mut())
                        .await?;
                    sqlx::query(
                        r#"
                            INSERT INTO pending_registrations
                                (id, email, name, phone_number, district, taluka, police_station,
                                 password_hash, code, expires_at, created_at)
                            VALUES
                                ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
                            ON CONFLICT (email) DO UPDATE
                            SET
                                id = EXCLUDED.id,
                                name = EXCLUDED.name,
                                phone_number = EXCLUDED.phone_number,
                                district = EXCLUDED.district,
                                taluka = EXCLUDED.taluka,
                                police_station = EXCLUDED.police_station,
                                password_hash = EXCLUDED.password_hash,
                                code = EXCLUDED.code,
                                expires_at = EXCLUDED.expires_at,
                                created_at = EXCLUDED.created_at
                        "#,
                    )
                    .bind(entry.id.value)
                    .bind(&entry.email)
                    .bind(&entry.name)
                    .bind(&entry.phone_number)
                    .bind(&entry.locality.district)
                    .bind(&entry.locality.taluka)
                    .bind(&entry.locality.police_station)
                    .bind(&entry.password_hash)
                    .bind(&entry.code)
                    .bind(entry.expires_at)
                    .bind(entry.created_at)
                    .execute(tx.as_mut())
                    .await?;
                    Ok(())
                }
                .boxed()
            })
            .await
    }

    async fn delete(&self, email: &str) -> AppResult<()> {
        let email = email.to_owned();
        self.session
            .with_tx(move |tx| {
                async move {
                    sqlx::query("DELETE FROM pending_registrations WHERE email = $1")
                        .bind(&email)
                        .execute(tx.as_mut())
                        .await?;
                    Ok(())
                }
                .boxed()
            })
            .await
    }
}

#[async_trait]
impl PendingRegistrationReader for PendingRegistrationGateway {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<PendingRegistration>> {
        let email = email.to_owned();
        self.session
            .with_tx(move |tx| {
                async move {
                    let row = sqlx::query(
                        r#"
                            SELECT
                                id, email, name, phone_number, district, taluka, police_station,
                                password_hash, code, expires_at, created_at
                            FROM
                                pending_registrations
                            WHERE email = $1
                        "#,
                    )
                    .bind(&email)
                    .fetch_optional(tx.as_mut())
                    .await?;
                    row.as_ref().map(Self::get_entry).transpose()
                }
                .boxed()
            })
            .await
    }
}
