use async_trait::async_trait;
use futures::FutureExt;
use sqlx::Row;
use sqlx::postgres::PgRow;

use crate::adapter::db::session::SqlxSession;
use crate::application::app_error::AppResult;
use crate::application::interface::gateway::challenge::{ChallengeReader, ChallengeWriter};
use crate::domain::entities::id::Id;
use crate::domain::entities::otp_challenge::{ChallengePurpose, OtpChallenge};
use crate::domain::entities::user::User;

#[derive(Clone)]
pub struct ChallengeGateway {
    session: SqlxSession,
}

impl ChallengeGateway {
    pub fn new(session: SqlxSession) -> Self {
        Self { session }
    }

    fn get_challenge(row: &PgRow) -> AppResult<OtpChallenge> {
        let purpose: String = row.try_get("purpose")?;
        Ok(OtpChallenge {
            id: Id::new(row.try_get("id")?),
            user_id: Id::new(row.try_get("user_id")?),
            purpose: ChallengePurpose::try_from(purpose.as_str())?,
            code: row.try_get("code")?,
            expires_at: row.try_get("expires_at")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

#[async_trait]
impl ChallengeWriter for ChallengeGateway {
    async fn upsert(&self, challenge: OtpChallenge) -> AppResult<()> {
        self.session
            .with_tx(move |tx| {
                async move {
                    sqlx::query(
                        r#"
                            INSERT INTO otp_challenges
                                (id, user_id, purpose, code, expires_at, created_at)
                            VALUES
                                ($1, $2, $3, $4, $5, $6)
                            ON CONFLICT (user_id, purpose) DO UPDATE
                            SET
                                id = EXCLUDED.id,
                                code = EXCLUDED.code,
                                expires_at = EXCLUDED.expires_at,
                                created_at = EXCLUDED.created_at
                        "#,
                    )
                    .bind(challenge.id.value)
                    .bind(challenge.user_id.value)
                    .bind(challenge.purpose.as_str())
                    .bind(&challenge.code)
                    .bind(challenge.expires_at)
                    .bind(challenge.created_at)
                    .execute(tx.as_mut())
                    .await?;
                    Ok(())
                }
                .boxed()
            })
            .await
    }

    async fn consume(&self, challenge_id: &Id<OtpChallenge>) -> AppResult<bool> {
        let challenge_id = *challenge_id;
        self.session
            .with_tx(move |tx| {
                async move {
                    let deleted = sqlx::query(
                        r#"
                            DELETE FROM
                                otp_challenges
                            WHERE
                                id = $1
                            RETURNING
                                id
                        "#,
                    )
                    .bind(challenge_id.value)
                    .fetch_optional(tx.as_mut())
                    .await?;
                    Ok(deleted.is_some())
                }
                .boxed()
            })
            .await
    }
}

#[async_trait]
impl ChallengeReader for ChallengeGateway {
    async fn find(&self, user_id: &Id<User>, purpose: ChallengePurpose) -> AppResult<Option<OtpChallenge>> {
        let user_id = *user_id;
        self.session
            .with_tx(move |tx| {
                async move {
                    let row = sqlx::query(
                        r#"
                            SELECT
                                id, user_id, purpose, code, expires_at, created_at
                            FROM
                                otp_challenges
                            WHERE user_id = $1 AND purpose = $2
                        "#,
                    )
                    .bind(user_id.value)
                    .bind(purpose.as_str())
                    .fetch_optional(tx.as_mut())
                    .await?;
                    row.as_ref().map(Self::get_challenge).transpose()
                }
                .boxed()
            })
            .await
    }
}
