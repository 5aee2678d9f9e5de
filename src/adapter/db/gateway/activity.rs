use async_trait::async_trait;
use futures::FutureExt;
use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use crate::adapter::db::session::SqlxSession;
use crate::application::app_error::{AppError, AppResult};
use crate::application::interface::gateway::activity::ActivityWriter;
use crate::domain::entities::activity::{ActivityEntry, ActivityKind};
use crate::domain::entities::id::Id;
use crate::domain::entities::user::User;

#[derive(Clone)]
pub struct ActivityGateway {
    session: SqlxSession,
}

impl ActivityGateway {
    pub fn new(session: SqlxSession) -> Self {
        Self { session }
    }

    async fn append(
        tx: &mut Transaction<'static, Postgres>,
        user_id: Id<User>,
        kind: ActivityKind,
        entry: &ActivityEntry,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
                INSERT INTO activity_events
                    (id, user_id, kind, occurred_at, origin)
                VALUES
                    ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(user_id.value)
        .bind(kind.as_str())
        .bind(entry.at)
        .bind(&entry.origin)
        .execute(tx.as_mut())
        .await?;
        Ok(())
    }
}

#[async_trait]
impl ActivityWriter for ActivityGateway {
    async fn record_login(&self, user_id: &Id<User>, entry: ActivityEntry) -> AppResult<()> {
        let user_id = *user_id;
        self.session
            .with_tx(move |tx| {
                async move {
                    let result = sqlx::query(
                        r#"
                            UPDATE
                                users
                            SET
                                last_login = $2, updated_at = $2
                            WHERE
                                id = $1
                        "#,
                    )
                    .bind(user_id.value)
                    .bind(entry.at)
                    .execute(tx.as_mut())
                    .await?;
                    if result.rows_affected() == 0 {
                        return Err(AppError::UserNotFound);
                    }
                    Self::append(tx, user_id, ActivityKind::Login, &entry).await
                }
                .boxed()
            })
            .await
    }

    async fn record_logout(&self, user_id: &Id<User>, entry: ActivityEntry) -> AppResult<()> {
        let user_id = *user_id;
        self.session
            .with_tx(move |tx| {
                async move {
                    let result = sqlx::query(
                        r#"
                            UPDATE
                                users
                            SET
                                last_logout = $2, updated_at = $2, logout_count = logout_count + 1
                            WHERE
                                id = $1
                        "#,
                    )
                    .bind(user_id.value)
                    .bind(entry.at)
                    .execute(tx.as_mut())
                    .await?;
                    if result.rows_affected() == 0 {
                        return Err(AppError::UserNotFound);
                    }
                    Self::append(tx, user_id, ActivityKind::Logout, &entry).await
                }
                .boxed()
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Duration, Utc};
    use rstest::rstest;
    use serial_test::serial;
    use sqlx::{PgPool, Row};

    use super::ActivityGateway;
    use crate::adapter::db::gateway::user::UserGateway;
    use crate::adapter::db::session::SqlxSession;
    use crate::application::app_error::AppError;
    use crate::application::interface::db::DBSession;
    use crate::application::interface::gateway::activity::ActivityWriter;
    use crate::application::interface::gateway::user::{UserReader, UserWriter};
    use crate::domain::entities::activity::ActivityEntry;
    use crate::domain::entities::id::Id;
    use crate::domain::entities::user::{Locality, User};
    use crate::tests::fixtures::pg_pool;
    use crate::tests::helpers::{unique_email, unique_phone};

    async fn stored_user(pool: &PgPool) -> User {
        let user = User::new(
            "Activity Test".to_string(),
            unique_email(),
            unique_phone(),
            Locality {
                district: "Pune".to_string(),
                taluka: "Haveli".to_string(),
                police_station: "Central".to_string(),
            },
            "hash".to_string(),
            Utc::now(),
        );
        let session = SqlxSession::new_lazy(pool.clone());
        UserGateway::new(session.clone()).insert(user.clone()).await.unwrap();
        session.commit().await.unwrap();
        user
    }

    async fn delete_user(pool: &PgPool, user: &User) {
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user.id.value)
            .execute(pool)
            .await
            .unwrap();
    }

    #[rstest]
    #[tokio::test]
    #[serial]
    #[ignore = "needs TEST_DATABASE_URL"]
    async fn each_logout_bumps_the_counter(#[future] pg_pool: PgPool) {
        let pool = pg_pool.await;
        let user = stored_user(&pool).await;
        let login_at = DateTime::from_timestamp(Utc::now().timestamp(), 0).unwrap();
        let first_logout = login_at + Duration::minutes(5);
        let second_logout = login_at + Duration::minutes(10);

        let session = SqlxSession::new_lazy(pool.clone());
        let gateway = ActivityGateway::new(session.clone());
        gateway
            .record_login(&user.id, ActivityEntry::new(login_at, Some("10.0.0.5".to_string())))
            .await
            .unwrap();
        gateway.record_logout(&user.id, ActivityEntry::new(first_logout, None)).await.unwrap();
        gateway.record_logout(&user.id, ActivityEntry::new(second_logout, None)).await.unwrap();
        session.commit().await.unwrap();

        let found = UserGateway::new(SqlxSession::new_lazy(pool.clone()))
            .find_by_email(&user.email)
            .await
            .unwrap()
            .unwrap();
        let events: i64 = sqlx::query("SELECT COUNT(*) AS n FROM activity_events WHERE user_id = $1")
            .bind(user.id.value)
            .fetch_one(&pool)
            .await
            .unwrap()
            .get("n");

        delete_user(&pool, &user).await;
        assert_eq!(found.logout_count, 2);
        assert_eq!(found.logout_history.len(), 2);
        assert_eq!(found.last_logout, Some(second_logout));
        assert_eq!(found.last_login, Some(login_at));
        assert_eq!(events, 3);
    }

    #[rstest]
    #[tokio::test]
    #[serial]
    #[ignore = "needs TEST_DATABASE_URL"]
    async fn unknown_user_is_reported(#[future] pg_pool: PgPool) {
        let pool = pg_pool.await;
        let gateway = ActivityGateway::new(SqlxSession::new_lazy(pool.clone()));
        let missing: Id<User> = Id::generate();

        let login = gateway.record_login(&missing, ActivityEntry::new(Utc::now(), None)).await;
        let logout = gateway.record_logout(&missing, ActivityEntry::new(Utc::now(), None)).await;

        assert!(matches!(login, Err(AppError::UserNotFound)));
        assert!(matches!(logout, Err(AppError::UserNotFound)));
    }
}
