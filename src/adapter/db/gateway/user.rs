use std::collections::HashMap;

use async_trait::async_trait;
use futures::FutureExt;
use sqlx::postgres::PgRow;
use sqlx::{Postgres, Row, Transaction};
use uuid::Uuid;

use crate::adapter::db::session::SqlxSession;
use crate::application::app_error::{AppError, AppResult};
use crate::application::interface::gateway::user::{UserFilter, UserReader, UserWriter};
use crate::domain::entities::activity::{ActivityEntry, ActivityKind};
use crate::domain::entities::id::Id;
use crate::domain::entities::user::{Locality, User};

const USER_COLUMNS: &str = r#"
    id, name, email, phone_number, district, taluka, police_station, password, is_verified,
    registered_at, last_login, last_logout, logout_count, created_at, updated_at
"#;

#[derive(Clone)]
pub struct UserGateway {
    session: SqlxSession,
}

impl UserGateway {
    pub fn new(session: SqlxSession) -> Self {
        Self { session }
    }

    fn get_user(row: &PgRow) -> AppResult<User> {
        Ok(User {
            id: Id::new(row.try_get("id")?),
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            phone_number: row.try_get("phone_number")?,
            locality: Locality {
                district: row.try_get("district")?,
                taluka: row.try_get("taluka")?,
                police_station: row.try_get("police_station")?,
            },
            password: row.try_get("password")?,
            is_verified: row.try_get("is_verified")?,
            registered_at: row.try_get("registered_at")?,
            last_login: row.try_get("last_login")?,
            last_logout: row.try_get("last_logout")?,
            login_history: Vec::new(),
            logout_history: Vec::new(),
            logout_count: row.try_get("logout_count")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    /// Fills login and logout histories, oldest event first.
    async fn attach_history(tx: &mut Transaction<'static, Postgres>, users: &mut [User]) -> AppResult<()> {
        if users.is_empty() {
            return Ok(());
        }
        let ids: Vec<Uuid> = users.iter().map(|user| user.id.value).collect();
        let rows = sqlx::query(
            r#"
                SELECT
                    user_id, kind, occurred_at, origin
                FROM
                    activity_events
                WHERE user_id = ANY($1)
                ORDER BY occurred_at, id
            "#,
        )
        .bind(&ids)
        .fetch_all(tx.as_mut())
        .await?;

        let mut index: HashMap<Uuid, usize> = HashMap::with_capacity(users.len());
        for (position, user) in users.iter().enumerate() {
            index.insert(user.id.value, position);
        }
        for row in rows {
            let user_id: Uuid = row.try_get("user_id")?;
            let Some(&position) = index.get(&user_id) else {
                continue;
            };
            let kind: String = row.try_get("kind")?;
            let entry = ActivityEntry::new(row.try_get("occurred_at")?, row.try_get("origin")?);
            match ActivityKind::try_from(kind.as_str())? {
                ActivityKind::Login => users[position].login_history.push(entry),
                ActivityKind::Logout => users[position].logout_history.push(entry),
            }
        }
        Ok(())
    }

    async fn find_one(&self, column: &'static str, value: String) -> AppResult<Option<User>> {
        self.session
            .with_tx(move |tx| {
                async move {
                    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE {column} = $1");
                    let row = sqlx::query(&sql).bind(&value).fetch_optional(tx.as_mut()).await?;
                    let Some(row) = row else {
                        return Ok(None);
                    };
                    let mut users = vec![Self::get_user(&row)?];
                    Self::attach_history(tx, &mut users).await?;
                    Ok(users.pop())
                }
                .boxed()
            })
            .await
    }
}

fn map_unique_violation(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => AppError::DuplicateIdentity,
        _ => AppError::DatabaseError(err),
    }
}

#[async_trait]
impl UserWriter for UserGateway {
    async fn insert(&self, user: User) -> AppResult<Id<User>> {
        self.session
            .with_tx(|tx| {
                async move {
                    let result = sqlx::query(
                        r#"
                            INSERT INTO users
                                (id, name, email, phone_number, district, taluka, police_station, password,
                                 is_verified, registered_at, logout_count, created_at, updated_at)
                            VALUES
                                ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
                            RETURNING
                                id
                        "#,
                    )
                    .bind(user.id.value)
                    .bind(&user.name)
                    .bind(&user.email)
                    .bind(&user.phone_number)
                    .bind(&user.locality.district)
                    .bind(&user.locality.taluka)
                    .bind(&user.locality.police_station)
                    .bind(&user.password)
                    .bind(user.is_verified)
                    .bind(user.registered_at)
                    .bind(user.logout_count)
                    .bind(user.created_at)
                    .bind(user.updated_at)
                    .fetch_one(tx.as_mut())
                    .await
                    .map_err(map_unique_violation)?;
                    let id: Uuid = result.try_get("id")?;
                    Ok(Id::new(id))
                }
                .boxed()
            })
            .await
    }

    async fn update_password(&self, user_id: &Id<User>, password_hash: &str) -> AppResult<()> {
        let user_id = *user_id;
        let password_hash = password_hash.to_owned();
        self.session
            .with_tx(move |tx| {
                async move {
                    let result = sqlx::query(
                        r#"
                            UPDATE
                                users
                            SET
                                password = $2, updated_at = NOW()
                            WHERE
                                id = $1
                        "#,
                    )
                    .bind(user_id.value)
                    .bind(&password_hash)
                    .execute(tx.as_mut())
                    .await?;
                    if result.rows_affected() == 0 {
                        return Err(AppError::UserNotFound);
                    }
                    Ok(())
                }
                .boxed()
            })
            .await
    }
}

#[async_trait]
impl UserReader for UserGateway {
    async fn find_by_id(&self, user_id: &Id<User>) -> AppResult<Option<User>> {
        let user_id = *user_id;
        self.session
            .with_tx(move |tx| {
                async move {
                    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
                    let row = sqlx::query(&sql).bind(user_id.value).fetch_optional(tx.as_mut()).await?;
                    let Some(row) = row else {
                        return Ok(None);
                    };
                    let mut users = vec![Self::get_user(&row)?];
                    Self::attach_history(tx, &mut users).await?;
                    Ok(users.pop())
                }
                .boxed()
            })
            .await
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        self.find_one("email", email.to_owned()).await
    }

    async fn exists_by_email_or_phone(&self, email: &str, phone_number: &str) -> AppResult<bool> {
        let email = email.to_owned();
        let phone_number = phone_number.to_owned();
        self.session
            .with_tx(move |tx| {
                async move {
                    let result = sqlx::query(
                        r#"
                            SELECT EXISTS(
                                SELECT
                                    id
                                FROM
                                    users
                                WHERE email = $1 OR phone_number = $2
                            ) AS is_user
                        "#,
                    )
                    .bind(&email)
                    .bind(&phone_number)
                    .fetch_one(tx.as_mut())
                    .await?;
                    Ok(result.try_get("is_user")?)
                }
                .boxed()
            })
            .await
    }

    async fn list(&self, filter: &UserFilter) -> AppResult<Vec<User>> {
        let filter = filter.clone();
        self.session
            .with_tx(move |tx| {
                async move {
                    let sql = format!(
                        r#"
                            SELECT {USER_COLUMNS}
                            FROM
                                users
                            WHERE ($1::text IS NULL OR district = $1)
                              AND ($2::text IS NULL OR taluka = $2)
                              AND ($3::text IS NULL OR police_station = $3)
                              AND ($4::timestamptz IS NULL OR registered_at >= $4)
                              AND ($5::timestamptz IS NULL OR registered_at <= $5)
                            ORDER BY registered_at, id
                        "#
                    );
                    let rows = sqlx::query(&sql)
                        .bind(&filter.district)
                        .bind(&filter.taluka)
                        .bind(&filter.police_station)
                        .bind(filter.registered_from)
                        .bind(filter.registered_to)
                        .fetch_all(tx.as_mut())
                        .await?;
                    let mut users = rows.iter().map(Self::get_user).collect::<AppResult<Vec<_>>>()?;
                    Self::attach_history(tx, &mut users).await?;
                    Ok(users)
                }
                .boxed()
            })
            .await
    }
}
