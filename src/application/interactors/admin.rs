use std::cmp::Reverse;
use std::sync::Arc;

use tracing::{info, warn};

use crate::application::app_error::{AppError, AppResult};
use crate::application::dto::admin::{UserOverviewDTO, UserQueryDTO};
use crate::application::dto::id::IdDTO;
use crate::application::dto::user::UserDTO;
use crate::application::interface::gateway::user::{UserFilter, UserReader};
use crate::domain::entities::id::Id;
use crate::domain::entities::user::User;

/// Read-only reports over registered users. Active status is derived from
/// the stored timestamps on every call.
#[derive(Clone)]
pub struct ListUsersInteractor {
    user_reader: Arc<dyn UserReader>,
}

impl ListUsersInteractor {
    pub fn new(user_reader: Arc<dyn UserReader>) -> Self {
        Self { user_reader }
    }

    pub async fn execute(&self, query: UserQueryDTO) -> AppResult<Vec<UserDTO>> {
        let users = self.select(query).await?;
        Ok(users.into_iter().map(UserDTO::from).collect())
    }

    async fn select(&self, query: UserQueryDTO) -> AppResult<Vec<User>> {
        let users = match query {
            UserQueryDTO::All => self.user_reader.list(&UserFilter::default()).await?,
            UserQueryDTO::LoggedIn => self
                .user_reader
                .list(&UserFilter::default())
                .await?
                .into_iter()
                .filter(|user| user.last_login.is_some())
                .collect(),
            UserQueryDTO::Active => self
                .user_reader
                .list(&UserFilter::default())
                .await?
                .into_iter()
                .filter(User::is_active)
                .collect(),
            UserQueryDTO::Location {
                district,
                taluka,
                police_station,
            } => {
                let filter = UserFilter {
                    district,
                    taluka,
                    police_station,
                    ..UserFilter::default()
                };
                self.user_reader.list(&filter).await?
            }
            UserQueryDTO::RegisteredBetween { from, to } => {
                if from > to {
                    warn!("Rejected date range {} .. {}", from, to);
                    return Err(AppError::Validation("startDate must not be after endDate".to_string()));
                }
                let filter = UserFilter {
                    registered_from: Some(from),
                    registered_to: Some(to),
                    ..UserFilter::default()
                };
                self.user_reader.list(&filter).await?
            }
            UserQueryDTO::TopActive { limit } => {
                let mut users = self.user_reader.list(&UserFilter::default()).await?;
                // Stable sort keeps registration order among equal counts.
                users.sort_by_key(|user| Reverse(user.login_count()));
                users.truncate(limit);
                users
            }
        };
        info!("Admin report returned {} users", users.len());
        Ok(users)
    }
}

#[derive(Clone)]
pub struct GetUserOverviewInteractor {
    user_reader: Arc<dyn UserReader>,
}

impl GetUserOverviewInteractor {
    pub fn new(user_reader: Arc<dyn UserReader>) -> Self {
        Self { user_reader }
    }

    pub async fn execute(&self) -> AppResult<Vec<UserOverviewDTO>> {
        let users = self.user_reader.list(&UserFilter::default()).await?;
        Ok(users.into_iter().map(UserOverviewDTO::from).collect())
    }
}

#[derive(Clone)]
pub struct GetUserByIdInteractor {
    user_reader: Arc<dyn UserReader>,
}

impl GetUserByIdInteractor {
    pub fn new(user_reader: Arc<dyn UserReader>) -> Self {
        Self { user_reader }
    }

    pub async fn execute(&self, dto: IdDTO) -> AppResult<UserDTO> {
        let user_id: Id<User> = dto.id.try_into()?;
        self.user_reader
            .find_by_id(&user_id)
            .await?
            .map(UserDTO::from)
            .ok_or(AppError::UserNotFound)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use rstest::{fixture, rstest};

    use super::{GetUserByIdInteractor, GetUserOverviewInteractor, ListUsersInteractor};
    use crate::application::app_error::AppError;
    use crate::application::dto::admin::UserQueryDTO;
    use crate::application::dto::id::IdDTO;
    use crate::application::interface::gateway::activity::ActivityWriter;
    use crate::domain::entities::activity::ActivityEntry;
    use crate::domain::entities::user::User;
    use crate::tests::fixtures::{TestEnv, env};
    use crate::tests::helpers::epoch;

    struct Seeded {
        env: TestEnv,
        alice: User,
        bob: User,
        carol: User,
    }

    fn at(minutes: i64) -> ActivityEntry {
        ActivityEntry::new(epoch() + Duration::minutes(minutes), Some(format!("10.0.0.{minutes}")))
    }

    /// alice: 3 logins, still active. bob: 1 login then logout. carol: never logged in.
    #[fixture]
    async fn seeded(env: TestEnv) -> Seeded {
        let alice = env.seed_user("alice@x.com", "1111111111", "secret123").await;
        env.clock.advance(Duration::days(1));
        let bob = env.seed_user_in("bob@x.com", "2222222222", "Nashik").await;
        env.clock.advance(Duration::days(1));
        let carol = env.seed_user("carol@x.com", "3333333333", "secret123").await;

        let activity = &env.gateways.activity_writer;
        for minute in [1, 2, 3] {
            activity.record_login(&alice.id, at(minute)).await.unwrap();
        }
        activity.record_login(&bob.id, at(4)).await.unwrap();
        activity.record_logout(&bob.id, at(5)).await.unwrap();

        Seeded { env, alice, bob, carol }
    }

    fn emails(users: &[crate::application::dto::user::UserDTO]) -> Vec<&str> {
        users.iter().map(|user| user.email.as_str()).collect()
    }

    fn list(seeded: &Seeded) -> ListUsersInteractor {
        ListUsersInteractor::new(seeded.env.gateways.user_reader.clone())
    }

    #[rstest]
    #[tokio::test]
    async fn all_users_in_registration_order(#[future] seeded: Seeded) {
        let seeded = seeded.await;

        let users = list(&seeded).execute(UserQueryDTO::All).await.unwrap();

        assert_eq!(emails(&users), ["alice@x.com", "bob@x.com", "carol@x.com"]);
    }

    #[rstest]
    #[tokio::test]
    async fn logged_in_and_active_differ(#[future] seeded: Seeded) {
        let seeded = seeded.await;

        let logged_in = list(&seeded).execute(UserQueryDTO::LoggedIn).await.unwrap();
        let active = list(&seeded).execute(UserQueryDTO::Active).await.unwrap();

        assert_eq!(emails(&logged_in), ["alice@x.com", "bob@x.com"]);
        assert_eq!(emails(&active), ["alice@x.com"]);
    }

    #[rstest]
    #[tokio::test]
    async fn location_filter_matches_exactly(#[future] seeded: Seeded) {
        let seeded = seeded.await;

        let users = list(&seeded)
            .execute(UserQueryDTO::Location {
                district: Some("Nashik".to_string()),
                taluka: None,
                police_station: None,
            })
            .await
            .unwrap();

        assert_eq!(emails(&users), ["bob@x.com"]);
    }

    #[rstest]
    #[tokio::test]
    async fn date_range_is_inclusive(#[future] seeded: Seeded) {
        let seeded = seeded.await;

        let users = list(&seeded)
            .execute(UserQueryDTO::RegisteredBetween {
                from: seeded.bob.registered_at,
                to: seeded.carol.registered_at,
            })
            .await
            .unwrap();

        assert_eq!(emails(&users), ["bob@x.com", "carol@x.com"]);
    }

    #[rstest]
    #[tokio::test]
    async fn inverted_date_range_is_rejected(#[future] seeded: Seeded) {
        let seeded = seeded.await;

        let result = list(&seeded)
            .execute(UserQueryDTO::RegisteredBetween {
                from: seeded.carol.registered_at,
                to: seeded.alice.registered_at,
            })
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[rstest]
    #[tokio::test]
    async fn top_active_orders_by_login_count(#[future] seeded: Seeded) {
        let seeded = seeded.await;

        let users = list(&seeded).execute(UserQueryDTO::TopActive { limit: 2 }).await.unwrap();

        assert_eq!(emails(&users), ["alice@x.com", "bob@x.com"]);
        assert_eq!(users[0].login_history.len(), 3);
    }

    #[rstest]
    #[tokio::test]
    async fn overview_summarizes_activity(#[future] seeded: Seeded) {
        let seeded = seeded.await;

        let overview = GetUserOverviewInteractor::new(seeded.env.gateways.user_reader.clone())
            .execute()
            .await
            .unwrap();

        let alice = overview.iter().find(|row| row.email == "alice@x.com").unwrap();
        let bob = overview.iter().find(|row| row.email == "bob@x.com").unwrap();
        assert_eq!(alice.login_count, 3);
        assert_eq!(alice.last_known_ip.as_deref(), Some("10.0.0.3"));
        assert!(alice.is_active);
        assert_eq!(bob.logout_count, 1);
        assert!(!bob.is_active);
    }

    #[rstest]
    #[tokio::test]
    async fn user_by_id(#[future] seeded: Seeded) {
        let seeded = seeded.await;
        let interactor = GetUserByIdInteractor::new(seeded.env.gateways.user_reader.clone());

        let found = interactor.execute(IdDTO { id: seeded.bob.id.to_string() }).await.unwrap();
        let bad = interactor.execute(IdDTO { id: "nope".to_string() }).await;

        assert_eq!(found.email, "bob@x.com");
        assert!(matches!(bad, Err(AppError::InvalidId(_))));
    }
}
