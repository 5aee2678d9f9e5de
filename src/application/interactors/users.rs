use std::sync::Arc;

use crate::application::app_error::{AppError, AppResult};
use crate::application::dto::id::IdDTO;
use crate::application::dto::user::UserDTO;
use crate::application::interface::gateway::user::UserReader;
use crate::domain::entities::id::Id;
use crate::domain::entities::user::User;

#[derive(Clone)]
pub struct GetProfileInteractor {
    user_reader: Arc<dyn UserReader>,
}

impl GetProfileInteractor {
    pub fn new(user_reader: Arc<dyn UserReader>) -> Self {
        Self { user_reader }
    }

    pub async fn execute(&self, dto: IdDTO) -> AppResult<UserDTO> {
        let user_id: Id<User> = dto.id.try_into()?;
        let user = self
            .user_reader
            .find_by_id(&user_id)
            .await?
            .ok_or(AppError::UserNotFound)?;
        Ok(user.into())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::GetProfileInteractor;
    use crate::application::app_error::AppError;
    use crate::application::dto::id::IdDTO;
    use crate::domain::entities::id::Id;
    use crate::tests::fixtures::{TestEnv, env};

    #[rstest]
    #[tokio::test]
    async fn profile_is_returned_without_secrets(env: TestEnv) {
        let user = env.seed_user("alice@x.com", "9876543210", "secret123").await;
        let interactor = GetProfileInteractor::new(env.gateways.user_reader.clone());

        let profile = interactor.execute(IdDTO { id: user.id.to_string() }).await.unwrap();

        assert_eq!(profile.email, "alice@x.com");
        assert_eq!(profile.district, "Pune");
        assert!(profile.is_verified);
        assert!(!profile.is_active);
    }

    #[rstest]
    #[tokio::test]
    async fn missing_user_is_not_found(env: TestEnv) {
        let interactor = GetProfileInteractor::new(env.gateways.user_reader.clone());

        let result = interactor.execute(IdDTO { id: Id::<()>::generate().to_string() }).await;

        assert!(matches!(result, Err(AppError::UserNotFound)));
    }
}
