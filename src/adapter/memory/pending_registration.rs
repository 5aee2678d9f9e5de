use async_trait::async_trait;
use moka::future::Cache;

use crate::application::app_error::AppResult;
use crate::application::interface::gateway::pending_registration::{
    PendingRegistrationReader, PendingRegistrationWriter,
};
use crate::domain::entities::pending_registration::PendingRegistration;

#[derive(Clone)]
pub struct MemoryPendingRegistrationGateway {
    cache: Cache<String, PendingRegistration>,
}

impl MemoryPendingRegistrationGateway {
    pub fn new(cache: Cache<String, PendingRegistration>) -> Self {
        Self { cache }
    }
}

#[async_trait]
impl PendingRegistrationWriter for MemoryPendingRegistrationGateway {
    async fn put(&self, entry: PendingRegistration) -> AppResult<()> {
        self.cache.insert(entry.email.clone(), entry).await;
        Ok(())
    }

    async fn delete(&self, email: &str) -> AppResult<()> {
        self.cache.invalidate(email).await;
        Ok(())
    }
}

#[async_trait]
impl PendingRegistrationReader for MemoryPendingRegistrationGateway {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<PendingRegistration>> {
        Ok(self.cache.get(email).await)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::MemoryPendingRegistrationGateway;
    use crate::adapter::memory::MemoryBackend;
    use crate::application::interface::gateway::pending_registration::{
        PendingRegistrationReader, PendingRegistrationWriter,
    };
    use crate::domain::entities::pending_registration::{Candidate, PendingRegistration};
    use crate::domain::entities::user::Locality;

    fn entry(email: &str, code: &str) -> PendingRegistration {
        let candidate = Candidate {
            name: "Alice".to_string(),
            email: email.to_string(),
            phone_number: "9876543210".to_string(),
            locality: Locality {
                district: "Pune".to_string(),
                taluka: "Haveli".to_string(),
                police_station: "Central".to_string(),
            },
            password_hash: "hash".to_string(),
        };
        PendingRegistration::new(candidate, code.to_string(), Utc::now(), 600)
    }

    #[tokio::test]
    async fn put_overwrites_entry_for_same_email() {
        let gateway = MemoryPendingRegistrationGateway::new(MemoryBackend::new(600).pending());

        gateway.put(entry("alice@x.com", "111111")).await.unwrap();
        gateway.put(entry("alice@x.com", "222222")).await.unwrap();

        let stored = gateway.find_by_email("alice@x.com").await.unwrap().unwrap();
        assert_eq!(stored.code, "222222");
    }

    #[tokio::test]
    async fn delete_removes_entry() {
        let gateway = MemoryPendingRegistrationGateway::new(MemoryBackend::new(600).pending());
        gateway.put(entry("alice@x.com", "111111")).await.unwrap();

        gateway.delete("alice@x.com").await.unwrap();

        assert!(gateway.find_by_email("alice@x.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn expired_entry_outlives_its_code() {
        let gateway = MemoryPendingRegistrationGateway::new(MemoryBackend::new(1).pending());
        gateway.put(entry("alice@x.com", "111111")).await.unwrap();

        tokio::time::sleep(std::time::Duration::from_millis(2_500)).await;

        assert!(gateway.find_by_email("alice@x.com").await.unwrap().is_some());
    }
}
