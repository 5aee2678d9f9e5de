//! Single-process storage used when `storage.driver = "memory"` and by tests.
//!
//! Writes are applied immediately; `commit` has nothing to flush and a
//! dropped unit of work does not roll anything back. Uniqueness and
//! compare-and-delete checks run under the owning write lock, so concurrent
//! requests cannot interleave between the check and the write.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use tokio::sync::RwLock;

use crate::application::app_error::AppResult;
use crate::application::interface::db::DBSession;
use crate::domain::entities::id::Id;
use crate::domain::entities::otp_challenge::{ChallengePurpose, OtpChallenge};
use crate::domain::entities::pending_registration::{EXPIRED_RETENTION_SECONDS, PendingRegistration};
use crate::domain::entities::user::User;

pub mod challenge;
pub mod pending_registration;
pub mod user;

const PENDING_MAX_CAPACITY: u64 = 100_000;

#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<Id<User>, User>>,
    challenges: RwLock<HashMap<(Id<User>, ChallengePurpose), OtpChallenge>>,
}

#[derive(Clone)]
pub struct MemoryBackend {
    store: Arc<MemoryStore>,
    pending: Cache<String, PendingRegistration>,
}

impl MemoryBackend {
    /// Pending signups are evicted `EXPIRED_RETENTION_SECONDS` after their
    /// code expires, the same window the Postgres ledger sweeps on. Until then
    /// an expired entry is still found and rejected as expired. Eviction runs
    /// on wall time, not on the injected clock.
    pub fn new(otp_ttl_seconds: i64) -> Self {
        let lifetime = otp_ttl_seconds.max(1) + EXPIRED_RETENTION_SECONDS;
        let pending = Cache::builder()
            .max_capacity(PENDING_MAX_CAPACITY)
            .time_to_live(Duration::from_secs(lifetime.unsigned_abs()))
            .build();

        Self {
            store: Arc::new(MemoryStore::default()),
            pending,
        }
    }

    pub fn store(&self) -> Arc<MemoryStore> {
        Arc::clone(&self.store)
    }

    pub fn pending(&self) -> Cache<String, PendingRegistration> {
        self.pending.clone()
    }
}

#[derive(Clone, Default)]
pub struct MemorySession;

#[async_trait]
impl DBSession for MemorySession {
    async fn commit(&self) -> AppResult<()> {
        Ok(())
    }

    async fn rollback(&self) -> AppResult<()> {
        Ok(())
    }
}
