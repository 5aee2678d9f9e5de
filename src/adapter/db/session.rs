use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;
use sqlx::{PgPool, Postgres, Transaction};
use tokio::sync::Mutex;
use tracing::debug;

use crate::application::app_error::{AppError, AppResult};
use crate::application::interface::db::DBSession;

struct SessionInner {
    pool: PgPool,
    transaction: Option<Transaction<'static, Postgres>>,
}

/// One request's unit of work. The transaction is opened by the first
/// gateway call and shared by every gateway holding a clone; if the owner
/// never commits, dropping the last clone rolls it back.
#[derive(Clone)]
pub struct SqlxSession {
    inner: Arc<Mutex<SessionInner>>,
}

impl SqlxSession {
    pub fn new_lazy(pool: PgPool) -> Self {
        Self {
            inner: Arc::new(Mutex::new(SessionInner {
                pool,
                transaction: None,
            })),
        }
    }

    pub async fn with_tx<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(&'a mut Transaction<'static, Postgres>) -> BoxFuture<'a, AppResult<T>>,
    {
        let mut inner = self.inner.lock().await;
        if inner.transaction.is_none() {
            let tx = inner.pool.begin().await?;
            debug!("Transaction opened");
            inner.transaction = Some(tx);
        }
        let tx = inner
            .transaction
            .as_mut()
            .ok_or(AppError::DatabaseError(sqlx::Error::PoolClosed))?;
        f(tx).await
    }
}

#[async_trait]
impl DBSession for SqlxSession {
    async fn commit(&self) -> AppResult<()> {
        let mut inner = self.inner.lock().await;
        if let Some(tx) = inner.transaction.take() {
            tx.commit().await?;
            debug!("Transaction committed");
        }
        Ok(())
    }

    async fn rollback(&self) -> AppResult<()> {
        let mut inner = self.inner.lock().await;
        if let Some(tx) = inner.transaction.take() {
            tx.rollback().await?;
            debug!("Transaction rolled back");
        }
        Ok(())
    }
}
