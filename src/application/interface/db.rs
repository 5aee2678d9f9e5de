use async_trait::async_trait;

use crate::application::app_error::AppResult;

/// Unit of work shared by the gateways of one interactor. Nothing written
/// through those gateways is durable until `commit` succeeds.
#[async_trait]
pub trait DBSession: Send + Sync {
    async fn commit(&self) -> AppResult<()>;
    async fn rollback(&self) -> AppResult<()>;
}
