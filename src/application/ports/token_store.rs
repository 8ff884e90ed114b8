use crate::shared::error::AppError;
use async_trait::async_trait;

/// Cached bearer credential. The queue subsystem only reads; login flows
/// own the writes.
#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn access_token(&self) -> Result<Option<String>, AppError>;
    async fn store_token(&self, token: &str) -> Result<(), AppError>;
    async fn clear_token(&self) -> Result<(), AppError>;
}
