use crate::shared::error::AppError;
use async_trait::async_trait;

/// Durable keyed document storage. Values are opaque strings; callers own
/// serialization.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn store(&self, key: &str, value: &str) -> Result<(), AppError>;
    async fn retrieve(&self, key: &str) -> Result<Option<String>, AppError>;
    async fn delete(&self, key: &str) -> Result<(), AppError>;
    async fn exists(&self, key: &str) -> Result<bool, AppError>;
}
