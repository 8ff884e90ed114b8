use crate::domain::entities::QueuedRequest;
use crate::shared::error::AppError;
use async_trait::async_trait;

/// Persistence contract for one queue instance. The whole entry list lives
/// under a single fixed key and is rewritten wholesale on save; `load` must
/// never surface malformed stored data (it resets the key instead).
#[async_trait]
pub trait QueueStore: Send + Sync {
    async fn load(&self) -> Result<Vec<QueuedRequest>, AppError>;
    async fn save(&self, entries: &[QueuedRequest]) -> Result<(), AppError>;
    async fn clear(&self) -> Result<(), AppError>;
}
