use crate::domain::entities::QueuedRequest;
use crate::shared::error::ApiError;
use async_trait::async_trait;

/// Dispatch side of a replay: perform the HTTP call a queue entry
/// describes. Failures come back already classified.
#[async_trait]
pub trait RequestTransport: Send + Sync {
    async fn dispatch(&self, request: &QueuedRequest) -> Result<(), ApiError>;
}
