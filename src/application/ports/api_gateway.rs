use crate::domain::value_objects::HttpMethod;
use crate::shared::error::ApiError;
use async_trait::async_trait;
use serde_json::Value;

/// First-attempt REST surface used by the typed API operations.
#[async_trait]
pub trait ApiGateway: Send + Sync {
    async fn send_json(
        &self,
        method: HttpMethod,
        endpoint: &str,
        body: Option<&Value>,
        idempotency_key: Option<&str>,
    ) -> Result<Value, ApiError>;

    /// Short-timeout connectivity check.
    async fn probe(&self) -> bool;
}
