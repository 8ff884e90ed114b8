use crate::application::ports::{KeyValueStore, QueueStore};
use crate::domain::entities::QueuedRequest;
use crate::shared::error::AppError;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::warn;

/// Fixed key of the general offline request queue.
pub const REQUEST_QUEUE_KEY: &str = "offline_request_queue";
/// Fixed key of the dedicated trip fallback queue.
pub const PENDING_TRIPS_KEY: &str = "pending_trips";

/// Queue persistence over the key-value store: the whole entry list is one
/// JSON array under a fixed key.
pub struct KvQueueStore {
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl KvQueueStore {
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }
}

#[async_trait]
impl QueueStore for KvQueueStore {
    async fn load(&self) -> Result<Vec<QueuedRequest>, AppError> {
        let Some(raw) = self.store.retrieve(&self.key).await? else {
            return Ok(Vec::new());
        };

        match serde_json::from_str::<Vec<QueuedRequest>>(&raw) {
            Ok(entries) => Ok(entries),
            Err(err) => {
                // A malformed payload resets the key instead of propagating.
                warn!("Resetting corrupt queue store {}: {err}", self.key);
                self.store.delete(&self.key).await?;
                Ok(Vec::new())
            }
        }
    }

    async fn save(&self, entries: &[QueuedRequest]) -> Result<(), AppError> {
        let raw = serde_json::to_string(entries)?;
        self.store.store(&self.key, &raw).await
    }

    async fn clear(&self) -> Result<(), AppError> {
        self.store.delete(&self.key).await
    }
}
