use crate::application::services::api_service::ApiService;
use crate::application::services::queue_service::RequestQueue;
use crate::domain::entities::{QueuedRequestDraft, TripPayload};
use crate::domain::value_objects::{HttpMethod, Priority, RequestKind};
use crate::infrastructure::api::endpoints;
use crate::shared::error::AppError;
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

/// Belt-and-suspenders path around the single highest-value mutation.
///
/// A trip save that fails offline is already captured by the general queue
/// through the call wrapper; this service additionally mirrors it into the
/// dedicated pending-trips queue, so the record survives even if the
/// general queue is cleared or exhausted.
pub struct TripService {
    api: Arc<ApiService>,
    trip_queue: Arc<RequestQueue>,
}

impl TripService {
    pub fn new(api: Arc<ApiService>, trip_queue: Arc<RequestQueue>) -> Self {
        Self { api, trip_queue }
    }

    pub async fn save_trip_with_sync(&self, trip: &TripPayload) -> Result<Value, AppError> {
        match self.api.save_trip(trip).await {
            Ok(value) => Ok(value),
            Err(err @ AppError::QueuedOffline(_)) => {
                let draft = QueuedRequestDraft {
                    kind: RequestKind::SaveTrip,
                    endpoint: endpoints::TRIPS.to_string(),
                    method: HttpMethod::Post,
                    data: Some(serde_json::to_value(trip)?),
                    headers: self.api.auth_headers().await,
                    priority: Priority::default(),
                };
                let id = self.trip_queue.enqueue(draft).await?;
                info!("Trip mirrored into the fallback queue as {id}");
                Err(err)
            }
            Err(err) => Err(err),
        }
    }

    pub async fn pending_trip_count(&self) -> Result<usize, AppError> {
        self.trip_queue.count().await
    }
}
