use crate::application::ports::{ApiGateway, TokenStore};
use crate::application::services::queue_service::RequestQueue;
use crate::domain::entities::{QueuedRequestDraft, TripPayload};
use crate::domain::value_objects::{HttpMethod, Priority, RequestKind};
use crate::infrastructure::api::endpoints;
use crate::shared::error::{ApiError, AppError};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tracing::{info, warn};

// Fixed replay priorities, by business importance. Reward redemption is the
// most valuable mutation to deliver; the plain trip save the least.
const EXCHANGE_PRODUCT_PRIORITY: u8 = 9;
const CLAIM_QUEST_PRIORITY: u8 = 8;
const UPDATE_PROFILE_PRIORITY: u8 = 6;
const SET_GOAL_PRIORITY: u8 = 6;
const UPDATE_VEHICLE_PRIORITY: u8 = 5;
const SAVE_TRIP_PRIORITY: u8 = 4;
const REFRESH_USER_PRIORITY: u8 = 3;

#[derive(Debug, Clone, Copy)]
pub struct CallOptions {
    pub priority: Priority,
    pub skip_queue: bool,
}

impl Default for CallOptions {
    fn default() -> Self {
        Self {
            priority: Priority::default(),
            skip_queue: false,
        }
    }
}

impl CallOptions {
    pub fn with_priority(priority: Priority) -> Self {
        Self {
            priority,
            skip_queue: false,
        }
    }

    /// Bypass the offline queue entirely; failures surface unchanged.
    pub fn direct() -> Self {
        Self {
            priority: Priority::default(),
            skip_queue: true,
        }
    }
}

/// Typed REST operations, each wrapped so that a connectivity failure is
/// captured into the offline queue instead of being lost.
pub struct ApiService {
    gateway: Arc<dyn ApiGateway>,
    queue: Arc<RequestQueue>,
    tokens: Arc<dyn TokenStore>,
}

impl ApiService {
    pub fn new(
        gateway: Arc<dyn ApiGateway>,
        queue: Arc<RequestQueue>,
        tokens: Arc<dyn TokenStore>,
    ) -> Self {
        Self {
            gateway,
            queue,
            tokens,
        }
    }

    /// Run `api_call`; invisible on success. On a network-classified
    /// failure (unless `skip_queue`) the call is snapshotted into the queue
    /// with the current credential and the distinguished
    /// [`AppError::QueuedOffline`] is raised so the UI can show the
    /// offline-queued notice. Every other failure is rethrown unchanged.
    pub async fn call_with_queue<T, F, Fut>(
        &self,
        api_call: F,
        kind: RequestKind,
        endpoint: &str,
        method: HttpMethod,
        data: Option<Value>,
        options: CallOptions,
    ) -> Result<T, AppError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        match api_call().await {
            Ok(value) => Ok(value),
            Err(err) if err.is_network() && !options.skip_queue => {
                let draft = QueuedRequestDraft {
                    kind,
                    endpoint: endpoint.to_string(),
                    method,
                    data,
                    headers: self.auth_headers().await,
                    priority: options.priority,
                };
                let id = self.queue.enqueue(draft).await?;
                info!("{kind} call failed offline, queued as {id}");
                Err(AppError::QueuedOffline(id.to_string()))
            }
            Err(err) => Err(AppError::Api(err)),
        }
    }

    /// Short-timeout connectivity check for the UI shell.
    pub async fn is_online(&self) -> bool {
        self.gateway.probe().await
    }

    pub async fn save_trip(&self, trip: &TripPayload) -> Result<Value, AppError> {
        let body = serde_json::to_value(trip)?;
        let data = body.clone();
        self.call_with_queue(
            || {
                self.gateway
                    .send_json(HttpMethod::Post, endpoints::TRIPS, Some(&body), None)
            },
            RequestKind::SaveTrip,
            endpoints::TRIPS,
            HttpMethod::Post,
            Some(data),
            CallOptions::with_priority(Priority::clamped(SAVE_TRIP_PRIORITY)),
        )
        .await
    }

    pub async fn update_profile(&self, profile: &Value) -> Result<Value, AppError> {
        self.call_with_queue(
            || {
                self.gateway
                    .send_json(HttpMethod::Put, endpoints::PROFILE, Some(profile), None)
            },
            RequestKind::UpdateProfile,
            endpoints::PROFILE,
            HttpMethod::Put,
            Some(profile.clone()),
            CallOptions::with_priority(Priority::clamped(UPDATE_PROFILE_PRIORITY)),
        )
        .await
    }

    pub async fn set_goal(&self, target: f64) -> Result<Value, AppError> {
        let body = json!({ "goal": target });
        let data = body.clone();
        self.call_with_queue(
            || {
                self.gateway
                    .send_json(HttpMethod::Put, endpoints::GOAL, Some(&body), None)
            },
            RequestKind::SetGoal,
            endpoints::GOAL,
            HttpMethod::Put,
            Some(data),
            CallOptions::with_priority(Priority::clamped(SET_GOAL_PRIORITY)),
        )
        .await
    }

    pub async fn update_vehicle(&self, vehicle: &Value) -> Result<Value, AppError> {
        self.call_with_queue(
            || {
                self.gateway
                    .send_json(HttpMethod::Put, endpoints::VEHICLE, Some(vehicle), None)
            },
            RequestKind::UpdateVehicle,
            endpoints::VEHICLE,
            HttpMethod::Put,
            Some(vehicle.clone()),
            CallOptions::with_priority(Priority::clamped(UPDATE_VEHICLE_PRIORITY)),
        )
        .await
    }

    pub async fn claim_quest_reward(&self, quest_id: &str) -> Result<Value, AppError> {
        let body = json!({ "questId": quest_id });
        let data = body.clone();
        self.call_with_queue(
            || {
                self.gateway
                    .send_json(HttpMethod::Post, endpoints::QUEST_CLAIM, Some(&body), None)
            },
            RequestKind::ClaimQuestReward,
            endpoints::QUEST_CLAIM,
            HttpMethod::Post,
            Some(data),
            CallOptions::with_priority(Priority::clamped(CLAIM_QUEST_PRIORITY)),
        )
        .await
    }

    pub async fn exchange_product(&self, product_id: &str) -> Result<Value, AppError> {
        let body = json!({ "productId": product_id });
        let data = body.clone();
        self.call_with_queue(
            || {
                self.gateway.send_json(
                    HttpMethod::Post,
                    endpoints::PRODUCT_EXCHANGE,
                    Some(&body),
                    None,
                )
            },
            RequestKind::ExchangeProduct,
            endpoints::PRODUCT_EXCHANGE,
            HttpMethod::Post,
            Some(data),
            CallOptions::with_priority(Priority::clamped(EXCHANGE_PRODUCT_PRIORITY)),
        )
        .await
    }

    pub async fn refresh_user(&self) -> Result<Value, AppError> {
        self.call_with_queue(
            || {
                self.gateway
                    .send_json(HttpMethod::Get, endpoints::USER_ME, None, None)
            },
            RequestKind::RefreshUser,
            endpoints::USER_ME,
            HttpMethod::Get,
            None,
            CallOptions::with_priority(Priority::clamped(REFRESH_USER_PRIORITY)),
        )
        .await
    }

    /// Bearer header snapshot for a queued entry, when a credential is
    /// cached. A storage failure degrades to "no header" rather than
    /// blocking the enqueue.
    pub(crate) async fn auth_headers(&self) -> Option<HashMap<String, String>> {
        match self.tokens.access_token().await {
            Ok(Some(token)) => {
                let mut headers = HashMap::new();
                headers.insert("Authorization".to_string(), format!("Bearer {token}"));
                Some(headers)
            }
            Ok(None) => None,
            Err(err) => {
                warn!("Could not read stored credential: {err}");
                None
            }
        }
    }
}
