//! In-memory port implementations shared by the unit and integration test
//! suites.

use crate::application::ports::{ApiGateway, QueueStore, RequestTransport};
use crate::domain::entities::QueuedRequest;
use crate::domain::value_objects::HttpMethod;
use crate::shared::error::{ApiError, AppError};
use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;

/// Volatile [`QueueStore`]: the serialized list lives in memory instead of
/// the kv table, with the same wholesale save semantics.
#[derive(Default)]
pub struct InMemoryQueueStore {
    entries: Mutex<Option<Vec<QueuedRequest>>>,
}

#[async_trait]
impl QueueStore for InMemoryQueueStore {
    async fn load(&self) -> Result<Vec<QueuedRequest>, AppError> {
        Ok(self.entries.lock().await.clone().unwrap_or_default())
    }

    async fn save(&self, entries: &[QueuedRequest]) -> Result<(), AppError> {
        *self.entries.lock().await = Some(entries.to_vec());
        Ok(())
    }

    async fn clear(&self) -> Result<(), AppError> {
        *self.entries.lock().await = None;
        Ok(())
    }
}

type TransportScript = Box<dyn Fn(&QueuedRequest) -> Result<(), ApiError> + Send + Sync>;

/// [`RequestTransport`] driven by a script, recording every dispatched
/// entry in arrival order.
pub struct ScriptedTransport {
    script: TransportScript,
    seen: Mutex<Vec<QueuedRequest>>,
}

impl ScriptedTransport {
    pub fn new(
        script: impl Fn(&QueuedRequest) -> Result<(), ApiError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            script: Box::new(script),
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Accepts every dispatch.
    pub fn accepting() -> Self {
        Self::new(|_| Ok(()))
    }

    /// Fails every dispatch with the scripted error.
    pub fn failing_with(
        script: impl Fn(&QueuedRequest) -> ApiError + Send + Sync + 'static,
    ) -> Self {
        Self::new(move |request| Err(script(request)))
    }

    /// Entries dispatched so far, in the order the synchronizer sent them.
    pub async fn seen(&self) -> Vec<QueuedRequest> {
        self.seen.lock().await.clone()
    }
}

#[async_trait]
impl RequestTransport for ScriptedTransport {
    async fn dispatch(&self, request: &QueuedRequest) -> Result<(), ApiError> {
        self.seen.lock().await.push(request.clone());
        (self.script)(request)
    }
}

type GatewayScript = Box<dyn Fn(HttpMethod, &str) -> Result<Value, ApiError> + Send + Sync>;

/// [`ApiGateway`] driven by a script, recording every call.
pub struct ScriptedGateway {
    script: GatewayScript,
    calls: Mutex<Vec<(HttpMethod, String)>>,
    online: bool,
}

impl ScriptedGateway {
    pub fn returning(
        script: impl Fn(HttpMethod, &str) -> Result<Value, ApiError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            script: Box::new(script),
            calls: Mutex::new(Vec::new()),
            online: true,
        }
    }

    pub fn offline(mut self) -> Self {
        self.online = false;
        self
    }

    pub async fn calls(&self) -> Vec<(HttpMethod, String)> {
        self.calls.lock().await.clone()
    }
}

#[async_trait]
impl ApiGateway for ScriptedGateway {
    async fn send_json(
        &self,
        method: HttpMethod,
        endpoint: &str,
        _body: Option<&Value>,
        _idempotency_key: Option<&str>,
    ) -> Result<Value, ApiError> {
        self.calls.lock().await.push((method, endpoint.to_string()));
        (self.script)(method, endpoint)
    }

    async fn probe(&self) -> bool {
        self.online
    }
}
