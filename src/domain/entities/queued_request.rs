use crate::domain::value_objects::{HttpMethod, Priority, RequestId, RequestKind};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// One persisted, not-yet-delivered API call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QueuedRequest {
    pub id: RequestId,
    pub kind: RequestKind,
    pub endpoint: String,
    pub method: HttpMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<HashMap<String, String>>,
    /// Enqueue time. A failed replay pushes this forward by the backoff
    /// delay, so it doubles as the ready-not-before instant.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    pub retry_count: u32,
    #[serde(default)]
    pub priority: Priority,
}

/// Enqueue-time description of a request; id, timestamp and retry counter
/// are assigned by the queue.
#[derive(Debug, Clone)]
pub struct QueuedRequestDraft {
    pub kind: RequestKind,
    pub endpoint: String,
    pub method: HttpMethod,
    pub data: Option<Value>,
    pub headers: Option<HashMap<String, String>>,
    pub priority: Priority,
}

impl QueuedRequest {
    pub fn from_draft(draft: QueuedRequestDraft) -> Self {
        Self {
            id: RequestId::generate(),
            kind: draft.kind,
            endpoint: draft.endpoint,
            method: draft.method,
            data: draft.data,
            headers: draft.headers,
            timestamp: Utc::now(),
            retry_count: 0,
            priority: draft.priority,
        }
    }

    /// Whether the entry may be attempted in a pass running at `now`.
    pub fn is_ready(&self, now: DateTime<Utc>) -> bool {
        self.timestamp <= now
    }

    /// Bookkeeping after a failed replay: bump the counter and defer the
    /// entry by `base_delay_ms * 2^retry_count`.
    pub fn schedule_retry(&mut self, base_delay_ms: u64) {
        self.retry_count += 1;
        let exponent = self.retry_count.min(16);
        let delay_ms = base_delay_ms.saturating_mul(1u64 << exponent);
        self.timestamp = Utc::now() + Duration::milliseconds(delay_ms as i64);
    }
}
