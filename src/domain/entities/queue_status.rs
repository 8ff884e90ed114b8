use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Snapshot of a queue for the offline badge UI.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueueStatus {
    pub pending: u32,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub oldest_timestamp: Option<DateTime<Utc>>,
    pub by_kind: HashMap<String, u32>,
}
