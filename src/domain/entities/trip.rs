use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Trip payload mirrored into the fallback queue: the chosen route plus the
/// computed emission figure for it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TripPayload {
    pub route: Value,
    pub emission: f64,
}

impl TripPayload {
    pub fn new(route: Value, emission: f64) -> Self {
        Self { route, emission }
    }
}
