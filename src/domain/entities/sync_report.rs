use serde::{Deserialize, Serialize};

/// Outcome of one full drain pass over a queue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncReport {
    pub synced: u32,
    pub failed: u32,
    pub remaining: u32,
}
