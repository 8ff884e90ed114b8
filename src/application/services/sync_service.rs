use crate::application::ports::RequestTransport;
use crate::application::services::queue_service::RequestQueue;
use crate::domain::entities::{QueuedRequest, SyncReport};
use crate::domain::value_objects::RequestId;
use crate::shared::error::{ApiError, AppError};
use chrono::Utc;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SyncStatus {
    pub is_syncing: bool,
    pub last_sync: Option<i64>,
    pub sync_errors: u32,
}

/// Drains the offline queues by replaying each stored request over HTTP.
///
/// A pass is strictly sequential: the next replay does not start until the
/// previous one has resolved, and per-entry failures never escape the pass.
#[derive(Clone)]
pub struct SyncService {
    queue: Arc<RequestQueue>,
    trip_queue: Arc<RequestQueue>,
    transport: Arc<dyn RequestTransport>,
    status: Arc<RwLock<SyncStatus>>,
}

impl SyncService {
    pub fn new(
        queue: Arc<RequestQueue>,
        trip_queue: Arc<RequestQueue>,
        transport: Arc<dyn RequestTransport>,
    ) -> Self {
        Self {
            queue,
            trip_queue,
            transport,
            status: Arc::new(RwLock::new(SyncStatus {
                is_syncing: false,
                last_sync: None,
                sync_errors: 0,
            })),
        }
    }

    /// One full drain attempt over the general request queue.
    pub async fn sync(&self) -> Result<SyncReport, AppError> {
        let queue = Arc::clone(&self.queue);
        self.guarded_drain(&queue).await
    }

    /// Drain attempt over the dedicated trip fallback queue.
    pub async fn sync_pending_trips(&self) -> Result<SyncReport, AppError> {
        let queue = Arc::clone(&self.trip_queue);
        self.guarded_drain(&queue).await
    }

    pub async fn get_status(&self) -> SyncStatus {
        self.status.read().await.clone()
    }

    /// Timed trigger. Only spawned when the product config enables
    /// automatic sync; the default path is the manual user action.
    pub async fn schedule_sync(&self, interval_secs: u64) {
        let service = self.clone();
        tokio::spawn(async move {
            let mut interval =
                tokio::time::interval(tokio::time::Duration::from_secs(interval_secs));
            loop {
                interval.tick().await;
                if let Err(e) = service.sync().await {
                    tracing::error!("Scheduled sync error: {e}");
                    let mut status = service.status.write().await;
                    status.sync_errors += 1;
                }
            }
        });
    }

    async fn guarded_drain(&self, queue: &RequestQueue) -> Result<SyncReport, AppError> {
        {
            let mut status = self.status.write().await;
            if status.is_syncing {
                debug!("Sync pass already running, skipping");
                return Ok(SyncReport::default());
            }
            status.is_syncing = true;
        }

        let report = self.drain(queue).await;

        let mut status = self.status.write().await;
        status.is_syncing = false;
        status.last_sync = Some(Utc::now().timestamp());
        match &report {
            Ok(r) => status.sync_errors += r.failed,
            Err(_) => status.sync_errors += 1,
        }

        report
    }

    async fn drain(&self, queue: &RequestQueue) -> Result<SyncReport, AppError> {
        let entries = queue.list().await?;
        if entries.is_empty() {
            return Ok(SyncReport::default());
        }

        let policy = queue.policy();
        let drained: HashSet<RequestId> = entries.iter().map(|e| e.id.clone()).collect();
        let now = Utc::now();
        let mut synced = 0u32;
        let mut failed = 0u32;
        let mut survivors: Vec<QueuedRequest> = Vec::new();

        for mut entry in entries {
            if !entry.is_ready(now) {
                debug!("Entry {} deferred until {}", entry.id, entry.timestamp);
                survivors.push(entry);
                continue;
            }

            match self.transport.dispatch(&entry).await {
                Ok(()) => {
                    synced += 1;
                    debug!("Synced {} {}", entry.kind, entry.id);
                }
                Err(ApiError::Client(status)) => {
                    // Rejected payloads never heal on their own.
                    failed += 1;
                    warn!(
                        "Dropping {} {}: rejected with status {status}",
                        entry.kind, entry.id
                    );
                }
                Err(err) if err.is_network() => {
                    entry.schedule_retry(policy.base_delay_ms);
                    if entry.retry_count < policy.max_retries {
                        debug!(
                            "Keeping {} for retry {} of {}",
                            entry.id, entry.retry_count, policy.max_retries
                        );
                        survivors.push(entry);
                    } else {
                        failed += 1;
                        warn!(
                            "Dropping {} {} after {} attempts",
                            entry.kind, entry.id, entry.retry_count
                        );
                    }
                }
                Err(err) => {
                    failed += 1;
                    warn!("Dropping {} {}: {err}", entry.kind, entry.id);
                }
            }
        }

        let remaining = queue.reconcile(&drained, survivors).await?;
        let report = SyncReport {
            synced,
            failed,
            remaining: remaining as u32,
        };
        info!(
            "Sync pass finished: {} synced, {} failed, {} remaining",
            report.synced, report.failed, report.remaining
        );
        Ok(report)
    }
}
