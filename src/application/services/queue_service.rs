use crate::application::ports::QueueStore;
use crate::domain::entities::{QueueStatus, QueuedRequest, QueuedRequestDraft};
use crate::domain::value_objects::RequestId;
use crate::shared::error::AppError;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// Per-queue tuning. The general request queue and the trip fallback queue
/// are the same mechanism with different policies.
#[derive(Debug, Clone, Copy)]
pub struct QueuePolicy {
    pub max_retries: u32,
    pub base_delay_ms: u64,
}

/// Durable FIFO-with-priority of pending API calls over a [`QueueStore`].
///
/// The store itself has no locking, so every load-modify-save cycle runs
/// under an internal mutex.
pub struct RequestQueue {
    store: Arc<dyn QueueStore>,
    policy: QueuePolicy,
    write_lock: Mutex<()>,
}

impl RequestQueue {
    pub fn new(store: Arc<dyn QueueStore>, policy: QueuePolicy) -> Self {
        Self {
            store,
            policy,
            write_lock: Mutex::new(()),
        }
    }

    pub fn policy(&self) -> QueuePolicy {
        self.policy
    }

    /// Persist a new entry and return its generated id. No deduplication:
    /// identical drafts produce independent entries.
    pub async fn enqueue(&self, draft: QueuedRequestDraft) -> Result<RequestId, AppError> {
        let entry = QueuedRequest::from_draft(draft);
        let id = entry.id.clone();

        let _guard = self.write_lock.lock().await;
        let mut entries = self.store.load().await?;
        entries.push(entry);
        self.store.save(&entries).await?;
        debug!("Enqueued request {id} ({} pending)", entries.len());

        Ok(id)
    }

    /// All entries in canonical order: priority descending, then enqueue
    /// time ascending. Sorted on every read.
    pub async fn list(&self) -> Result<Vec<QueuedRequest>, AppError> {
        let mut entries = self.store.load().await?;
        sort_canonical(&mut entries);
        Ok(entries)
    }

    /// Drop the entry with the given id; a no-op when it is absent.
    pub async fn remove(&self, id: &RequestId) -> Result<(), AppError> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.store.load().await?;
        let before = entries.len();
        entries.retain(|entry| entry.id != *id);
        if entries.len() != before {
            self.store.save(&entries).await?;
            debug!("Removed request {id}");
        }
        Ok(())
    }

    pub async fn clear(&self) -> Result<(), AppError> {
        let _guard = self.write_lock.lock().await;
        self.store.clear().await
    }

    pub async fn count(&self) -> Result<usize, AppError> {
        Ok(self.store.load().await?.len())
    }

    pub async fn status(&self) -> Result<QueueStatus, AppError> {
        let entries = self.store.load().await?;
        let mut by_kind: HashMap<String, u32> = HashMap::new();
        for entry in &entries {
            *by_kind.entry(entry.kind.to_string()).or_insert(0) += 1;
        }
        Ok(QueueStatus {
            pending: entries.len() as u32,
            oldest_timestamp: entries.iter().map(|entry| entry.timestamp).min(),
            by_kind,
        })
    }

    /// Replace the drained snapshot with its survivors, folding back any
    /// entry that arrived while the pass was running. Returns the size of
    /// the persisted list.
    pub(crate) async fn reconcile(
        &self,
        drained: &HashSet<RequestId>,
        mut survivors: Vec<QueuedRequest>,
    ) -> Result<usize, AppError> {
        let _guard = self.write_lock.lock().await;
        let current = self.store.load().await?;
        for entry in current {
            if !drained.contains(&entry.id) {
                survivors.push(entry);
            }
        }
        self.store.save(&survivors).await?;
        Ok(survivors.len())
    }
}

pub(crate) fn sort_canonical(entries: &mut [QueuedRequest]) {
    entries.sort_by(|a, b| {
        b.priority
            .cmp(&a.priority)
            .then_with(|| a.timestamp.cmp(&b.timestamp))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{HttpMethod, Priority, RequestKind};
    use crate::test_support::InMemoryQueueStore;
    use serde_json::json;

    fn queue() -> RequestQueue {
        RequestQueue::new(
            Arc::new(InMemoryQueueStore::default()),
            QueuePolicy {
                max_retries: 5,
                base_delay_ms: 1000,
            },
        )
    }

    fn draft(kind: RequestKind, priority: u8) -> QueuedRequestDraft {
        QueuedRequestDraft {
            kind,
            endpoint: "/api/trips".to_string(),
            method: HttpMethod::Post,
            data: Some(json!({"emission": 0.4})),
            headers: None,
            priority: Priority::clamped(priority),
        }
    }

    #[tokio::test]
    async fn enqueue_grows_the_count_and_returns_fresh_ids() {
        let queue = queue();
        assert_eq!(queue.count().await.unwrap(), 0);

        let first = queue.enqueue(draft(RequestKind::SaveTrip, 5)).await.unwrap();
        assert_eq!(queue.count().await.unwrap(), 1);

        let second = queue.enqueue(draft(RequestKind::SaveTrip, 5)).await.unwrap();
        assert_eq!(queue.count().await.unwrap(), 2);
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn identical_drafts_are_not_deduplicated() {
        let queue = queue();
        queue.enqueue(draft(RequestKind::SetGoal, 6)).await.unwrap();
        queue.enqueue(draft(RequestKind::SetGoal, 6)).await.unwrap();
        assert_eq!(queue.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn list_orders_by_priority_then_age() {
        let queue = queue();
        queue.enqueue(draft(RequestKind::SaveTrip, 5)).await.unwrap();
        let urgent = queue
            .enqueue(draft(RequestKind::ExchangeProduct, 9))
            .await
            .unwrap();
        queue.enqueue(draft(RequestKind::SaveTrip, 5)).await.unwrap();

        let entries = queue.list().await.unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].id, urgent);
        assert_eq!(entries[0].priority.value(), 9);
        // The two priority-5 entries keep enqueue order.
        assert!(entries[1].timestamp <= entries[2].timestamp);
    }

    #[tokio::test]
    async fn remove_drops_exactly_one_entry() {
        let queue = queue();
        let keep = queue.enqueue(draft(RequestKind::SaveTrip, 5)).await.unwrap();
        let gone = queue.enqueue(draft(RequestKind::SetGoal, 6)).await.unwrap();

        queue.remove(&gone).await.unwrap();
        assert_eq!(queue.count().await.unwrap(), 1);
        let entries = queue.list().await.unwrap();
        assert!(entries.iter().all(|entry| entry.id != gone));
        assert!(entries.iter().any(|entry| entry.id == keep));
    }

    #[tokio::test]
    async fn remove_of_an_absent_id_is_a_no_op() {
        let queue = queue();
        queue.enqueue(draft(RequestKind::SaveTrip, 5)).await.unwrap();

        let absent = RequestId::new("1700000000000-missing".to_string()).unwrap();
        queue.remove(&absent).await.unwrap();
        assert_eq!(queue.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn clear_empties_the_store() {
        let queue = queue();
        queue.enqueue(draft(RequestKind::SaveTrip, 5)).await.unwrap();
        queue.clear().await.unwrap();
        assert_eq!(queue.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn status_reports_counts_per_kind() {
        let queue = queue();
        queue.enqueue(draft(RequestKind::SaveTrip, 5)).await.unwrap();
        queue.enqueue(draft(RequestKind::SaveTrip, 5)).await.unwrap();
        queue
            .enqueue(draft(RequestKind::ClaimQuestReward, 8))
            .await
            .unwrap();

        let status = queue.status().await.unwrap();
        assert_eq!(status.pending, 3);
        assert_eq!(status.by_kind.get("saveTrip"), Some(&2));
        assert_eq!(status.by_kind.get("claimQuestReward"), Some(&1));
        assert!(status.oldest_timestamp.is_some());
    }

    #[tokio::test]
    async fn reconcile_keeps_entries_enqueued_during_a_pass() {
        let queue = queue();
        let drained_id = queue.enqueue(draft(RequestKind::SaveTrip, 5)).await.unwrap();
        let snapshot = queue.list().await.unwrap();
        let drained: HashSet<RequestId> = snapshot.iter().map(|e| e.id.clone()).collect();

        // A new entry lands while the pass is in flight.
        let late = queue.enqueue(draft(RequestKind::SetGoal, 6)).await.unwrap();

        let persisted = queue.reconcile(&drained, Vec::new()).await.unwrap();
        assert_eq!(persisted, 1);

        let entries = queue.list().await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, late);
        assert!(entries.iter().all(|entry| entry.id != drained_id));
    }
}
