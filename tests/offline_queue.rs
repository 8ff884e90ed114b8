//! End-to-end coverage of the offline queue pipeline over a real sqlite
//! store: wrapper capture, priority-ordered replay, retry bookkeeping and
//! the trip fallback path.

use std::sync::Arc;

use serde_json::json;
use sqlx::sqlite::SqlitePoolOptions;
use tempfile::TempDir;

use verda_client::application::ports::{ApiGateway, KeyValueStore, TokenStore};
use verda_client::application::services::{
    ApiService, QueuePolicy, RequestQueue, SyncService, TripService,
};
use verda_client::domain::entities::{SyncReport, TripPayload};
use verda_client::domain::value_objects::RequestKind;
use verda_client::infrastructure::database::Database;
use verda_client::infrastructure::storage::{
    InMemoryTokenStore, KvQueueStore, SqliteKvStore, PENDING_TRIPS_KEY, REQUEST_QUEUE_KEY,
};
use verda_client::shared::error::{ApiError, AppError};
use verda_client::test_support::{ScriptedGateway, ScriptedTransport};

struct Harness {
    kv: Arc<dyn KeyValueStore>,
    queue: Arc<RequestQueue>,
    trip_queue: Arc<RequestQueue>,
    api: Arc<ApiService>,
    trips: Arc<TripService>,
    tokens: Arc<InMemoryTokenStore>,
    _temp_dir: TempDir,
}

async fn harness(gateway: ScriptedGateway) -> Harness {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("client.db");
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(&format!("sqlite:{}?mode=rwc", db_path.display()))
        .await
        .unwrap();
    Database::run_migrations(&pool).await.unwrap();

    let kv: Arc<dyn KeyValueStore> = Arc::new(SqliteKvStore::new(pool));
    let queue = Arc::new(RequestQueue::new(
        Arc::new(KvQueueStore::new(kv.clone(), REQUEST_QUEUE_KEY)),
        QueuePolicy {
            max_retries: 5,
            base_delay_ms: 1000,
        },
    ));
    let trip_queue = Arc::new(RequestQueue::new(
        Arc::new(KvQueueStore::new(kv.clone(), PENDING_TRIPS_KEY)),
        QueuePolicy {
            max_retries: 3,
            base_delay_ms: 0,
        },
    ));

    let tokens = Arc::new(InMemoryTokenStore::default());
    let gateway: Arc<dyn ApiGateway> = Arc::new(gateway);
    let api = Arc::new(ApiService::new(gateway, queue.clone(), tokens.clone()));
    let trips = Arc::new(TripService::new(api.clone(), trip_queue.clone()));

    Harness {
        kv,
        queue,
        trip_queue,
        api,
        trips,
        tokens,
        _temp_dir: temp_dir,
    }
}

fn sync_service(h: &Harness, transport: Arc<ScriptedTransport>) -> SyncService {
    SyncService::new(h.queue.clone(), h.trip_queue.clone(), transport)
}

fn offline_gateway() -> ScriptedGateway {
    ScriptedGateway::returning(|_, _| Err(ApiError::Network("Network request failed".into())))
}

#[tokio::test]
async fn captured_calls_replay_in_priority_order() {
    let h = harness(offline_gateway()).await;
    h.tokens.store_token("bearer-1").await.unwrap();

    // Three failed calls: save_trip (4), exchange_product (9), set_goal (6).
    assert!(matches!(
        h.api
            .save_trip(&TripPayload::new(json!({"mode": "bus"}), 1.1))
            .await,
        Err(AppError::QueuedOffline(_))
    ));
    assert!(matches!(
        h.api.exchange_product("p-7").await,
        Err(AppError::QueuedOffline(_))
    ));
    assert!(matches!(
        h.api.set_goal(2.0).await,
        Err(AppError::QueuedOffline(_))
    ));
    assert_eq!(h.queue.count().await.unwrap(), 3);

    let transport = Arc::new(ScriptedTransport::accepting());
    let sync = sync_service(&h, transport.clone());

    let report = sync.sync().await.unwrap();
    assert_eq!(
        report,
        SyncReport {
            synced: 3,
            failed: 0,
            remaining: 0
        }
    );
    assert_eq!(h.queue.count().await.unwrap(), 0);

    let seen = transport.seen().await;
    let kinds: Vec<RequestKind> = seen.iter().map(|entry| entry.kind).collect();
    assert_eq!(
        kinds,
        vec![
            RequestKind::ExchangeProduct,
            RequestKind::SetGoal,
            RequestKind::SaveTrip
        ]
    );

    // The credential captured at enqueue time rides along on replay.
    for entry in &seen {
        assert_eq!(
            entry.headers.as_ref().unwrap().get("Authorization"),
            Some(&"Bearer bearer-1".to_string())
        );
    }
}

#[tokio::test]
async fn retry_state_survives_the_store() {
    let h = harness(offline_gateway()).await;
    assert!(h.api.set_goal(3.0).await.is_err());

    let failing = Arc::new(ScriptedTransport::failing_with(|_| {
        ApiError::Network("connection refused".into())
    }));
    let sync = sync_service(&h, failing);
    let report = sync.sync().await.unwrap();
    assert_eq!(report.remaining, 1);

    // Reload through a fresh queue handle over the same kv store: the
    // bumped retry counter was persisted.
    let reloaded = RequestQueue::new(
        Arc::new(KvQueueStore::new(h.kv.clone(), REQUEST_QUEUE_KEY)),
        QueuePolicy {
            max_retries: 5,
            base_delay_ms: 1000,
        },
    );
    let entries = reloaded.list().await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].retry_count, 1);
}

#[tokio::test]
async fn corrupt_store_heals_to_an_empty_queue() {
    let h = harness(offline_gateway()).await;
    h.kv.store(REQUEST_QUEUE_KEY, "no json here").await.unwrap();

    assert_eq!(h.queue.count().await.unwrap(), 0);
    assert!(!h.kv.exists(REQUEST_QUEUE_KEY).await.unwrap());

    let sync = sync_service(&h, Arc::new(ScriptedTransport::accepting()));
    assert_eq!(sync.sync().await.unwrap(), SyncReport::default());
}

#[tokio::test]
async fn offline_trip_lives_in_both_queues_until_drained() {
    let h = harness(offline_gateway()).await;

    let err = h
        .trips
        .save_trip_with_sync(&TripPayload::new(json!({"mode": "bike"}), 0.0))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::QueuedOffline(_)));

    assert_eq!(h.queue.count().await.unwrap(), 1);
    assert_eq!(h.trips.pending_trip_count().await.unwrap(), 1);

    let transport = Arc::new(ScriptedTransport::accepting());
    let sync = sync_service(&h, transport.clone());

    assert_eq!(sync.sync().await.unwrap().synced, 1);
    assert_eq!(sync.sync_pending_trips().await.unwrap().synced, 1);
    assert_eq!(h.queue.count().await.unwrap(), 0);
    assert_eq!(h.trips.pending_trip_count().await.unwrap(), 0);

    // Both replays describe the same trip-save endpoint.
    let seen = transport.seen().await;
    assert_eq!(seen.len(), 2);
    assert!(seen.iter().all(|entry| entry.endpoint == "/api/trips"));
    // Distinct ids, so the server can deduplicate via the idempotency key.
    assert_ne!(seen[0].id, seen[1].id);
}

#[tokio::test]
async fn trip_queue_gives_up_after_its_smaller_ceiling() {
    let h = harness(offline_gateway()).await;
    let _ = h
        .trips
        .save_trip_with_sync(&TripPayload::new(json!({"mode": "walk"}), 0.0))
        .await;
    assert_eq!(h.trips.pending_trip_count().await.unwrap(), 1);

    let failing = Arc::new(ScriptedTransport::failing_with(|_| {
        ApiError::Network("timeout".into())
    }));
    let sync = sync_service(&h, failing);

    assert_eq!(sync.sync_pending_trips().await.unwrap().remaining, 1);
    assert_eq!(sync.sync_pending_trips().await.unwrap().remaining, 1);
    let last = sync.sync_pending_trips().await.unwrap();
    assert_eq!(
        last,
        SyncReport {
            synced: 0,
            failed: 1,
            remaining: 0
        }
    );
    assert_eq!(h.trips.pending_trip_count().await.unwrap(), 0);
}

#[tokio::test]
async fn mixed_outcomes_partition_into_the_report() {
    let h = harness(offline_gateway()).await;
    assert!(h.api.exchange_product("gone").await.is_err());
    assert!(h.api.claim_quest_reward("q-1").await.is_err());
    assert!(h.api.set_goal(5.0).await.is_err());

    // exchange (9) is rejected outright, claim (8) succeeds, goal (6) hits
    // a network failure and stays queued.
    let transport = Arc::new(ScriptedTransport::new(|entry| match entry.kind {
        RequestKind::ExchangeProduct => Err(ApiError::Client(404)),
        RequestKind::ClaimQuestReward => Ok(()),
        _ => Err(ApiError::Network("offline again".into())),
    }));
    let sync = sync_service(&h, transport);

    let report = sync.sync().await.unwrap();
    assert_eq!(
        report,
        SyncReport {
            synced: 1,
            failed: 1,
            remaining: 1
        }
    );

    let entries = h.queue.list().await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].kind, RequestKind::SetGoal);
    assert_eq!(entries[0].retry_count, 1);
}
