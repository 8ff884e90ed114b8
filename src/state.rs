use crate::application::ports::{ApiGateway, KeyValueStore, RequestTransport, TokenStore};
use crate::application::services::{
    ApiService, QueuePolicy, RequestQueue, SyncService, TripService,
};
use crate::infrastructure::api::RestClient;
use crate::infrastructure::database::{Database, DbPool};
use crate::infrastructure::storage::{
    KeyringTokenStore, KvQueueStore, SqliteKvStore, PENDING_TRIPS_KEY, REQUEST_QUEUE_KEY,
};
use crate::shared::config::AppConfig;
use crate::shared::error::AppError;
use std::sync::Arc;

/// Application context owning the offline queue subsystem. Built once by
/// the shell; everything below it receives its dependencies explicitly.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub db_pool: DbPool,
    pub queue: Arc<RequestQueue>,
    pub trip_queue: Arc<RequestQueue>,
    pub api: Arc<ApiService>,
    pub trips: Arc<TripService>,
    pub sync: Arc<SyncService>,
}

impl AppState {
    pub async fn init(config: AppConfig) -> Result<Self, AppError> {
        config.validate().map_err(AppError::Configuration)?;

        let db_pool = Database::initialize(&config.database).await?;
        let kv: Arc<dyn KeyValueStore> = Arc::new(SqliteKvStore::new(db_pool.clone()));
        let tokens: Arc<dyn TokenStore> = Arc::new(KeyringTokenStore::new());
        let client = Arc::new(RestClient::new(&config.api)?);

        let queue = Arc::new(RequestQueue::new(
            Arc::new(KvQueueStore::new(kv.clone(), REQUEST_QUEUE_KEY)),
            QueuePolicy {
                max_retries: config.sync.max_retries,
                base_delay_ms: config.sync.base_delay_ms,
            },
        ));
        let trip_queue = Arc::new(RequestQueue::new(
            Arc::new(KvQueueStore::new(kv, PENDING_TRIPS_KEY)),
            QueuePolicy {
                max_retries: config.sync.trip_max_retries,
                base_delay_ms: 0,
            },
        ));

        let gateway: Arc<dyn ApiGateway> = client.clone();
        let transport: Arc<dyn RequestTransport> = client;

        let api = Arc::new(ApiService::new(gateway, queue.clone(), tokens));
        let trips = Arc::new(TripService::new(api.clone(), trip_queue.clone()));
        let sync = Arc::new(SyncService::new(
            queue.clone(),
            trip_queue.clone(),
            transport,
        ));

        if config.sync.auto_sync {
            sync.schedule_sync(config.sync.sync_interval).await;
        }

        Ok(Self {
            config,
            db_pool,
            queue,
            trip_queue,
            api,
            trips,
            sync,
        })
    }
}
