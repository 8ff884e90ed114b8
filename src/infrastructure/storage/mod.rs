pub mod keyring_store;
pub mod kv_store;
pub mod queue_store;

pub use keyring_store::{InMemoryTokenStore, KeyringTokenStore};
pub use kv_store::SqliteKvStore;
pub use queue_store::{KvQueueStore, PENDING_TRIPS_KEY, REQUEST_QUEUE_KEY};
