pub mod api_service;
pub mod queue_service;
pub mod sync_service;
pub mod trip_service;

pub use api_service::{ApiService, CallOptions};
pub use queue_service::{QueuePolicy, RequestQueue};
pub use sync_service::{SyncService, SyncStatus};
pub use trip_service::TripService;
