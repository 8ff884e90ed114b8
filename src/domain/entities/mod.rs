mod queue_status;
mod queued_request;
mod sync_report;
mod trip;

pub use queue_status::QueueStatus;
pub use queued_request::{QueuedRequest, QueuedRequestDraft};
pub use sync_report::SyncReport;
pub use trip::TripPayload;
