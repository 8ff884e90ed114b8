pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod shared;
pub mod state;
pub mod test_support;

pub use shared::config::AppConfig;
pub use shared::error::{ApiError, AppError, Result};
pub use state::AppState;

/// Initialize tracing for the client core.
pub fn init_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "verda_client=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
