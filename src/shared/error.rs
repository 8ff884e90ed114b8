use thiserror::Error;

/// Failure taxonomy for HTTP traffic, produced by the classification
/// function at the client boundary and consumed by both the call wrapper
/// and the synchronizer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),

    #[error("client error: status {0}")]
    Client(u16),

    #[error("server error: status {0}")]
    Server(u16),

    #[error("unexpected error: {0}")]
    Unknown(String),
}

impl ApiError {
    /// Connectivity-class failures are the only retryable kind.
    pub fn is_network(&self) -> bool {
        matches!(self, ApiError::Network(_))
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Client(status) | ApiError::Server(status) => Some(*status),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Auth error: {0}")]
    Auth(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The call failed offline and was captured by the request queue; the
    /// payload is the generated entry id. Callers show the "will deliver
    /// later" notice instead of a plain failure.
    #[error("Request queued for later delivery: {0}")]
    QueuedOffline(String),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Database(err.to_string())
    }
}

impl From<sqlx::migrate::MigrateError> for AppError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        AppError::Database(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
