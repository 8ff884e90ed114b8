use crate::application::ports::TokenStore;
use crate::shared::error::AppError;
use async_trait::async_trait;
use keyring::Entry;
use tokio::sync::RwLock;
use tracing::debug;

const SERVICE_NAME: &str = "verda";
const TOKEN_KEY: &str = "auth_token";

/// OS-keyring-backed credential store.
pub struct KeyringTokenStore;

impl KeyringTokenStore {
    pub fn new() -> Self {
        Self
    }

    fn entry() -> Result<Entry, AppError> {
        Entry::new(SERVICE_NAME, TOKEN_KEY).map_err(|e| AppError::Auth(e.to_string()))
    }
}

impl Default for KeyringTokenStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TokenStore for KeyringTokenStore {
    async fn access_token(&self) -> Result<Option<String>, AppError> {
        match Self::entry()?.get_password() {
            Ok(token) => Ok(Some(token)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(AppError::Auth(e.to_string())),
        }
    }

    async fn store_token(&self, token: &str) -> Result<(), AppError> {
        debug!("Storing access token in keyring");
        Self::entry()?
            .set_password(token)
            .map_err(|e| AppError::Auth(e.to_string()))
    }

    async fn clear_token(&self) -> Result<(), AppError> {
        match Self::entry()?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(AppError::Auth(e.to_string())),
        }
    }
}

/// In-memory stand-in for tests and headless environments without a
/// platform keyring.
#[derive(Default)]
pub struct InMemoryTokenStore {
    token: RwLock<Option<String>>,
}

#[async_trait]
impl TokenStore for InMemoryTokenStore {
    async fn access_token(&self) -> Result<Option<String>, AppError> {
        Ok(self.token.read().await.clone())
    }

    async fn store_token(&self, token: &str) -> Result<(), AppError> {
        *self.token.write().await = Some(token.to_string());
        Ok(())
    }

    async fn clear_token(&self) -> Result<(), AppError> {
        *self.token.write().await = None;
        Ok(())
    }
}
