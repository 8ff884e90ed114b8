use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub api: ApiConfig,
    pub sync: SyncConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub probe_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    pub auto_sync: bool,
    pub sync_interval: u64,
    pub max_retries: u32,
    pub base_delay_ms: u64,
    pub trip_max_retries: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_dir: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                url: "sqlite:data/verda.db?mode=rwc".to_string(),
                max_connections: 5,
                connection_timeout: 30,
            },
            api: ApiConfig {
                base_url: "https://api.verda.app".to_string(),
                timeout_secs: 10,
                probe_timeout_secs: 3,
            },
            sync: SyncConfig {
                // Periodic sync toward the server is off by policy; sync
                // runs from the user-visible trigger unless enabled here.
                auto_sync: false,
                sync_interval: 300,
                max_retries: 5,
                base_delay_ms: 1000,
                trip_max_retries: 3,
            },
            storage: StorageConfig {
                data_dir: "./data".to_string(),
            },
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(v) = std::env::var("VERDA_DATABASE_URL") {
            if !v.trim().is_empty() {
                cfg.database.url = v;
            }
        }
        if let Ok(v) = std::env::var("VERDA_API_BASE_URL") {
            if !v.trim().is_empty() {
                cfg.api.base_url = v;
            }
        }
        if let Ok(v) = std::env::var("VERDA_API_TIMEOUT_SECS") {
            if let Some(value) = parse_u64(&v) {
                cfg.api.timeout_secs = value.max(1);
            }
        }
        if let Ok(v) = std::env::var("VERDA_AUTO_SYNC") {
            cfg.sync.auto_sync = parse_bool(&v, cfg.sync.auto_sync);
        }
        if let Ok(v) = std::env::var("VERDA_SYNC_INTERVAL") {
            if let Some(value) = parse_u64(&v) {
                cfg.sync.sync_interval = value.max(1);
            }
        }
        if let Ok(v) = std::env::var("VERDA_SYNC_MAX_RETRIES") {
            if let Some(value) = parse_u32(&v) {
                cfg.sync.max_retries = value.max(1);
            }
        }
        if let Ok(v) = std::env::var("VERDA_SYNC_BASE_DELAY_MS") {
            if let Some(value) = parse_u64(&v) {
                cfg.sync.base_delay_ms = value;
            }
        }
        if let Ok(v) = std::env::var("VERDA_TRIP_MAX_RETRIES") {
            if let Some(value) = parse_u32(&v) {
                cfg.sync.trip_max_retries = value.max(1);
            }
        }
        if let Ok(v) = std::env::var("VERDA_DATA_DIR") {
            if !v.trim().is_empty() {
                cfg.storage.data_dir = v;
            }
        }

        cfg
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.database.max_connections == 0 {
            return Err("Database max_connections must be greater than 0".to_string());
        }
        if self.api.base_url.trim().is_empty() {
            return Err("API base_url must not be empty".to_string());
        }
        if !self.api.base_url.starts_with("http") {
            return Err("API base_url must be an http(s) address".to_string());
        }
        if self.api.timeout_secs == 0 {
            return Err("API timeout_secs must be greater than 0".to_string());
        }
        if self.sync.max_retries == 0 || self.sync.trip_max_retries == 0 {
            return Err("Sync retry ceilings must be greater than 0".to_string());
        }
        if self.sync.auto_sync && self.sync.sync_interval == 0 {
            return Err("Sync interval must be greater than 0 when auto_sync is on".to_string());
        }
        Ok(())
    }
}

fn parse_bool(s: &str, default: bool) -> bool {
    match s.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => default,
    }
}

fn parse_u64(value: &str) -> Option<u64> {
    value.trim().parse::<u64>().ok()
}

fn parse_u32(value: &str) -> Option<u32> {
    value.trim().parse::<u32>().ok()
}
