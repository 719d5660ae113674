use std::path::PathBuf;
use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    pub allow_origins: Vec<String>,
    pub max_age: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    /// Upper bound for a single store call before the caller gets `TIMEOUT`.
    #[serde(default = "default_store_timeout_ms")]
    pub store_timeout_ms: u64,
    /// Retries on transient store contention (never on lost claim races).
    #[serde(default = "default_max_retries")]
    pub max_retries: u8,
    #[serde(default = "default_retry_base_ms")]
    pub retry_base_ms: u64,
    #[serde(default = "default_retry_max_ms")]
    pub retry_max_ms: u64,
}

fn default_store_timeout_ms() -> u64 {
    5000
}
fn default_max_retries() -> u8 {
    2
}
fn default_retry_base_ms() -> u64 {
    25
}
fn default_retry_max_ms() -> u64 {
    250
}

impl DatabaseConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            store_timeout_ms: default_store_timeout_ms(),
            max_retries: default_max_retries(),
            retry_base_ms: default_retry_base_ms(),
            retry_max_ms: default_retry_max_ms(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    #[serde(default = "default_token_ttl_hours")]
    pub token_ttl_hours: i64,
}

fn default_token_ttl_hours() -> i64 {
    24 * 7
}

impl AuthConfig {
    pub fn token_ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.token_ttl_hours)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    pub photo_dir: PathBuf,
    pub max_photo_size: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            photo_dir: PathBuf::from("./data/photos"),
            max_photo_size: 5 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct GrievanceConfig {
    /// Advisory deadline, in days after submission.
    pub deadline_days: i64,
}

impl Default for GrievanceConfig {
    fn default() -> Self {
        Self { deadline_days: 7 }
    }
}

/// Officer account created at startup if its mobile is not yet registered.
#[derive(Debug, Deserialize, Clone)]
pub struct OfficerSeed {
    pub name: String,
    pub mobile: String,
    pub password: String,
    pub email: String,
    pub designation: String,
    pub department: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct SeedConfig {
    #[serde(default)]
    pub officers: Vec<OfficerSeed>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub grievance: GrievanceConfig,
    #[serde(default)]
    pub seed: SeedConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("server.cors.allow_origins", Vec::<String>::new())?
            .set_default("server.cors.max_age", 3600)?
            .set_default("storage.photo_dir", "./data/photos")?
            .set_default("storage.max_photo_size", 5 * 1024 * 1024)?
            .set_default("grievance.deadline_days", 7)?
            // Load from config/config.toml
            .add_source(File::with_name("config/config").required(false))
            // Override from environment (e.g., GRIEVANCE__AUTH__JWT_SECRET)
            .add_source(Environment::with_prefix("GRIEVANCE").separator("__"))
            .build()?;

        s.try_deserialize()
    }

    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.database.store_timeout_ms)
    }
}
