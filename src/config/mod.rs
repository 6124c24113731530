//! Application configuration

mod app_config;

pub use app_config::{
    AppConfig, AuthConfig, CacheSettings, CredentialSource, DatabaseConfig, DocumentStoreConfig,
    LogFormat, LoggingConfig, StorageBackend, StorageConfig, DEFAULT_JWT_SECRET,
};
