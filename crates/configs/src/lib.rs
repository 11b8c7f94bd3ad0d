//! # configs
//!
//! Layered application configuration: built-in defaults, `.env`, then
//! `VIDEOHUB__`-prefixed environment variables (double underscore separates
//! nesting, e.g. `VIDEOHUB__SERVER__PORT=8080`).

use config::{Config, Environment};
use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigsError {
    #[error("configuration error: {0}")]
    Load(#[from] config::ConfigError),
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// HS256 signing secret. Never logged; override it outside development.
    pub jwt_secret: SecretString,
    pub token_ttl_hours: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MediaConfig {
    pub bucket: String,
    pub public_base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub environment: String,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub media: MediaConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigsError> {
        dotenvy::dotenv().ok();
        let cfg = Config::builder()
            .set_default("environment", "development")?
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 5000)?
            .set_default("database.url", "postgres://localhost/videohub")?
            .set_default("database.max_connections", 5)?
            .set_default("auth.jwt_secret", "dev-secret-change-me")?
            .set_default("auth.token_ttl_hours", 24)?
            .set_default("media.bucket", "videohub-media")?
            .set_default("media.public_base_url", "http://localhost:9000/videohub-media")?
            .add_source(Environment::with_prefix("VIDEOHUB").separator("__"))
            .build()?;
        Ok(cfg.try_deserialize()?)
    }
}
