//! # configs
//!
//! Layered configuration for Atelier: built-in defaults, an optional
//! `atelier.toml`, then `ATELIER_*` environment variables, with `.env`
//! support in development. Secrets load into `SecretString` and are
//! never printed.

use config::{Config, Environment, File};
use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// Covers unreadable files, malformed values, and missing required
    /// settings (`jwt_secret`, `identity_salt`).
    #[error("configuration error: {0}")]
    Load(#[from] config::ConfigError),
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    #[serde(default = "default_database_url")]
    pub database_url: String,
    /// Signing key for session tokens. Required.
    pub jwt_secret: SecretString,
    /// Keyed-redaction salt for client identities. Required.
    pub identity_salt: SecretString,
    #[serde(default)]
    pub media: MediaSettings,
    #[cfg(feature = "redis")]
    pub redis_url: String,
}

#[derive(Debug, Deserialize)]
pub struct MediaSettings {
    #[serde(default = "default_media_root")]
    pub root: String,
    #[serde(default = "default_media_url_prefix")]
    pub url_prefix: String,
    #[cfg(feature = "media-s3")]
    pub s3_bucket: String,
    #[cfg(feature = "media-s3")]
    pub s3_public_base_url: String,
}

impl Default for MediaSettings {
    fn default() -> Self {
        Self {
            root: default_media_root(),
            url_prefix: default_media_url_prefix(),
            #[cfg(feature = "media-s3")]
            s3_bucket: String::new(),
            #[cfg(feature = "media-s3")]
            s3_public_base_url: String::new(),
        }
    }
}

fn default_bind_addr() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_database_url() -> String {
    "sqlite:atelier.db".to_string()
}

fn default_media_root() -> String {
    "./data/uploads".to_string()
}

fn default_media_url_prefix() -> String {
    "/static/uploads".to_string()
}

impl Settings {
    /// Loads the layered configuration. Fails fast when a required
    /// secret is absent so a misconfigured deployment never serves
    /// traffic.
    pub fn load() -> Result<Self, ConfigError> {
        // .env is a developer convenience; absence is not an error.
        if dotenvy::dotenv().is_ok() {
            debug!(".env loaded");
        }

        let settings = Config::builder()
            .add_source(File::with_name("atelier").required(false))
            .add_source(Environment::with_prefix("ATELIER").separator("__"))
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }
}
