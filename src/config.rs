//! Configuration loader for the vital-signs bridge service.
//!
//! This module centralizes all runtime configuration values and their
//! defaults, loading from environment variables (with optional `.env` file
//! support provided by the caller). Consolidating configuration here keeps
//! `env::var` calls out of the rest of the codebase and gives the service a
//! single immutable snapshot to pass around.

use std::env;

use anyhow::{anyhow, Result};

/// Parse an optional integer environment variable with a default value.
macro_rules! parse_env_num {
    ($var_name:expr, $ty:ty, $default:expr) => {
        env::var($var_name)
            .ok()
            .map(|v| v.parse::<$ty>())
            .transpose()
            .map_err(|e| anyhow!("Invalid {}: {}", $var_name, e))?
            .unwrap_or($default)
    };
}

/// Parse a required string environment variable.
macro_rules! require_env {
    ($var_name:expr) => {
        env::var($var_name)
            .map_err(|_| anyhow!("{} must be set in .env or environment", $var_name))?
    };
}

/// Strongly typed application configuration.
///
/// All fields are immutable after loading, ensuring a consistent
/// configuration snapshot for the lifetime of the application.
#[derive(Debug, Clone)]
pub struct Config {
    // ---
    /// PostgreSQL connection string.
    pub db_url: String,

    /// Maximum number of database connections in the pool.
    pub db_pool_max: u32,

    /// MQTT broker URL, e.g. `mqtt://broker.ward.local:1883`.
    pub mqtt_broker_url: String,

    /// Document number of the patient this bridge instance monitors.
    pub patient_document: String,

    /// Port the HTTP surface listens on.
    pub http_port: u16,
}

/// Load configuration from environment variables with defaults.
///
/// Required:
/// - `DATABASE_URL` – PostgreSQL connection string
/// - `MQTT_BROKER_URL` – broker address, e.g. `mqtt://host:1883`
/// - `PATIENT_DOCUMENT` – document number the monitoring topics embed
///
/// Optional:
/// - `DB_POOL_MAX` – max DB connections (default: 5)
/// - `HTTP_PORT` – HTTP listen port (default: 8000)
///
/// Returns an error if any required variable is missing or invalid.
pub fn load_from_env() -> Result<Config> {
    // ---
    let db_url = require_env!("DATABASE_URL");
    let mqtt_broker_url = require_env!("MQTT_BROKER_URL");
    let patient_document = require_env!("PATIENT_DOCUMENT");
    let db_pool_max = parse_env_num!("DB_POOL_MAX", u32, 5);
    let http_port = parse_env_num!("HTTP_PORT", u16, 8000);

    // An empty document would build topics no device publishes on.
    if patient_document.trim().is_empty() {
        return Err(anyhow!("PATIENT_DOCUMENT must not be empty"));
    }

    Ok(Config {
        db_url,
        db_pool_max,
        mqtt_broker_url,
        patient_document,
        http_port,
    })
}

impl Config {
    /// Log the loaded configuration for debugging purposes.
    ///
    /// Masks sensitive information like database passwords while showing
    /// all configuration values that were loaded.
    pub fn log_config(&self) {
        // ---
        // Mask the password in the database URL for security
        let masked_db_url = if let Some(at_pos) = self.db_url.rfind('@') {
            if let Some(colon_pos) = self.db_url[..at_pos].rfind(':') {
                format!(
                    "{}:****{}",
                    &self.db_url[..colon_pos],
                    &self.db_url[at_pos..]
                )
            } else {
                self.db_url.clone()
            }
        } else {
            self.db_url.clone()
        };

        tracing::info!("Configuration loaded:");
        tracing::info!("  DATABASE_URL     : {}", masked_db_url);
        tracing::info!("  DB_POOL_MAX      : {}", self.db_pool_max);
        tracing::info!("  MQTT_BROKER_URL  : {}", self.mqtt_broker_url);
        tracing::info!("  PATIENT_DOCUMENT : {}", self.patient_document);
        tracing::info!("  HTTP_PORT        : {}", self.http_port);
    }
}
