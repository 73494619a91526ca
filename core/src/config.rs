//! Configuration for the graph store connection
//!
//! This module provides the connection settings consumed by the Neo4j store
//! adapter. Settings can come from defaults, a JSON file, or environment
//! variables (with `.env` support); the lifecycle of the resulting
//! connection is owned by whoever constructs the adapter at startup.

use std::env;
use std::io;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable prefix for all settings
const ENV_PREFIX: &str = "RECEIPT_GRAPH";

/// Error type for settings loading
#[derive(Error, Debug)]
pub enum SettingsError {
    /// A settings file could not be read or written
    #[error("settings IO error: {0}")]
    Io(#[from] io::Error),

    /// A settings file could not be parsed or serialized
    #[error("settings JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An environment variable holds an unusable value
    #[error("invalid value for {variable}: {value}")]
    InvalidEnvValue {
        /// The offending environment variable
        variable: String,
        /// The value that failed to parse
        value: String,
    },
}

/// Graph store connection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreSettings {
    /// Graph database host
    pub host: String,

    /// Bolt port
    pub port: u16,

    /// Database user
    pub user: String,

    /// Database password
    pub password: String,

    /// Database name
    pub database: String,

    /// Maximum number of pooled connections
    pub max_connections: usize,

    /// Result fetch size per round-trip
    pub fetch_size: usize,
}

impl Default for StoreSettings {
    fn default() -> Self {
        StoreSettings {
            host: "localhost".to_string(),
            port: 7687,
            user: "neo4j".to_string(),
            password: "admin".to_string(),
            database: "neo4j".to_string(),
            max_connections: 16,
            fetch_size: 200,
        }
    }
}

impl StoreSettings {
    /// Create settings with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// The Bolt URI for these settings
    pub fn uri(&self) -> String {
        format!("bolt://{}:{}", self.host, self.port)
    }

    /// Load settings from the environment, starting from defaults.
    ///
    /// A `.env` file in the working directory is honored if present.
    /// Recognized variables: `RECEIPT_GRAPH_HOST`, `RECEIPT_GRAPH_PORT`,
    /// `RECEIPT_GRAPH_USER`, `RECEIPT_GRAPH_PASSWORD`,
    /// `RECEIPT_GRAPH_DATABASE`.
    pub fn from_env() -> Result<Self, SettingsError> {
        dotenvy::dotenv().ok();

        let mut settings = Self::default();

        if let Ok(host) = env::var(format!("{}_HOST", ENV_PREFIX)) {
            settings.host = host;
        }
        if let Ok(port) = env::var(format!("{}_PORT", ENV_PREFIX)) {
            settings.port = port.parse().map_err(|_| SettingsError::InvalidEnvValue {
                variable: format!("{}_PORT", ENV_PREFIX),
                value: port,
            })?;
        }
        if let Ok(user) = env::var(format!("{}_USER", ENV_PREFIX)) {
            settings.user = user;
        }
        if let Ok(password) = env::var(format!("{}_PASSWORD", ENV_PREFIX)) {
            settings.password = password;
        }
        if let Ok(database) = env::var(format!("{}_DATABASE", ENV_PREFIX)) {
            settings.database = database;
        }

        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn from_file(path: &str) -> Result<Self, SettingsError> {
        let file = std::fs::File::open(path)?;
        let settings = serde_json::from_reader(file)?;
        Ok(settings)
    }

    /// Save settings to a JSON file
    pub fn to_file(&self, path: &str) -> Result<(), SettingsError> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }
}
