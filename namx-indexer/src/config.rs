//! Indexer configuration
//!
//! TOML file with `chain_name`, `database`, `server`, `indexer` and
//! `prometheus` sections. The `server` and `prometheus` sections
//! belong to the companion query API and the metrics exporter; they
//! are parsed for file compatibility and otherwise ignored here.

use std::path::Path;

use namx_store::StoreConfig;
use serde::Deserialize;

use crate::{IndexerError, Result};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub chain_name: String,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub server: ServerConfig,
    pub indexer: IndexerConfig,
    #[serde(default)]
    pub prometheus: PrometheusConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub db_name: String,
    #[serde(default)]
    pub create_index: bool,
    #[serde(default = "default_connection_timeout")]
    pub connection_timeout: u64,
}

fn default_connection_timeout() -> u64 {
    30
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IndexerConfig {
    /// JSON-RPC endpoint of the followed node.
    pub rpc: String,
    /// Seconds to wait before retrying a failed height.
    pub wait_for_block: u64,
    /// Bound of the fetcher-to-processor channel.
    pub max_blocks_in_channel: usize,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PrometheusConfig {
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub port: u16,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| IndexerError::Config(format!("parse {}: {e}", path.display())))
    }

    /// Store settings: the database section plus the chain name as
    /// the schema.
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            host: self.database.host.clone(),
            port: self.database.port,
            user: self.database.user.clone(),
            password: self.database.password.clone(),
            db_name: self.database.db_name.clone(),
            schema: self.chain_name.clone(),
            create_index: self.database.create_index,
            connection_timeout: self.database.connection_timeout,
        }
    }
}
