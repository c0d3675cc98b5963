//! Store connection settings

/// Connection and schema settings for the Postgres store. The schema
/// is the configured chain name, so one database can hold several
/// chains side by side.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub db_name: String,
    pub schema: String,
    pub create_index: bool,
    pub connection_timeout: u64,
}

impl StoreConfig {
    /// Postgres connection URL without TLS (the store is expected to
    /// live next to the indexer).
    pub fn url(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}?sslmode=disable",
            self.user, self.password, self.host, self.port, self.db_name
        )
    }
}
