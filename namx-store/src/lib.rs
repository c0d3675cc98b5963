//! Persistence contract and Postgres store
//!
//! The processor only depends on the [`Store`] trait: a transaction
//! handle obtained from `begin`, the per-row-kind inserts that run on
//! that handle, `commit`, and the maintenance operations
//! (`last_height`, `has_indexes`, `create_indexes`). Dropping an
//! uncommitted handle rolls the transaction back, so a failure
//! anywhere between `begin` and `commit` leaves the store untouched.

mod config;
mod models;
mod postgres;
mod tables;

pub use config::StoreConfig;
pub use models::{AccountTransaction, Block, CommitSignature, Evidence, Transaction};
pub use postgres::PgStore;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// Raised by test fakes and wrappers that fail without a
    /// database error behind them.
    #[error("store: {0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Write-side contract of the relational store.
#[async_trait]
pub trait Store: Send + Sync {
    /// In-flight transaction handle. Dropping it without `commit`
    /// rolls back.
    type Tx: Send;

    async fn begin(&self) -> Result<Self::Tx>;

    async fn commit(&self, tx: Self::Tx) -> Result<()>;

    async fn insert_block(&self, tx: &mut Self::Tx, block: &Block) -> Result<()>;

    async fn insert_commit_signatures(
        &self,
        tx: &mut Self::Tx,
        signatures: &[CommitSignature],
    ) -> Result<()>;

    async fn insert_evidences(&self, tx: &mut Self::Tx, evidences: &[Evidence]) -> Result<()>;

    async fn insert_transactions(&self, tx: &mut Self::Tx, txs: &[Transaction]) -> Result<()>;

    async fn insert_account_transactions(
        &self,
        tx: &mut Self::Tx,
        txs: &[AccountTransaction],
    ) -> Result<()>;

    /// Highest persisted block height, 0 when the store is empty.
    async fn last_height(&self) -> Result<i64>;

    async fn has_indexes(&self) -> Result<bool>;

    /// One-shot post-sync index build.
    async fn create_indexes(&self) -> Result<()>;
}
