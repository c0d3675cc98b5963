//! Postgres store

use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, Transaction as SqlxTransaction};

use crate::models::{AccountTransaction, Block, CommitSignature, Evidence, Transaction};
use crate::tables;
use crate::{Result, Store, StoreConfig};

/// Postgres-backed [`Store`]. All tables live in a schema named after
/// the configured chain.
pub struct PgStore {
    pool: PgPool,
    schema: String,
    create_index: bool,
}

impl PgStore {
    pub async fn connect(config: &StoreConfig) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect(&config.url())
            .await?;

        tracing::info!(
            host = %config.host,
            db = %config.db_name,
            schema = %config.schema,
            "connected to store"
        );

        Ok(Self {
            pool,
            schema: config.schema.clone(),
            create_index: config.create_index,
        })
    }

    fn table(&self, name: &str) -> String {
        format!(r#""{}".{}"#, self.schema, name)
    }

    /// Create the schema and all tables when missing.
    pub async fn create_tables(&self) -> Result<()> {
        sqlx::query(&format!(r#"CREATE SCHEMA IF NOT EXISTS "{}""#, self.schema))
            .execute(&self.pool)
            .await?;

        let statements = [
            tables::create_blocks_table(&self.table("blocks")),
            tables::create_transactions_table(&self.table("transactions")),
            tables::create_evidences_table(&self.table("evidences")),
            tables::create_commit_signatures_table(&self.table("commit_signatures")),
            tables::create_account_transactions_table(&self.table("account_transactions")),
        ];
        for statement in &statements {
            sqlx::query(statement).execute(&self.pool).await?;
        }

        tracing::info!(schema = %self.schema, "store tables ready");
        Ok(())
    }
}

#[async_trait]
impl Store for PgStore {
    type Tx = SqlxTransaction<'static, Postgres>;

    async fn begin(&self) -> Result<Self::Tx> {
        Ok(self.pool.begin().await?)
    }

    async fn commit(&self, tx: Self::Tx) -> Result<()> {
        Ok(tx.commit().await?)
    }

    async fn insert_block(&self, tx: &mut Self::Tx, block: &Block) -> Result<()> {
        let query = format!(
            "INSERT INTO {} (block_id, header_version_app, header_version_block, \
             header_chain_id, header_height, header_time, header_last_block_id_hash, \
             header_last_block_id_parts_header_total, header_last_block_id_parts_header_hash, \
             header_last_commit_hash, header_data_hash, header_validators_hash, \
             header_next_validators_hash, header_consensus_hash, header_app_hash, \
             header_last_results_hash, header_evidence_hash, header_proposer_address, \
             commit_height, commit_round, commit_block_id_hash, \
             commit_block_id_parts_header_total, commit_block_id_parts_header_hash) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, \
             $17, $18, $19, $20, $21, $22, $23)",
            self.table("blocks")
        );
        sqlx::query(&query)
            .bind(&block.block_id)
            .bind(block.header_version_app)
            .bind(block.header_version_block)
            .bind(&block.header_chain_id)
            .bind(block.header_height)
            .bind(block.header_time)
            .bind(&block.header_last_block_id_hash)
            .bind(block.header_last_block_id_parts_header_total)
            .bind(&block.header_last_block_id_parts_header_hash)
            .bind(&block.header_last_commit_hash)
            .bind(&block.header_data_hash)
            .bind(&block.header_validators_hash)
            .bind(&block.header_next_validators_hash)
            .bind(&block.header_consensus_hash)
            .bind(&block.header_app_hash)
            .bind(&block.header_last_results_hash)
            .bind(&block.header_evidence_hash)
            .bind(&block.header_proposer_address)
            .bind(block.commit_height)
            .bind(block.commit_round)
            .bind(&block.commit_block_id_hash)
            .bind(block.commit_block_id_parts_header_total)
            .bind(&block.commit_block_id_parts_header_hash)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    async fn insert_commit_signatures(
        &self,
        tx: &mut Self::Tx,
        signatures: &[CommitSignature],
    ) -> Result<()> {
        let query = format!(
            "INSERT INTO {} (block_id, block_id_flag, validator_address, timestamp, signature) \
             VALUES ($1, $2, $3, $4, $5)",
            self.table("commit_signatures")
        );
        for signature in signatures {
            sqlx::query(&query)
                .bind(&signature.block_id)
                .bind(signature.block_id_flag)
                .bind(&signature.validator_address)
                .bind(signature.timestamp)
                .bind(&signature.signature)
                .execute(&mut **tx)
                .await?;
        }
        Ok(())
    }

    async fn insert_evidences(&self, tx: &mut Self::Tx, evidences: &[Evidence]) -> Result<()> {
        let query = format!(
            "INSERT INTO {} (block_id, height, time, address, total_voting_power, \
             validator_power) VALUES ($1, $2, $3, $4, $5, $6)",
            self.table("evidences")
        );
        for evidence in evidences {
            sqlx::query(&query)
                .bind(&evidence.block_id)
                .bind(evidence.height)
                .bind(evidence.time)
                .bind(&evidence.address)
                .bind(evidence.total_voting_power)
                .bind(evidence.validator_power)
                .execute(&mut **tx)
                .await?;
        }
        Ok(())
    }

    async fn insert_transactions(&self, tx: &mut Self::Tx, txs: &[Transaction]) -> Result<()> {
        let query = format!(
            "INSERT INTO {} (hash, block_id, tx_type, wrapper_id, memo, \
             fee_amount_per_gas_unit, fee_token, gas_limit_multiplier, code, data, \
             return_code, pos_in_block) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)",
            self.table("transactions")
        );
        for transaction in txs {
            sqlx::query(&query)
                .bind(&transaction.hash)
                .bind(&transaction.block_id)
                .bind(&transaction.tx_type)
                .bind(&transaction.wrapper_id)
                .bind(&transaction.memo)
                .bind(&transaction.fee_amount_per_gas_unit)
                .bind(&transaction.fee_token)
                .bind(transaction.gas_limit_multiplier)
                .bind(&transaction.code)
                .bind(&transaction.data)
                .bind(transaction.return_code)
                .bind(transaction.pos_in_block)
                .execute(&mut **tx)
                .await?;
        }
        Ok(())
    }

    async fn insert_account_transactions(
        &self,
        tx: &mut Self::Tx,
        txs: &[AccountTransaction],
    ) -> Result<()> {
        let query = format!(
            "INSERT INTO {} (address, tx_hash, block_height, tx_pos) VALUES ($1, $2, $3, $4)",
            self.table("account_transactions")
        );
        for account_tx in txs {
            sqlx::query(&query)
                .bind(&account_tx.address)
                .bind(&account_tx.tx_hash)
                .bind(account_tx.block_height)
                .bind(account_tx.tx_pos)
                .execute(&mut **tx)
                .await?;
        }
        Ok(())
    }

    async fn last_height(&self) -> Result<i64> {
        let query = format!(
            "SELECT COALESCE(MAX(header_height), 0) FROM {}",
            self.table("blocks")
        );
        let height: i64 = sqlx::query_scalar(&query).fetch_one(&self.pool).await?;
        Ok(height)
    }

    async fn has_indexes(&self) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM pg_indexes WHERE schemaname = $1 AND tablename = 'blocks')",
        )
        .bind(&self.schema)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn create_indexes(&self) -> Result<()> {
        if !self.create_index {
            tracing::info!("index creation disabled by config");
            return Ok(());
        }

        let blocks = self.table("blocks");
        let transactions = self.table("transactions");
        let account_transactions = self.table("account_transactions");
        let commit_signatures = self.table("commit_signatures");

        let statements = [
            format!("ALTER TABLE {blocks} ADD CONSTRAINT pk_blocks_block_id PRIMARY KEY (block_id)"),
            format!(
                "CREATE UNIQUE INDEX IF NOT EXISTS blocks_header_height_unique \
                 ON {blocks} (header_height)"
            ),
            format!(
                "ALTER TABLE {transactions} ADD CONSTRAINT fk_transactions_block_id \
                 FOREIGN KEY (block_id) REFERENCES {blocks} (block_id)"
            ),
            format!(
                "CREATE INDEX IF NOT EXISTS transactions_block_id_idx \
                 ON {transactions} USING hash(block_id)"
            ),
            format!(
                "CREATE INDEX IF NOT EXISTS transactions_hash_idx \
                 ON {transactions} USING hash(hash)"
            ),
            format!(
                "CREATE INDEX IF NOT EXISTS transactions_memo_idx \
                 ON {transactions} USING hash(memo) WHERE memo IS NOT NULL"
            ),
            format!(
                "CREATE INDEX IF NOT EXISTS account_transactions_address_idx \
                 ON {account_transactions} USING hash(address)"
            ),
            format!(
                "CREATE INDEX IF NOT EXISTS commit_signatures_block_idx \
                 ON {commit_signatures} USING hash(block_id)"
            ),
        ];
        for statement in &statements {
            sqlx::query(statement).execute(&self.pool).await?;
        }

        tracing::info!(schema = %self.schema, "store indexes created");
        Ok(())
    }
}
