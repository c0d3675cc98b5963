//! Table and index DDL

pub(crate) fn create_blocks_table(table: &str) -> String {
    format!(
        r#"CREATE TABLE IF NOT EXISTS {table} (
        block_id BYTEA NOT NULL,
        header_version_app BIGINT NOT NULL,
        header_version_block BIGINT NOT NULL,
        header_chain_id TEXT NOT NULL,
        header_height BIGINT NOT NULL,
        header_time TIMESTAMPTZ NOT NULL,
        header_last_block_id_hash BYTEA,
        header_last_block_id_parts_header_total BIGINT,
        header_last_block_id_parts_header_hash BYTEA,
        header_last_commit_hash BYTEA,
        header_data_hash BYTEA,
        header_validators_hash BYTEA NOT NULL,
        header_next_validators_hash BYTEA NOT NULL,
        header_consensus_hash BYTEA NOT NULL,
        header_app_hash BYTEA NOT NULL,
        header_last_results_hash BYTEA,
        header_evidence_hash BYTEA,
        header_proposer_address BYTEA NOT NULL,
        commit_height BIGINT,
        commit_round BIGINT,
        commit_block_id_hash BYTEA,
        commit_block_id_parts_header_total BIGINT,
        commit_block_id_parts_header_hash BYTEA
    )"#
    )
}

pub(crate) fn create_transactions_table(table: &str) -> String {
    format!(
        r#"CREATE TABLE IF NOT EXISTS {table} (
        hash BYTEA NOT NULL,
        block_id BYTEA NOT NULL,
        tx_type TEXT NOT NULL,
        wrapper_id BYTEA,
        memo TEXT,
        fee_amount_per_gas_unit TEXT,
        fee_token TEXT,
        gas_limit_multiplier BIGINT,
        code BYTEA,
        data JSONB,
        return_code BIGINT,
        pos_in_block BIGINT NOT NULL
    )"#
    )
}

pub(crate) fn create_evidences_table(table: &str) -> String {
    format!(
        r#"CREATE TABLE IF NOT EXISTS {table} (
        block_id BYTEA NOT NULL,
        height BIGINT NOT NULL,
        time BIGINT NOT NULL,
        address BYTEA,
        total_voting_power BIGINT NOT NULL,
        validator_power BIGINT NOT NULL
    )"#
    )
}

pub(crate) fn create_commit_signatures_table(table: &str) -> String {
    format!(
        r#"CREATE TABLE IF NOT EXISTS {table} (
        block_id BYTEA NOT NULL,
        block_id_flag INTEGER NOT NULL,
        validator_address BYTEA NOT NULL,
        timestamp BIGINT NOT NULL,
        signature BYTEA NOT NULL
    )"#
    )
}

pub(crate) fn create_account_transactions_table(table: &str) -> String {
    format!(
        r#"CREATE TABLE IF NOT EXISTS {table} (
        address TEXT NOT NULL,
        tx_hash BYTEA NOT NULL,
        block_height BIGINT NOT NULL,
        tx_pos BIGINT NOT NULL
    )"#
    )
}
