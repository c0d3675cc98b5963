//! Indexer binary
//!
//! Wires the config, store, RPC client, fetcher and processor
//! together, and turns an interrupt signal into a cooperative
//! shutdown: the fetcher stops at its next loop boundary, the
//! processor finishes the in-flight block, the queue is dropped.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tokio::sync::{mpsc, watch};
use tracing_subscriber::EnvFilter;

use namx_indexer::config::Config;
use namx_indexer::fetcher::Fetcher;
use namx_indexer::processor::Processor;
use namx_rpc::HttpClient;
use namx_store::{PgStore, Store};

#[derive(Parser)]
#[command(name = "namx-indexer")]
#[command(about = "Chain indexer: follows a node and persists decoded blocks")]
struct Cli {
    /// Config file path
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// Checksums file path
    #[arg(long, default_value = "checksums.json")]
    checksums: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config = Config::load(&cli.config)
        .with_context(|| format!("load config {}", cli.config.display()))?;
    let checksums = namx_indexer::checksums::load(&cli.checksums)
        .with_context(|| format!("load checksums {}", cli.checksums.display()))?;
    tracing::info!(entries = checksums.len(), "checksums loaded");

    let store = PgStore::connect(&config.store_config())
        .await
        .context("connect to store")?;
    store.create_tables().await.context("create store tables")?;

    let last_height = store.last_height().await.context("read last height")?;
    tracing::info!(last_height, "resuming above last persisted height");

    let client = Arc::new(HttpClient::new(config.indexer.rpc.clone()));

    let (pair_tx, pair_rx) = mpsc::channel(config.indexer.max_blocks_in_channel.max(1));
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let fetcher = Fetcher::new(
        client.clone(),
        Duration::from_secs(config.indexer.wait_for_block),
        pair_tx,
        shutdown_rx.clone(),
    );
    let fetcher_handle = tokio::spawn(fetcher.run(last_height + 1));

    let processor = Processor::new(client, store, checksums, pair_rx, shutdown_rx);
    let mut processor_handle = tokio::spawn(processor.run());

    tracing::info!("indexer started");

    let early_result = tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("shutdown signal received");
            None
        }
        result = &mut processor_handle => Some(result),
    };

    // Stop both tasks; the processor finishes its in-flight block
    // first, the fetcher exits at its next loop boundary.
    let _ = shutdown_tx.send(true);

    let processor_result = match early_result {
        Some(result) => result,
        None => processor_handle.await,
    };
    let _ = fetcher_handle.await;

    match processor_result {
        Ok(Ok(())) => {
            tracing::info!("indexer stopped");
            Ok(())
        }
        Ok(Err(error)) => {
            tracing::error!(error = %error, "processor failed");
            Err(error.into())
        }
        Err(join_error) => Err(join_error).context("processor task panicked"),
    }
}
