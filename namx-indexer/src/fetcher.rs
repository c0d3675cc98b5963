//! Sequential block fetcher
//!
//! Walks heights in strict ascending order, fetching the block and
//! its block-results together. Any failure (including block-not-found
//! at the tip) pauses for the configured wait and retries the same
//! height, forever. Successful pairs go onto a bounded channel; a
//! full channel blocks the fetcher, which is the only flow control.

use std::sync::Arc;
use std::time::Duration;

use namx_rpc::{ChainClient, Error as RpcError, ResultBlock, ResultBlockResults};
use tokio::sync::{mpsc, watch};

/// One unit of work for the processor.
#[derive(Debug)]
pub struct BlockPair {
    pub block: ResultBlock,
    pub results: ResultBlockResults,
}

pub struct Fetcher<C> {
    client: Arc<C>,
    wait_for_block: Duration,
    output: mpsc::Sender<BlockPair>,
    shutdown: watch::Receiver<bool>,
}

impl<C: ChainClient> Fetcher<C> {
    pub fn new(
        client: Arc<C>,
        wait_for_block: Duration,
        output: mpsc::Sender<BlockPair>,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            client,
            wait_for_block,
            output,
            shutdown,
        }
    }

    /// Run until cancelled. Never returns an error: every fetch
    /// failure is retried at the same height.
    pub async fn run(mut self, start_height: i64) {
        tracing::info!(start_height, "starting block fetcher");

        let mut height = start_height;
        loop {
            if *self.shutdown.borrow() {
                tracing::info!("stopping block fetcher");
                return;
            }

            match self.fetch(height).await {
                Ok(pair) => {
                    // A send fails only when the processor is gone.
                    if self.output.send(pair).await.is_err() {
                        tracing::info!("processor gone, stopping block fetcher");
                        return;
                    }
                    height += 1;
                }
                Err(RpcError::BlockNotFound) => {
                    tracing::debug!(height, "block not available yet");
                    self.wait().await;
                }
                Err(error) => {
                    tracing::warn!(height, error = %error, "fetching block failed");
                    self.wait().await;
                }
            }
        }
    }

    async fn fetch(&self, height: i64) -> namx_rpc::Result<BlockPair> {
        tracing::debug!(height, "requesting block");
        let block = self.client.block(height).await?;
        let results = self.client.block_results(height).await?;
        tracing::debug!(height, "block info received");
        Ok(BlockPair { block, results })
    }

    async fn wait(&mut self) {
        tokio::select! {
            _ = tokio::time::sleep(self.wait_for_block) => {}
            _ = self.shutdown.changed() => {}
        }
    }
}
