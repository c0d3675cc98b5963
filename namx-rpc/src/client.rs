//! JSON-RPC HTTP client

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;

use crate::error::{Error, Result};
use crate::types::{ResultBlock, ResultBlockResults};
use crate::ChainClient;

#[derive(Debug, Deserialize)]
struct RpcError {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcError>,
}

/// JSON-RPC 2.0 client over a single HTTP endpoint.
pub struct HttpClient {
    url: String,
    http: reqwest::Client,
}

impl HttpClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            http: reqwest::Client::new(),
        }
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<T> {
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });

        tracing::debug!(method, "rpc request");

        let response: RpcResponse<T> = self
            .http
            .post(&self.url)
            .json(&body)
            .send()
            .await?
            .json()
            .await?;

        if let Some(error) = response.error {
            return Err(Error::from_rpc(error.code, error.message));
        }
        response
            .result
            .ok_or_else(|| Error::InvalidResponse(format!("{method}: neither result nor error")))
    }
}

#[async_trait]
impl ChainClient for HttpClient {
    async fn block(&self, height: i64) -> Result<ResultBlock> {
        self.call("block", json!({ "height": height.to_string() }))
            .await
    }

    async fn block_results(&self, height: i64) -> Result<ResultBlockResults> {
        self.call("block_results", json!({ "height": height.to_string() }))
            .await
    }

    async fn latest_block(&self) -> Result<ResultBlock> {
        self.call("block", json!({})).await
    }
}
