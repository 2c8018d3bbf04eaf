//! REST client for a Move fullnode.
//!
//! ## Endpoints
//! - `POST {node}/transactions/simulate`: signed BCS body, zeroed signatures
//! - `POST {node}/transactions`: signed BCS body, returns the pending hash
//! - `GET {node}/transactions/by_hash/{hash}`: 404 or `pending_transaction`
//!   until the transaction is committed
//!
//! ureq is blocking, so every request runs on tokio's blocking pool.

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, trace};

use move_txn_core::auth::{signed_transaction_bytes, Authenticator, SignerIdentity};
use move_txn_core::envelope::PreparedTransaction;
use move_txn_core::executor::NetworkClient;
use move_txn_types::transaction::{
    CommittedResult, PendingTransaction, SimulationResult, TransactionHash,
};

const SIGNED_TRANSACTION_BCS: &str = "application/x.aptos.signed_transaction+bcs";

/// Fullnode REST client.
#[derive(Clone)]
pub struct RestClient {
    base_url: String,
    agent: ureq::Agent,
    poll_interval: Duration,
}

/// Transaction as returned by the node. Only the fields read here.
#[derive(Debug, Clone, Deserialize)]
struct TransactionView {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    hash: Option<String>,
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    vm_status: Option<String>,
    #[serde(default)]
    gas_used: Option<String>,
    #[serde(default)]
    version: Option<String>,
}

impl TransactionView {
    fn is_pending(&self) -> bool {
        self.kind.as_deref() == Some("pending_transaction")
    }

    fn gas_used(&self) -> Result<u64> {
        match &self.gas_used {
            Some(gas) => gas
                .parse()
                .with_context(|| format!("Invalid gas_used in response: {}", gas)),
            None => Ok(0),
        }
    }

    fn into_simulation(self) -> Result<SimulationResult> {
        Ok(SimulationResult {
            success: self.success.unwrap_or(false),
            gas_used: self.gas_used()?,
            vm_status: self.vm_status.unwrap_or_default(),
        })
    }

    fn into_committed(self, hash: &TransactionHash) -> Result<CommittedResult> {
        let gas_used = self.gas_used()?;
        let version = self
            .version
            .as_deref()
            .map(str::parse::<u64>)
            .transpose()
            .context("Invalid version in response")?;
        Ok(CommittedResult {
            hash: self
                .hash
                .map(TransactionHash::new)
                .unwrap_or_else(|| hash.clone()),
            success: self.success.unwrap_or(false),
            vm_status: self.vm_status.unwrap_or_default(),
            gas_used,
            version,
        })
    }
}

impl RestClient {
    /// Default request timeout in seconds.
    const DEFAULT_TIMEOUT_SECS: u64 = 30;
    /// Default connect timeout in seconds.
    const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
    pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

    fn build_agent(timeout: Duration, connect_timeout: Duration) -> ureq::Agent {
        ureq::AgentBuilder::new()
            .timeout(timeout)
            .timeout_connect(connect_timeout)
            .build()
    }

    /// Create a client with a custom base URL, e.g. `http://127.0.0.1:8080/v1`.
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            agent: Self::build_agent(
                Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS),
                Duration::from_secs(Self::DEFAULT_CONNECT_TIMEOUT_SECS),
            ),
            poll_interval: Self::DEFAULT_POLL_INTERVAL,
        }
    }

    /// Delay between inclusion checks.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn post_bcs(&self, path: &str, body: Vec<u8>) -> Result<Value> {
        let url = self.url(path);
        let agent = self.agent.clone();
        debug!(url = %url, bytes = body.len(), "POST signed transaction");
        tokio::task::spawn_blocking(move || {
            let response = agent
                .post(&url)
                .set("Content-Type", SIGNED_TRANSACTION_BCS)
                .set("Accept", "application/json")
                .send_bytes(&body);
            read_json(&url, response)
        })
        .await
        .context("REST worker task failed")?
    }

    /// `Ok(None)` on 404.
    async fn get_json(&self, path: &str) -> Result<Option<Value>> {
        let url = self.url(path);
        let agent = self.agent.clone();
        tokio::task::spawn_blocking(move || {
            let response = agent.get(&url).set("Accept", "application/json").call();
            match response {
                Err(ureq::Error::Status(404, _)) => Ok(None),
                other => read_json(&url, other).map(Some),
            }
        })
        .await
        .context("REST worker task failed")?
    }
}

fn read_json(url: &str, response: Result<ureq::Response, ureq::Error>) -> Result<Value> {
    match response {
        Ok(resp) => resp
            .into_json()
            .with_context(|| format!("Failed to parse response from {}", url)),
        Err(ureq::Error::Status(code, resp)) => {
            let body = resp.into_string().unwrap_or_default();
            Err(anyhow!("HTTP {} from {}: {}", code, url, body.trim()))
        }
        Err(e) => Err(anyhow!("Request to {} failed: {}", url, e)),
    }
}

fn parse_view(value: Value) -> Result<TransactionView> {
    serde_json::from_value(value).context("Unexpected transaction response shape")
}

#[async_trait]
impl NetworkClient for RestClient {
    async fn simulate(
        &self,
        txn: &PreparedTransaction,
        signer: &SignerIdentity,
    ) -> Result<SimulationResult> {
        let authenticator = signer.simulation_authenticator_for(&txn.decoded.shape);
        let body = signed_transaction_bytes(txn.raw_transaction(), &authenticator);
        let response = self.post_bcs("transactions/simulate", body).await?;

        // The node answers with a one-element array.
        let first = match response {
            Value::Array(mut items) if !items.is_empty() => items.swap_remove(0),
            Value::Array(_) => return Err(anyhow!("Simulation returned no transactions")),
            other => other,
        };
        parse_view(first)?.into_simulation()
    }

    async fn submit(
        &self,
        txn: &PreparedTransaction,
        authenticator: &Authenticator,
    ) -> Result<PendingTransaction> {
        let body = signed_transaction_bytes(txn.raw_transaction(), authenticator);
        let view = parse_view(self.post_bcs("transactions", body).await?)?;
        let hash = view
            .hash
            .ok_or_else(|| anyhow!("Submission response has no transaction hash"))?;
        Ok(PendingTransaction {
            hash: TransactionHash::new(hash),
        })
    }

    async fn wait_for_inclusion(&self, hash: &TransactionHash) -> Result<CommittedResult> {
        let path = format!("transactions/by_hash/{}", hash);
        loop {
            match self.get_json(&path).await? {
                Some(value) => {
                    let view = parse_view(value)?;
                    if !view.is_pending() {
                        return view.into_committed(hash);
                    }
                    trace!(hash = %hash, "transaction pending");
                }
                None => trace!(hash = %hash, "transaction not yet visible"),
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}
