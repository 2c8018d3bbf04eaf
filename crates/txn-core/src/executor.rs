//! Execution engine.
//!
//! Drives a decoded envelope through one of two flows against a
//! [`NetworkClient`]:
//!
//! - **dry run**: `simulate` only. No signature needed, nothing is submitted.
//! - **commit**: `submit` once, then `wait_for_inclusion` once.
//!
//! Every network round trip is bounded by the optional caller timeout.
//! Nothing is retried here; a failed or timed-out call ends the execution.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use move_txn_types::transaction::{
    CommittedResult, ExecutionOutcome, PendingTransaction, SimulationResult, TransactionHash,
    TransactionShape,
};
use tracing::{debug, info, warn};

use crate::auth::{build_authenticator, Authenticator, SignerIdentity, SignerMode};
use crate::envelope::PreparedTransaction;
use crate::error::{ExecutionError, ExecutionPhase};

/// Transport to a network node.
#[async_trait]
pub trait NetworkClient: Send + Sync {
    /// Run the transaction without committing it.
    async fn simulate(
        &self,
        txn: &PreparedTransaction,
        signer: &SignerIdentity,
    ) -> Result<SimulationResult>;

    /// Submit a signed transaction. Returns once the node accepted it.
    async fn submit(
        &self,
        txn: &PreparedTransaction,
        authenticator: &Authenticator,
    ) -> Result<PendingTransaction>;

    /// Block until the transaction reaches a terminal state.
    async fn wait_for_inclusion(&self, hash: &TransactionHash) -> Result<CommittedResult>;
}

#[async_trait]
impl<T: NetworkClient + ?Sized> NetworkClient for Arc<T> {
    async fn simulate(
        &self,
        txn: &PreparedTransaction,
        signer: &SignerIdentity,
    ) -> Result<SimulationResult> {
        (**self).simulate(txn, signer).await
    }

    async fn submit(
        &self,
        txn: &PreparedTransaction,
        authenticator: &Authenticator,
    ) -> Result<PendingTransaction> {
        (**self).submit(txn, authenticator).await
    }

    async fn wait_for_inclusion(&self, hash: &TransactionHash) -> Result<CommittedResult> {
        (**self).wait_for_inclusion(hash).await
    }
}

/// Everything the caller supplies for one execution.
#[derive(Debug, Clone)]
pub struct ExecutionRequest {
    pub transaction: PreparedTransaction,
    pub signer_mode: SignerMode,
    pub public_key: Vec<u8>,
    /// Required unless `dry_run` is set.
    pub signature: Option<Vec<u8>>,
    pub dry_run: bool,
}

pub struct ExecutionEngine<C> {
    client: C,
    timeout: Option<Duration>,
}

impl<C: NetworkClient> ExecutionEngine<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            timeout: None,
        }
    }

    /// Bound each network round trip. `None` waits indefinitely.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub async fn execute(
        &self,
        request: &ExecutionRequest,
    ) -> Result<ExecutionOutcome, ExecutionError> {
        let txn = &request.transaction;
        let function = txn.decoded.payload.function_id();

        let result = if request.dry_run {
            self.dry_run(request).await.map(ExecutionOutcome::Simulated)
        } else {
            self.commit(request).await.map(ExecutionOutcome::Committed)
        };

        match &result {
            Ok(outcome) => info!(
                phase = %ExecutionPhase::Done,
                function = %function,
                success = outcome.success(),
                vm_status = outcome.vm_status(),
                "execution finished"
            ),
            Err(e) => warn!(
                phase = %ExecutionPhase::Failed,
                function = %function,
                error = %e,
                "execution failed"
            ),
        }
        result
    }

    async fn dry_run(&self, request: &ExecutionRequest) -> Result<SimulationResult, ExecutionError> {
        let txn = &request.transaction;
        let signer = SignerIdentity::parse(request.signer_mode, &request.public_key)?;
        debug!(phase = %ExecutionPhase::Built, mode = ?signer.mode(), "signer identity ready");

        info!(phase = %ExecutionPhase::Simulating, "simulating transaction");
        self.bounded(ExecutionPhase::Simulating, self.client.simulate(txn, &signer))
            .await
    }

    async fn commit(&self, request: &ExecutionRequest) -> Result<CommittedResult, ExecutionError> {
        let signature = request
            .signature
            .as_deref()
            .ok_or(ExecutionError::MissingSignature)?;
        let txn = &request.transaction;
        ensure_plain(&txn.decoded.shape)?;
        let authenticator =
            build_authenticator(request.signer_mode, &request.public_key, signature)?;
        debug!(phase = %ExecutionPhase::Built, mode = ?authenticator.mode(), "authenticator ready");

        info!(phase = %ExecutionPhase::Submitting, "submitting transaction");
        let pending = self
            .bounded(
                ExecutionPhase::Submitting,
                self.client.submit(txn, &authenticator),
            )
            .await?;

        info!(phase = %ExecutionPhase::Awaiting, hash = %pending.hash, "waiting for inclusion");
        self.bounded(
            ExecutionPhase::Awaiting,
            self.client.wait_for_inclusion(&pending.hash),
        )
        .await
        .map_err(|e| match e {
            ExecutionError::Timeout { phase, after, .. } => ExecutionError::Timeout {
                phase,
                after,
                hash: Some(pending.hash.clone()),
            },
            other => other,
        })
    }

    async fn bounded<T, F>(&self, phase: ExecutionPhase, call: F) -> Result<T, ExecutionError>
    where
        F: Future<Output = Result<T>>,
    {
        let result = match self.timeout {
            Some(after) => tokio::time::timeout(after, call)
                .await
                .map_err(|_| ExecutionError::Timeout {
                    phase,
                    after,
                    hash: None,
                })?,
            None => call.await,
        };
        result.map_err(ExecutionError::NetworkFailure)
    }
}

fn ensure_plain(shape: &TransactionShape) -> Result<(), ExecutionError> {
    match shape {
        TransactionShape::Plain => Ok(()),
        TransactionShape::FeePayer(payer) => Err(ExecutionError::UnsupportedTransactionShape(
            format!(
                "fee payer {} must sign before submission",
                payer.to_short_string()
            ),
        )),
    }
}
