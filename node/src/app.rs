// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Fetch a header, prove its fields, check the proofs locally and on chain.

use std::sync::Arc;

use serde::Serialize;
use beacon_proof_kernel::codec::{decode_header, decode_u64_chunk};
use beacon_proof_kernel::config::SECONDS_PER_SLOT;
use beacon_proof_kernel::{Chunk, HeaderField, HeaderRecord, ProofBundle};

use crate::beacon::{BeaconClient, Direction, HeaderData};
use crate::chain::{BeaconRootsOracle, RemoteVerifier, RpcClient};
use crate::config::NodeConfig;
use crate::errors::{NodeError, NodeResult};
use crate::telemetry;

/// A decoded header together with the oracle key its root is recorded under.
#[derive(Debug, Clone)]
pub struct ProvenHeader {
    pub slot: u64,
    pub header: HeaderRecord,
    /// Root the beacon node reported, if it reported one.
    pub reported_root: Option<Chunk>,
    /// Execution timestamp of the header's own block.
    pub timestamp: u64,
    /// Timestamp of the next filled slot.
    pub oracle_key: u64,
}

impl ProvenHeader {
    /// Seconds between this block and the one whose timestamp keys the oracle.
    pub fn timestamp_gap(&self) -> u64 {
        self.oracle_key.saturating_sub(self.timestamp)
    }

    fn report(&self) {
        tracing::info!("Beacon block header to verify:");
        for field in HeaderField::ALL {
            let chunk = self.header.field_chunk(field);
            if field.is_numeric() {
                tracing::info!("  {}: {}", field, decode_u64_chunk(&chunk));
            } else {
                tracing::info!("  {}: {}", field, chunk);
            }
        }
        let gap = self.timestamp_gap();
        tracing::info!("Next filled slot timestamp: {}", self.oracle_key);
        tracing::info!(
            "Time difference between blocks: {} seconds ({:.2} slots)",
            gap,
            gap as f64 / SECONDS_PER_SLOT as f64
        );
    }
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct FieldOutcome {
    pub field: Option<HeaderField>,
    /// Replay against the bundle's own root.
    pub local: Option<bool>,
    /// Replay against the oracle's root.
    pub oracle: Option<bool>,
    /// Verdict of the verifier contract.
    pub remote: Option<bool>,
    /// Every failure met while checking the field, in order.
    pub errors: Vec<String>,
}

impl FieldOutcome {
    /// No check said `false` and nothing failed.
    pub fn passed(&self) -> bool {
        self.errors.is_empty()
            && self.local != Some(false)
            && self.oracle != Some(false)
            && self.remote != Some(false)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub slot: u64,
    pub oracle_key: u64,
    /// `oracle_key` minus the verified block's timestamp, in seconds.
    pub timestamp_gap: u64,
    pub outcomes: Vec<FieldOutcome>,
}

impl RunSummary {
    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.passed()).count()
    }

    pub fn all_passed(&self) -> bool {
        self.failed() == 0
    }
}

/// Execution-layer half: absent when no endpoint answered at start-up.
#[derive(Debug, Clone)]
pub struct ChainContext {
    pub oracle: BeaconRootsOracle,
    pub verifier: RemoteVerifier,
}

#[derive(Debug, Clone)]
pub struct Application {
    config: NodeConfig,
    beacon: BeaconClient,
    chain: Option<ChainContext>,
}

impl Application {
    /// Beacon side only. Remote checks are skipped.
    pub fn new(config: NodeConfig) -> NodeResult<Self> {
        config.validate()?;
        let beacon = BeaconClient::new(config.beacon_endpoint()?, config.request_timeout())?;
        Ok(Self { config, beacon, chain: None })
    }

    /// Like [`Self::new`], then probes the execution endpoint. An endpoint
    /// that does not answer `eth_chainId` only disables remote checks.
    pub async fn connect(config: NodeConfig) -> NodeResult<Self> {
        let mut app = Self::new(config)?;
        let Some(endpoint) = app.config.execution_endpoint().map(str::to_string) else {
            tracing::warn!("No execution endpoint configured. Remote verification disabled.");
            return Ok(app);
        };

        let rpc = Arc::new(RpcClient::new(&endpoint, app.config.request_timeout())?);
        match rpc.chain_id().await {
            Ok(id) if id != app.config.ethereum_node.chain_id => {
                tracing::warn!(
                    "Execution node reports chain id {}, configured {}",
                    id,
                    app.config.ethereum_node.chain_id
                );
            }
            Ok(id) => tracing::info!("Connected to execution node {} (chain id {})", rpc.url(), id),
            Err(e) => {
                tracing::warn!("Execution node {} unreachable ({}). Remote verification disabled.", endpoint, e);
                return Ok(app);
            }
        }

        let oracle = BeaconRootsOracle::new(rpc.clone(), app.config.oracle_address()?);
        let verifier = RemoteVerifier::new(rpc, app.config.verifier_address()?)?;
        app.chain = Some(ChainContext { oracle, verifier });
        Ok(app)
    }

    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    pub fn remote_enabled(&self) -> bool {
        self.chain.is_some()
    }

    /// First header found walking from `slot` in `direction`.
    pub async fn fetch_with_retry(&self, slot: u64, direction: Direction) -> NodeResult<HeaderData> {
        let attempts = self.config.beacon_api.retry_attempts;
        for attempt in 1..=attempts {
            let Some(target) = direction.target(slot, attempt) else {
                break;
            };
            metrics::increment_counter!(telemetry::HEADER_FETCH_ATTEMPTS);
            match self.beacon.fetch_header(&target.to_string()).await {
                Ok(data) => {
                    tracing::info!("Fetched header for slot {} (attempt {}/{})", target, attempt, attempts);
                    return Ok(data);
                }
                Err(e) if e.is_retryable() => {
                    tracing::warn!("Slot {} unavailable (attempt {}/{}): {}", target, attempt, attempts, e);
                }
                Err(e) => return Err(e),
            }
        }
        Err(NodeError::SlotNotFound(format!(
            "{} ({:?}, {} attempts)",
            slot, direction, attempts
        )))
    }

    /// Header at exactly `slot`, keyed by the next filled slot.
    pub async fn header_at(&self, slot: u64) -> NodeResult<ProvenHeader> {
        let target = self.fetch_with_retry(slot, Direction::Requested).await?;
        let next = self.fetch_with_retry(target.slot()?, Direction::Next).await?;
        prove(&target, next.timestamp)
    }

    /// Parent of the current head, keyed by the head's timestamp.
    pub async fn latest_provable(&self) -> NodeResult<ProvenHeader> {
        tracing::info!("Fetching latest beacon block header from {}", self.beacon.base_url());
        let head = self.beacon.fetch_header("head").await?;
        let target = self.fetch_with_retry(head.slot()?, Direction::Previous).await?;
        prove(&target, head.timestamp)
    }

    pub async fn resolve(&self) -> NodeResult<ProvenHeader> {
        match self.config.slot {
            Some(slot) => self.header_at(slot).await,
            None => self.latest_provable().await,
        }
    }

    pub async fn bundle_for(&self, slot: u64, field: HeaderField) -> NodeResult<ProofBundle> {
        let proven = self.header_at(slot).await?;
        tracing::debug!("Slot {} keyed {}s later", proven.slot, proven.timestamp_gap());
        let bundle = ProofBundle::for_field(&proven.header, field, proven.oracle_key)?;
        metrics::increment_counter!(telemetry::BUNDLES_GENERATED);
        Ok(bundle)
    }

    /// Proves and checks every configured field. Per-field failures are
    /// recorded in the summary, not returned.
    pub async fn run(&self) -> NodeResult<RunSummary> {
        let proven = self.resolve().await?;
        tracing::info!(
            "Proving slot {} against oracle key {}",
            proven.slot,
            proven.oracle_key
        );
        proven.report();

        // Errors are kept as text: each field records its own copy.
        let trusted_root = match &self.chain {
            Some(chain) => Some(
                chain
                    .oracle
                    .trusted_root(proven.oracle_key)
                    .await
                    .map_err(|e| {
                        tracing::warn!("No trusted root: {}", e);
                        e.to_string()
                    }),
            ),
            None => None,
        };

        let mut outcomes = Vec::with_capacity(self.config.verification.fields_to_verify.len());
        for &field in &self.config.verification.fields_to_verify {
            let outcome = self.check_field(&proven, field, trusted_root.as_ref()).await;
            if outcome.passed() {
                tracing::info!("{}: ok", field);
            } else {
                tracing::warn!("{}: failed {:?}", field, outcome);
            }
            outcomes.push(outcome);
        }

        let summary = RunSummary {
            slot: proven.slot,
            oracle_key: proven.oracle_key,
            timestamp_gap: proven.timestamp_gap(),
            outcomes,
        };
        tracing::info!(
            "Verified {} of {} fields for slot {}",
            summary.outcomes.len() - summary.failed(),
            summary.outcomes.len(),
            summary.slot
        );
        Ok(summary)
    }

    async fn check_field(
        &self,
        proven: &ProvenHeader,
        field: HeaderField,
        trusted_root: Option<&Result<Chunk, String>>,
    ) -> FieldOutcome {
        let mut outcome = FieldOutcome {
            field: Some(field),
            ..FieldOutcome::default()
        };

        let bundle = match ProofBundle::for_field(&proven.header, field, proven.oracle_key) {
            Ok(bundle) => bundle,
            Err(e) => {
                outcome.errors.push(e.to_string());
                return outcome;
            }
        };
        metrics::increment_counter!(telemetry::BUNDLES_GENERATED);

        match bundle.verify_self() {
            Ok(valid) => {
                metrics::increment_counter!(
                    telemetry::LOCAL_VERIFICATIONS,
                    "result" => telemetry::outcome_label(valid)
                );
                outcome.local = Some(valid);
            }
            Err(e) => {
                outcome.errors.push(e.to_string());
                return outcome;
            }
        }

        let Some(chain) = &self.chain else {
            return outcome;
        };

        match trusted_root {
            Some(Ok(root)) => match bundle.verify_against(root) {
                Ok(valid) => outcome.oracle = Some(valid),
                Err(e) => outcome.errors.push(e.to_string()),
            },
            Some(Err(e)) => outcome.errors.push(e.clone()),
            None => {}
        }

        match chain.verifier.verify(&bundle).await {
            Ok(valid) => outcome.remote = Some(valid),
            Err(e) => {
                tracing::warn!("Remote verification of {} failed: {}", field, e);
                outcome.errors.push(e.to_string());
            }
        }
        outcome
    }
}

fn prove(target: &HeaderData, oracle_key: u64) -> NodeResult<ProvenHeader> {
    let header = decode_header(&target.header)?;
    let reported_root = if target.block_root.is_empty() {
        None
    } else {
        Some(Chunk::from_hex(&target.block_root).map_err(|e| {
            NodeError::InvalidInput(format!("block root {:?}: {}", target.block_root, e))
        })?)
    };

    if let Some(reported) = reported_root {
        let computed = header.root();
        if computed != reported {
            tracing::warn!(
                "Header root {} differs from the beacon node's {} for slot {}",
                computed,
                reported,
                header.slot
            );
        }
    }

    Ok(ProvenHeader {
        slot: header.slot,
        header,
        reported_root,
        timestamp: target.timestamp,
        oracle_key,
    })
}
