// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use std::net::{Ipv4Addr, SocketAddr};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use ethers_core::types::Address;
use serde::{Deserialize, Serialize};
use beacon_proof_kernel::HeaderField;

use crate::errors::{NodeError, NodeResult};

/// EIP-4788 beacon roots contract, identical on every chain that has it.
pub const BEACON_ROOTS_ADDRESS: &str = "0x000F3df6D732807Ef1319fB7B8bB8522d0Beac02";

pub const DEFAULT_BEACON_ENDPOINT: &str = "http://127.0.0.1:5052";

/// Header verifier deployment on Holesky.
pub const DEFAULT_VERIFIER_ADDRESS: &str = "0x4D581D208fe2645A97Bee8344c5073c6729a715b";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BeaconApiConfig {
    pub endpoints: Vec<String>,
    /// Adjacent slots tried when looking for a filled one.
    pub retry_attempts: u32,
    pub request_timeout_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerificationConfig {
    pub verifier_address: String,
    pub oracle_address: String,
    pub fields_to_verify: Vec<HeaderField>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EthereumNodeConfig {
    /// Empty means "use the first beacon endpoint".
    pub endpoint: String,
    pub chain_id: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    pub beacon_api: BeaconApiConfig,
    pub verification: VerificationConfig,
    pub ethereum_node: EthereumNodeConfig,
    /// Slot to verify. `None` picks the parent of the current head.
    pub slot: Option<u64>,
    pub bind_addr: SocketAddr,
}

impl Default for BeaconApiConfig {
    fn default() -> Self {
        Self {
            endpoints: vec![DEFAULT_BEACON_ENDPOINT.to_string()],
            retry_attempts: 5,
            request_timeout_ms: 5000,
        }
    }
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            verifier_address: DEFAULT_VERIFIER_ADDRESS.to_string(),
            oracle_address: BEACON_ROOTS_ADDRESS.to_string(),
            fields_to_verify: HeaderField::ALL.to_vec(),
        }
    }
}

impl Default for EthereumNodeConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            chain_id: 17000, // Holesky
        }
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            beacon_api: BeaconApiConfig::default(),
            verification: VerificationConfig::default(),
            ethereum_node: EthereumNodeConfig::default(),
            slot: None,
            bind_addr: SocketAddr::from((Ipv4Addr::LOCALHOST, 3000)),
        }
    }
}

impl NodeConfig {
    /// Loads a JSON config file. Missing keys keep their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> NodeResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .map_err(|e| NodeError::Config(format!("reading {:?}: {}", path, e)))?;
        serde_json::from_slice(&bytes)
            .map_err(|e| NodeError::Config(format!("parsing {:?}: {}", path, e)))
    }

    pub fn beacon_endpoint(&self) -> NodeResult<&str> {
        self.beacon_api
            .endpoints
            .first()
            .map(String::as_str)
            .ok_or_else(|| NodeError::Config("no beacon API endpoints configured".into()))
    }

    /// Execution endpoint, falling back to the first beacon endpoint.
    pub fn execution_endpoint(&self) -> Option<&str> {
        if !self.ethereum_node.endpoint.is_empty() {
            return Some(&self.ethereum_node.endpoint);
        }
        self.beacon_api.endpoints.first().map(String::as_str)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.beacon_api.request_timeout_ms)
    }

    pub fn verifier_address(&self) -> NodeResult<Address> {
        parse_address("verifier_address", &self.verification.verifier_address)
    }

    pub fn oracle_address(&self) -> NodeResult<Address> {
        parse_address("oracle_address", &self.verification.oracle_address)
    }

    pub fn validate(&self) -> NodeResult<()> {
        self.beacon_endpoint()?;
        if self.beacon_api.retry_attempts == 0 {
            return Err(NodeError::Config("retry_attempts must be at least 1".into()));
        }
        if self.verification.fields_to_verify.is_empty() {
            return Err(NodeError::Config("fields_to_verify is empty".into()));
        }
        self.verifier_address()?;
        self.oracle_address()?;
        Ok(())
    }
}

fn parse_address(name: &str, value: &str) -> NodeResult<Address> {
    Address::from_str(value)
        .map_err(|e| NodeError::Config(format!("{} {:?} is not an address: {}", name, value, e)))
}
