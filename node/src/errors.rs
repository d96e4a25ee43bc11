// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use beacon_proof_kernel::ProofError;

#[derive(Error, Debug)]
pub enum NodeError {
    #[error("Proof error: {0}")]
    Proof(#[from] ProofError),
    #[error("Network error: {0}")]
    Network(String),
    #[error("Beacon API returned status code {status}")]
    BeaconApi { status: u16 },
    #[error("No block found for slot {0}")]
    SlotNotFound(String),
    #[error("Execution timestamp unavailable for slot {slot}")]
    TimestampUnavailable { slot: String },
    #[error("Oracle has no root recorded for timestamp {timestamp}")]
    OracleUnavailable { timestamp: u64 },
    #[error("JSON-RPC error {code}: {message}")]
    Rpc { code: i64, message: String },
    #[error("ABI error: {0}")]
    Abi(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type NodeResult<T> = std::result::Result<T, NodeError>;

impl NodeError {
    /// Upstream conditions a caller may retry: the request itself was fine.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            NodeError::Network(_)
                | NodeError::BeaconApi { .. }
                | NodeError::SlotNotFound(_)
                | NodeError::TimestampUnavailable { .. }
        )
    }
}

impl From<reqwest::Error> for NodeError {
    fn from(e: reqwest::Error) -> Self {
        NodeError::Network(e.to_string())
    }
}

impl IntoResponse for NodeError {
    fn into_response(self) -> Response {
        let status = match &self {
            NodeError::Proof(_) | NodeError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            NodeError::SlotNotFound(_) => StatusCode::NOT_FOUND,
            NodeError::TimestampUnavailable { .. } | NodeError::OracleUnavailable { .. } => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            NodeError::Network(_)
            | NodeError::BeaconApi { .. }
            | NodeError::Rpc { .. }
            | NodeError::Abi(_) => StatusCode::BAD_GATEWAY,
            NodeError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}
