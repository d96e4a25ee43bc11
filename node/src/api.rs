// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use serde::{Deserialize, Serialize};
use beacon_proof_kernel::{Chunk, ProofBundle};

#[derive(Serialize, Deserialize, Debug)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Deserialize, Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRequest {
    pub bundle: ProofBundle,
    /// Root to replay against. Without it the bundle's own root is used.
    #[serde(default)]
    pub trusted_root: Option<Chunk>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct VerifyResponse {
    pub valid: bool,
}
