// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Execution layer collaborators: the JSON-RPC transport, the beacon
//! roots oracle and the header verifier contract.

pub mod rpc;
pub mod oracle;
pub mod verifier;

pub use oracle::BeaconRootsOracle;
pub use rpc::RpcClient;
pub use verifier::RemoteVerifier;
