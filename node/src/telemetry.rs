// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use std::sync::OnceLock;

static PROM_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

pub const BUNDLES_GENERATED: &str = "beacon_proof_bundles_generated_total";
pub const LOCAL_VERIFICATIONS: &str = "beacon_proof_local_verifications_total";
pub const REMOTE_VERIFICATIONS: &str = "beacon_proof_remote_verifications_total";
pub const HEADER_FETCH_ATTEMPTS: &str = "beacon_proof_header_fetch_attempts_total";
pub const REMOTE_CALL_DURATION: &str = "beacon_proof_remote_call_duration_seconds";

/// Initialize telemetry (logs + metrics)
pub fn init_telemetry() {
    // 1. Initialize Tracing (Logs)
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "beacon_proof_node=info,tower_http=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 2. Initialize Metrics (Prometheus)
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            if PROM_HANDLE.set(handle).is_err() {
                tracing::warn!("Prometheus handle already set. Telemetry re-initialized?");
            }
        }
        Err(e) => tracing::warn!("Prometheus recorder not installed: {}", e),
    }

    metrics::describe_counter!(BUNDLES_GENERATED, "Proof bundles assembled");
    metrics::describe_counter!(LOCAL_VERIFICATIONS, "Local proof replays, labelled by result");
    metrics::describe_counter!(REMOTE_VERIFICATIONS, "Verifier contract calls, labelled by result");
    metrics::describe_counter!(HEADER_FETCH_ATTEMPTS, "Beacon header fetch attempts");
    metrics::describe_histogram!(REMOTE_CALL_DURATION, "Time taken by a verifier contract call");
}

/// Get the Prometheus handle to render metrics
pub fn get_metrics() -> String {
    if let Some(handle) = PROM_HANDLE.get() {
        handle.render()
    } else {
        "# metrics not initialized".to_string()
    }
}

/// Label value for a verification outcome.
pub fn outcome_label(valid: bool) -> &'static str {
    if valid { "valid" } else { "invalid" }
}
