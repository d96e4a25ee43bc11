// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use beacon_proof_kernel::{HeaderField, ProofBundle};

use crate::api::*;
use crate::app::Application;
use crate::errors::NodeResult;
use crate::telemetry;

pub type SharedApp = Arc<Application>;

pub fn build_router(state: SharedApp) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics_handler))
        .route("/v1/proof/:slot/:field", get(get_proof))
        .route("/v1/verify", post(verify))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok".to_string() })
}

async fn metrics_handler() -> String {
    telemetry::get_metrics()
}

async fn get_proof(
    State(app): State<SharedApp>,
    Path((slot, field)): Path<(u64, String)>,
) -> NodeResult<Json<ProofBundle>> {
    let field: HeaderField = field.parse()?;
    tracing::info!("Proof requested for {} at slot {}", field, slot);
    let bundle = app.bundle_for(slot, field).await?;
    Ok(Json(bundle))
}

async fn verify(Json(req): Json<VerifyRequest>) -> NodeResult<Json<VerifyResponse>> {
    let root = req.trusted_root.unwrap_or(req.bundle.beacon_block_root);
    let valid = req.bundle.verify_against(&root)?;
    metrics::increment_counter!(
        telemetry::LOCAL_VERIFICATIONS,
        "result" => telemetry::outcome_label(valid)
    );
    Ok(Json(VerifyResponse { valid }))
}
