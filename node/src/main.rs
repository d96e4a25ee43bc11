// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use beacon_proof_node::app::Application;
use beacon_proof_node::config::NodeConfig;
use beacon_proof_node::errors::{NodeError, NodeResult};
use beacon_proof_node::server::build_router;
use beacon_proof_node::telemetry;

#[derive(Parser, Debug)]
#[command(author, version, about = "Beacon block header field proofs", long_about = None)]
struct Cli {
    /// JSON config file. Flags below override it.
    #[arg(long, env = "BEACON_PROOF_CONFIG")]
    config: Option<PathBuf>,

    /// Beacon API base URL
    #[arg(long, env = "BEACON_API_URL")]
    beacon_url: Option<String>,

    /// Execution node JSON-RPC URL
    #[arg(long, env = "EXECUTION_RPC_URL")]
    rpc_url: Option<String>,

    /// Verifier contract address
    #[arg(long, env = "VERIFIER_ADDRESS")]
    verifier: Option<String>,

    #[arg(long, env = "CHAIN_ID")]
    chain_id: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Prove and verify the configured fields of one header, then exit
    Run {
        /// Slot to prove. Defaults to the parent of the current head.
        #[arg(long, env = "BEACON_SLOT")]
        slot: Option<u64>,
    },
    /// Serve proofs over HTTP
    Serve {
        #[arg(long, env = "BIND_ADDR")]
        bind: Option<SocketAddr>,
    },
}

fn load_config(cli: &Cli) -> NodeResult<NodeConfig> {
    let mut cfg = match &cli.config {
        Some(path) => NodeConfig::from_file(path)?,
        None => NodeConfig::default(),
    };
    if let Some(url) = &cli.beacon_url {
        cfg.beacon_api.endpoints = vec![url.clone()];
    }
    if let Some(url) = &cli.rpc_url {
        cfg.ethereum_node.endpoint = url.clone();
    }
    if let Some(addr) = &cli.verifier {
        cfg.verification.verifier_address = addr.clone();
    }
    if let Some(id) = cli.chain_id {
        cfg.ethereum_node.chain_id = id;
    }
    match cli.command {
        Command::Run { slot: Some(slot) } => cfg.slot = Some(slot),
        Command::Serve { bind: Some(bind) } => cfg.bind_addr = bind,
        _ => {}
    }
    cfg.validate()?;
    Ok(cfg)
}

async fn run(cfg: NodeConfig) -> NodeResult<bool> {
    let app = Application::connect(cfg).await?;
    let summary = app.run().await?;
    if !summary.all_passed() {
        tracing::error!("{} of {} fields failed verification", summary.failed(), summary.outcomes.len());
    }
    Ok(summary.all_passed())
}

async fn serve(cfg: NodeConfig) -> NodeResult<bool> {
    let addr = cfg.bind_addr;
    let app = Arc::new(Application::new(cfg)?);
    let router = build_router(app);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| NodeError::Config(format!("binding {}: {}", addr, e)))?;
    tracing::info!("Listening on {}", addr);
    axum::serve(listener, router)
        .await
        .map_err(|e| NodeError::Network(e.to_string()))?;
    Ok(true)
}

#[tokio::main]
async fn main() -> ExitCode {
    telemetry::init_telemetry();
    let cli = Cli::parse();

    let cfg = match load_config(&cli) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    tracing::info!("Starting with config: {:?}", cfg);

    let result = match cli.command {
        Command::Run { .. } => run(cfg).await,
        Command::Serve { .. } => serve(cfg).await,
    };
    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
