use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::fs;
use serde::Serialize;
use anyhow::{Context, Result};

use beacon_proof_kernel::conformance::{self, ConformanceVector};
use beacon_proof_kernel::{Chunk, ProofBundle};

/// Offline replay of header field proofs. Needs no network: the trusted
/// root, if any, is passed on the command line.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay a proof bundle (JSON) against a root
    Bundle {
        /// Path to the bundle file
        path: PathBuf,

        /// Trusted root to check against. Defaults to the bundle's own root,
        /// which only proves internal consistency.
        #[arg(long)]
        root: Option<String>,
    },
    /// Print the conformance vectors as JSON
    Vectors {
        /// Write to a file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Check a conformance vector file produced by this or another implementation
    CheckVectors {
        path: PathBuf,
    },
}

#[derive(Serialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
struct BundleReport {
    field: Option<String>,
    field_index: u8,
    root: Chunk,
    trusted_root_supplied: bool,
    valid: bool,
}

#[derive(Serialize, Debug, Default, PartialEq, Eq)]
struct VectorReport {
    total: usize,
    failed: Vec<VectorFailure>,
}

#[derive(Serialize, Debug, PartialEq, Eq)]
struct VectorFailure {
    name: String,
    reason: String,
}

fn load_bundle(path: &Path) -> Result<ProofBundle> {
    let bytes = fs::read(path).context("Failed to read bundle file")?;
    serde_json::from_slice(&bytes).context("Failed to parse proof bundle JSON")
}

fn check_bundle(bundle: &ProofBundle, root: Option<&str>) -> Result<BundleReport> {
    let trusted = match root {
        Some(hex) => Chunk::from_hex(hex)
            .map_err(|e| anyhow::anyhow!("Invalid --root: {}", e))?,
        None => bundle.beacon_block_root,
    };

    let valid = bundle
        .verify_against(&trusted)
        .context("Bundle rejected")?;

    Ok(BundleReport {
        field: bundle.field().map(|f| f.name().to_string()),
        field_index: bundle.field_index,
        root: trusted,
        trusted_root_supplied: root.is_some(),
        valid,
    })
}

fn check_vectors(vectors: &[ConformanceVector]) -> VectorReport {
    let failed = vectors
        .iter()
        .filter_map(|v| {
            conformance::check(v).err().map(|m| VectorFailure {
                name: v.name.clone(),
                reason: m.to_string(),
            })
        })
        .collect();

    VectorReport {
        total: vectors.len(),
        failed,
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    match args.command {
        Command::Bundle { path, root } => {
            let bundle = load_bundle(&path)?;
            let report = check_bundle(&bundle, root.as_deref())?;
            println!("{}", serde_json::to_string_pretty(&report)?);
            if !report.valid {
                anyhow::bail!("Proof does not reproduce root {}", report.root);
            }
        }
        Command::Vectors { out } => {
            let json = serde_json::to_string_pretty(&conformance::generate())?;
            match out {
                Some(path) => {
                    fs::write(&path, json).context("Failed to write vectors")?;
                    eprintln!("Wrote conformance vectors to {:?}", path);
                }
                None => println!("{}", json),
            }
        }
        Command::CheckVectors { path } => {
            let bytes = fs::read(&path).context("Failed to read vector file")?;
            let vectors: Vec<ConformanceVector> = serde_json::from_slice(&bytes)
                .context("Failed to parse conformance vectors")?;
            let report = check_vectors(&vectors);
            println!("{}", serde_json::to_string_pretty(&report)?);
            if !report.failed.is_empty() {
                anyhow::bail!("{} of {} vectors failed", report.failed.len(), report.total);
            }
        }
    }

    Ok(())
}
