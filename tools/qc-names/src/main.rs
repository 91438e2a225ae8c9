//! QC-Names: name registry query tool
//!
//! Loads a JSON registry snapshot into the in-memory adapters and runs one
//! name registry operation against it, printing the result as JSON.

mod snapshot;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use parking_lot::RwLock;
use qc_18_name_registry::{
    NameRegistryApi, NameRegistryConfig, NameRegistryError, NameRegistryErrorPayload,
    NameRegistryService, OptionsBag,
};
use serde::Serialize;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::snapshot::Snapshot;

/// QC-Names: query a name registry snapshot
#[derive(Parser, Debug)]
#[command(name = "qc-names")]
#[command(about = "Lookup, scan and export names from a registry snapshot")]
struct Args {
    /// Registry snapshot (JSON)
    #[arg(short, long)]
    snapshot: PathBuf,

    /// Options bag as a JSON object, e.g. '{"nameEncoding":"hex"}'
    #[arg(short, long, default_value = "{}")]
    options: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Current record of a name
    Show { name: String },
    /// Past records of a name followed by the current one
    History { name: String },
    /// Names in index order starting at `--start`
    Scan {
        #[arg(long)]
        start: Option<String>,
        #[arg(long, allow_negative_numbers = true)]
        count: Option<i64>,
    },
    /// Name operations in unconfirmed transactions
    Pending { name: Option<String> },
    /// Write names matching a regular expression to a JSON file
    Export { regexp: String, path: PathBuf },
    /// Flush and validate the name index
    CheckDb,
}

fn main() -> ExitCode {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("failed to install tracing subscriber: {}", e);
    }

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if let Some(err) = e.downcast_ref::<NameRegistryError>() {
                let payload = NameRegistryErrorPayload::from(err);
                match serde_json::to_string_pretty(&payload) {
                    Ok(json) => eprintln!("{}", json),
                    Err(_) => eprintln!("error {}: {}", payload.code, payload.message),
                }
            } else {
                error!("{:#}", e);
            }
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    let config = NameRegistryConfig::from_env();
    config.validate()?;

    let options: OptionsBag =
        serde_json::from_str(&args.options).context("--options must be a JSON object")?;

    let loaded = Snapshot::load(&args.snapshot)?.into_registry()?;
    info!(
        "Loaded {} names from {}",
        loaded.index.len(),
        args.snapshot.display()
    );

    let service = NameRegistryService::new(
        config,
        Arc::new(RwLock::new(loaded.index)),
        Arc::new(RwLock::new(loaded.pool)),
        Arc::new(loaded.chain),
        Arc::new(loaded.lookup),
    );

    match loaded.wallet {
        Some(wallet) => dispatch(
            &service.with_wallet(Arc::new(RwLock::new(wallet))),
            args.command,
            &options,
        ),
        None => dispatch(&service, args.command, &options),
    }
}

fn dispatch<A: NameRegistryApi>(api: &A, command: Command, options: &OptionsBag) -> Result<()> {
    match command {
        Command::Show { name } => print(&api.lookup(&name, options)?),
        Command::History { name } => print(&api.history(&name, options)?),
        Command::Scan { start, count } => print(&api.scan(start.as_deref(), count, options)?),
        Command::Pending { name } => print(&api.pending(name.as_deref(), options)?),
        Command::Export { regexp, path } => print(&api.export(&regexp, &path, options)?),
        Command::CheckDb => print(&api.check_index_consistency()?),
    }
}

fn print<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
