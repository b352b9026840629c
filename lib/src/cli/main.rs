// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Command line utility for preparing Cardano transactions for hardware wallets

use clap::Parser;
use log::{debug, info, LevelFilter};
use serde::Serialize;

use ledger_ada::{
    device::SigningRequest,
    tx::{plan::TxPlan, DerivationPath, UnsignedTransactionBody},
    SessionConfig,
};

mod helpers;
use helpers::*;

/// Cardano ledger command line utility
#[derive(Clone, PartialEq, Debug, Parser)]
struct Options {
    /// Session configuration file (JSON)
    #[clap(long)]
    config: Option<String>,

    /// Subcommand to execute
    #[clap(subcommand)]
    cmd: Actions,

    /// Enable verbose logging
    #[clap(long, default_value = "info")]
    log_level: LevelFilter,
}

#[derive(Clone, PartialEq, Debug, Parser)]
#[non_exhaustive]
enum Actions {
    /// Parse and describe a derivation path
    Path {
        /// Derivation path (eg. `m/1852'/1815'/0'/0/0`)
        path: DerivationPath,
    },

    /// Build the unsigned body for a transaction plan and print its id
    TxId {
        /// Transaction plan file (JSON)
        #[clap(long)]
        plan: String,

        /// Output file (JSON), stdout if unset
        #[clap(long)]
        output: Option<String>,
    },

    /// Print the device signing request for a transaction plan
    DeviceRequest {
        /// Transaction plan file (JSON)
        #[clap(long)]
        plan: String,

        /// Output file (JSON), stdout if unset
        #[clap(long)]
        output: Option<String>,
    },
}

/// Unsigned body summary
#[derive(Clone, PartialEq, Debug, Serialize)]
struct BodyInfo {
    id: String,
    body_hex: String,
    signing_paths: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let args = Options::parse();

    // Setup logging
    simplelog::SimpleLogger::init(args.log_level, simplelog::Config::default())?;

    // Load session configuration
    let config = match &args.config {
        Some(c) => read_input::<SessionConfig>(c).await?,
        None => SessionConfig::default(),
    };

    debug!("Using config: {:?}", config);

    execute(&config, args.cmd).await
}

/// Execute a command with the provided configuration
async fn execute(config: &SessionConfig, cmd: Actions) -> anyhow::Result<()> {
    debug!("Executing command: {:?}", cmd);

    match cmd {
        Actions::Path { path } => {
            info!("path: {}", path);
            info!("hardness: {:?}", path.hardness());
            info!("device path: {}", path.to_device_string());
            info!("device indices: {:?}", path.to_device_path());

            if let Ok(s) = path.staking_path() {
                info!("staking path: {}", s);
            }
        }
        Actions::TxId { plan, output } => {
            let body = load_body(config, &plan).await?;

            info!("transaction id: {}", body.id());

            let i = BodyInfo {
                id: body.id().to_hex(),
                body_hex: hex::encode(body.encoded()),
                signing_paths: body.signing_paths().iter().map(|p| p.to_string()).collect(),
            };

            write_output(output.as_deref(), &i).await?;
        }
        Actions::DeviceRequest { plan, output } => {
            let body = load_body(config, &plan).await?;

            let req = SigningRequest::new(config.network(), &body);

            info!("device request for transaction: {}", body.id());

            write_output(output.as_deref(), &req).await?;
        }
    }

    Ok(())
}

async fn load_body(config: &SessionConfig, plan: &str) -> anyhow::Result<UnsignedTransactionBody> {
    let plan: TxPlan = read_input(plan).await?;

    let body = UnsignedTransactionBody::from_plan(&plan, config.staking_path.as_ref())?;

    Ok(body)
}
