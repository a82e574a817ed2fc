//! # stkpay CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use stkpay_cli::flows::{run_flows, FlowsArgs};
use stkpay_cli::normalize::{run_normalize, NormalizeArgs};
use stkpay_cli::pay::{run_pay, PayArgs};

/// STK push payment tooling.
///
/// Normalizes subscriber numbers, lists checkout flows, and runs tracked
/// charges against a mobile-money gateway.
#[derive(Parser, Debug)]
#[command(name = "stkpay", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the canonical MSISDN for a phone number.
    Normalize(NormalizeArgs),

    /// List the checkout flow catalog.
    Flows(FlowsArgs),

    /// Initiate a charge and track it to completion.
    Pay(PayArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Normalize(args) => run_normalize(&args),
        Commands::Flows(args) => run_flows(&args),
        Commands::Pay(args) => run_pay(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
