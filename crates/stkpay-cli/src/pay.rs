//! # Pay Subcommand
//!
//! Initiates an STK push against the configured gateway and tracks it to a
//! terminal outcome. Progress goes to stderr; the final outcome and the
//! flow's screen action go to stdout as JSON. Ctrl-C cancels tracking.
//!
//! Gateway settings come from the environment (`STKPAY_GATEWAY_URL`,
//! `STKPAY_API_TOKEN`, ...); polling settings from the environment and
//! then the flags below.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use serde_json::json;
use stkpay_client::{
    CancelToken, GatewayConfig, HttpGateway, PaymentTracker, TrackReport, TrackerOptions,
};
use stkpay_core::{CheckoutFlow, Outcome};

use crate::flows::load_catalog;

/// Exit code when the charge failed or was declined.
pub const EXIT_FAILED: u8 = 1;
/// Exit code when the charge never reached a terminal status.
pub const EXIT_TIMEOUT: u8 = 3;
/// Exit code when the charge could not be started.
pub const EXIT_INITIATION_ERROR: u8 = 4;
/// Exit code when tracking was interrupted.
pub const EXIT_CANCELLED: u8 = 130;

/// Arguments for the pay subcommand.
#[derive(Args, Debug)]
pub struct PayArgs {
    /// Phone number to charge.
    pub phone: String,

    /// Checkout flow that selects the initiate endpoint and success redirect.
    #[arg(long, default_value = "member-subscription")]
    pub flow: String,

    /// YAML catalog to resolve `--flow` against instead of the built-in flows.
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Override the flow's initiate path.
    #[arg(long)]
    pub initiate_path: Option<String>,

    /// Delay between status queries, in milliseconds.
    #[arg(long)]
    pub poll_interval_ms: Option<u64>,

    /// Maximum number of status queries.
    #[arg(long)]
    pub max_attempts: Option<u32>,

    /// Wall-clock limit on polling, in seconds.
    #[arg(long)]
    pub deadline_secs: Option<u64>,
}

impl PayArgs {
    /// Polling options: environment first, then flags.
    fn tracker_options(&self) -> Result<TrackerOptions> {
        let mut options = TrackerOptions::from_env().context("invalid tracker settings")?;
        if let Some(ms) = self.poll_interval_ms {
            options = options.with_poll_interval(Duration::from_millis(ms));
        }
        if let Some(n) = self.max_attempts {
            options = options.with_max_attempts(n);
        }
        if let Some(secs) = self.deadline_secs {
            options = options.with_deadline(Duration::from_secs(secs));
        }
        Ok(options)
    }
}

/// Process exit code for a tracking outcome.
pub fn exit_code(outcome: &Outcome) -> u8 {
    match outcome {
        Outcome::Success => 0,
        Outcome::Failed { .. } => EXIT_FAILED,
        Outcome::Timeout => EXIT_TIMEOUT,
        Outcome::InitiationError { .. } => EXIT_INITIATION_ERROR,
        Outcome::CancelledByCaller => EXIT_CANCELLED,
    }
}

/// JSON document printed on stdout once tracking ends.
pub fn summary(report: &TrackReport, flow: &CheckoutFlow) -> serde_json::Value {
    json!({
        "flow": flow.name,
        "paymentId": report.payment_id,
        "attempts": report.attempts,
        "outcome": report.outcome,
        "action": flow.resolve(&report.outcome),
    })
}

/// Execute the pay subcommand.
pub fn run_pay(args: &PayArgs) -> Result<u8> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    runtime.block_on(pay(args))
}

async fn pay(args: &PayArgs) -> Result<u8> {
    let catalog = load_catalog(args.catalog.as_deref())?;
    let flow = catalog.get(&args.flow)?.clone();

    let mut config = GatewayConfig::from_env().context("invalid gateway settings")?;
    config = config.with_initiate_path(
        args.initiate_path
            .clone()
            .unwrap_or_else(|| flow.initiate_path.clone()),
    );
    tracing::info!(flow = %flow.name, config = ?config, "charging");

    let gateway = HttpGateway::new(config).context("failed to build gateway client")?;
    let tracker = PaymentTracker::new(gateway).with_options(args.tracker_options()?);

    let cancel = CancelToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("interrupted, stopping payment tracking");
            on_interrupt.cancel();
        }
    });

    let report = tracker
        .initiate_and_track_with(
            &args.phone,
            |progress| eprintln!("attempt {}: {}", progress.attempt, progress.status),
            &cancel,
        )
        .await;

    let doc = summary(&report, &flow);
    println!("{}", serde_json::to_string_pretty(&doc)?);
    if !report.outcome.is_success() {
        eprintln!("{}", report.outcome.user_message());
    }
    Ok(exit_code(&report.outcome))
}
