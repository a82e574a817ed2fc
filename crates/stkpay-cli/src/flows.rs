//! # Flows Subcommand
//!
//! Lists the checkout flow catalog: the built-in call sites, or a YAML
//! catalog supplied with `--catalog`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use stkpay_core::FlowCatalog;

/// Arguments for the flows subcommand.
#[derive(Args, Debug)]
pub struct FlowsArgs {
    /// YAML catalog to load instead of the built-in flows.
    #[arg(long)]
    pub catalog: Option<PathBuf>,
}

/// Load a catalog file, or the built-in catalog when no path is given.
pub fn load_catalog(path: Option<&Path>) -> Result<FlowCatalog> {
    match path {
        None => Ok(FlowCatalog::builtin()),
        Some(path) => {
            let yaml = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read catalog {}", path.display()))?;
            FlowCatalog::from_yaml_str(&yaml)
                .with_context(|| format!("invalid catalog {}", path.display()))
        }
    }
}

/// Execute the flows subcommand.
pub fn run_flows(args: &FlowsArgs) -> Result<u8> {
    let catalog = load_catalog(args.catalog.as_deref())?;
    tracing::debug!(count = catalog.len(), "loaded flow catalog");

    if catalog.is_empty() {
        println!("No flows defined.");
        return Ok(0);
    }
    for flow in catalog.iter() {
        let clear = if flow.clear_session_on_success {
            " (clears session)"
        } else {
            ""
        };
        println!(
            "{:<24} {:<48} -> {}{clear}",
            flow.name, flow.initiate_path, flow.success_redirect
        );
    }
    Ok(0)
}
