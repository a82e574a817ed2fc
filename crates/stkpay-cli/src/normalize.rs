//! # Normalize Subcommand
//!
//! Prints the canonical MSISDN for a phone number, or exits with code 2
//! when the number does not validate.

use anyhow::Result;
use clap::Args;
use stkpay_core::Msisdn;

/// Exit code for a number that fails validation.
pub const EXIT_INVALID: u8 = 2;

/// Arguments for the normalize subcommand.
#[derive(Args, Debug)]
pub struct NormalizeArgs {
    /// Phone number as the user typed it (spaces and a leading 0 allowed).
    pub phone: String,
}

/// Execute the normalize subcommand.
pub fn run_normalize(args: &NormalizeArgs) -> Result<u8> {
    match Msisdn::parse(&args.phone) {
        Ok(msisdn) => {
            println!("{msisdn}");
            Ok(0)
        }
        Err(e) => {
            eprintln!("error: {e}");
            Ok(EXIT_INVALID)
        }
    }
}
