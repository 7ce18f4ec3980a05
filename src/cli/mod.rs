//! Command-line parsing for the landed-cost estimator.
//!
//! Argument parsing stays separate from inference and reporting. Flags with an
//! `env` fallback can also be set in a local `.env` file.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{EstimateConfig, EvidenceLevel, ShippingMode};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "lc", version, about = "Landed-cost estimator for imported products")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Estimate landed cost for one request and print the full breakdown.
    Estimate(EstimateArgs),
    /// Estimate several requests in parallel, one summary line each.
    Batch(BatchArgs),
    /// Print the category prior table.
    Categories,
}

/// Options shared by `estimate` and `batch`.
#[derive(Debug, Args, Clone)]
pub struct CostArgs {
    /// Fixed customs entry/brokerage fee per shipment.
    #[arg(long, env = "LC_ENTRY_FEE", default_value_t = 35.0)]
    pub entry_fee: f64,

    /// Retail (shelf) price used when a request has none.
    #[arg(long, env = "LC_RETAIL_PRICE")]
    pub retail_price: Option<f64>,

    /// Force a shipping mode for every request.
    #[arg(long, value_enum)]
    pub mode: Option<ShippingMode>,

    /// Force an evidence level for every request.
    #[arg(long, value_enum)]
    pub evidence: Option<EvidenceLevel>,
}

#[derive(Debug, Args, Clone)]
pub struct EstimateArgs {
    /// Request JSON file.
    #[arg(value_name = "REQUEST.json")]
    pub request: PathBuf,

    #[command(flatten)]
    pub cost: CostArgs,

    /// Also print every resolved input with its explanation.
    #[arg(long, short = 'v')]
    pub explain: bool,

    /// Export the full report as JSON.
    #[arg(long, value_name = "OUT.json")]
    pub export: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct BatchArgs {
    /// Request JSON files.
    #[arg(value_name = "REQUEST.json", required = true)]
    pub requests: Vec<PathBuf>,

    #[command(flatten)]
    pub cost: CostArgs,
}

impl CostArgs {
    pub fn to_config(&self, export_report: Option<PathBuf>) -> EstimateConfig {
        EstimateConfig {
            entry_fee_per_shipment: self.entry_fee,
            retail_price: self.retail_price,
            shipping_mode: self.mode,
            evidence_level: self.evidence,
            export_report,
        }
    }
}
