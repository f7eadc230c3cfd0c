use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "farmops",
    version,
    about = "Farm condition evaluation and carbon credit ledger"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to config.yaml
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Evaluate telemetry and summarize the carbon ledger as JSON
    Report {
        /// JSON array of telemetry samples
        #[arg(short, long)]
        telemetry: PathBuf,

        /// JSON array of carbon activities
        #[arg(short, long)]
        activities: Option<PathBuf>,

        /// Crop profile id (defaults to farm.crop_id)
        #[arg(long)]
        crop: Option<String>,

        /// Farm id (defaults to farm.farm_id)
        #[arg(long)]
        farm: Option<String>,

        /// Reference date for the evaluation window and carbon pace (YYYY-MM-DD)
        #[arg(long)]
        as_of: Option<NaiveDate>,
    },
    /// Validate config and crop catalog
    Check,
    /// List known crop profiles
    Crops,
}
