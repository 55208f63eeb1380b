pub mod commands;
pub mod output;
pub mod visualize;

use crate::core::config::{self, Config, FilterConfig};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "ltrmeta",
    version,
    about = "Meta-analysis of LTR retrotransposon predictions across genomes",
    long_about = "ltrmeta collects per-genome LTR retrotransposon predictions, applies a common \
                  quality filter, bins elements by LTR similarity and summarises retrotransposon \
                  load relative to genome size. It can also drive the predictor over a directory \
                  of genomes and export single prediction tables as BED or CSV."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Configuration file (TOML)
    #[arg(short, long, global = true, env = "LTRMETA_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Aggregate existing prediction results across genomes
    Summarize(commands::summarize::SummarizeArgs),

    /// Run the predictor on every genome, then aggregate
    Predict(commands::predict::PredictArgs),

    /// Filter a prediction table and export it as BED or CSV
    Export(commands::export::ExportArgs),

    /// Show statistics and plots for a prediction table
    Stats(commands::stats::StatsArgs),

    /// Create or inspect configuration files
    Config(commands::config::ConfigArgs),
}

/// Filter options shared by every command that reads predictions
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Minimum LTR similarity in percent (inclusive)
    #[arg(long, value_name = "PERCENT")]
    pub threshold: Option<f64>,

    /// Width of the similarity bins in percent
    #[arg(long, value_name = "PERCENT")]
    pub bin_width: Option<f64>,

    /// Only apply the similarity threshold
    #[arg(long)]
    pub no_quality_filter: bool,

    /// Minimum number of open reading frames
    #[arg(long, value_name = "N")]
    pub min_orfs: Option<u32>,
}

impl FilterArgs {
    /// Override configured filter values with the ones given on the command line
    pub fn apply(&self, filter: &mut FilterConfig) {
        if let Some(threshold) = self.threshold {
            filter.similarity_threshold = threshold;
        }
        if let Some(width) = self.bin_width {
            filter.bin_width = width;
        }
        if self.no_quality_filter {
            filter.quality_filter = false;
        }
        if let Some(min_orfs) = self.min_orfs {
            filter.min_orfs = min_orfs;
        }
    }
}

/// Output location shared by the aggregating commands
#[derive(Args, Debug, Clone, Default)]
pub struct OutputArgs {
    /// Directory for the result tables
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// File name prefix for the result tables (defaults to the results folder name)
    #[arg(short, long)]
    pub prefix: Option<String>,
}

/// Defaults, then the config file if one was given
pub fn load_effective_config(path: Option<&Path>) -> crate::Result<Config> {
    match path {
        Some(path) => {
            tracing::debug!("Loading configuration from {}", path.display());
            config::load_config(path)
        }
        None => Ok(config::default_config()),
    }
}
