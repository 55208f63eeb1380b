use crate::cli::output::action;
use crate::cli::{FilterArgs, OutputArgs};
use crate::core::aggregator::{InputSource, MetaAggregator};
use crate::core::config::Config;
use crate::report::write_meta_tables;
use crate::tools::{CommandPredictor, Predictor};
use anyhow::Context;
use clap::Args;
use std::path::PathBuf;

#[derive(Args)]
pub struct PredictArgs {
    /// Directory of genome FASTA files
    #[arg(short, long, value_name = "DIR")]
    pub genomes: PathBuf,

    /// Directory the per-genome result folders are moved into
    #[arg(short, long, value_name = "DIR")]
    pub results: PathBuf,

    /// Predictor executable (name in PATH or path)
    #[arg(long, value_name = "BIN")]
    pub program: Option<String>,

    /// Predictor argument template entry; repeat to build the full list
    #[arg(long = "arg", value_name = "ARG", allow_hyphen_values = true)]
    pub args: Vec<String>,

    /// tRNA reference passed as {trna}
    #[arg(long, value_name = "FILE")]
    pub trna: Option<PathBuf>,

    /// Protein domain HMM library passed as {hmm}
    #[arg(long, value_name = "FILE")]
    pub hmm: Option<PathBuf>,

    /// Replace result folders that already exist
    #[arg(long)]
    pub overwrite: bool,

    #[command(flatten)]
    pub output: OutputArgs,

    #[command(flatten)]
    pub filter: FilterArgs,
}

pub fn run(args: PredictArgs, mut config: Config) -> anyhow::Result<()> {
    args.filter.apply(&mut config.filter);
    if let Some(program) = args.program {
        config.predictor.program = program;
    }
    if !args.args.is_empty() {
        config.predictor.args = args.args;
    }
    if args.trna.is_some() {
        config.predictor.trna = args.trna;
    }
    if args.hmm.is_some() {
        config.predictor.hmm = args.hmm;
    }

    let aggregator = MetaAggregator::from_config(&args.genomes, &config)?.with_progress(true);
    let mut predictor = CommandPredictor::new(&config.predictor, &config.naming)?;

    let source = InputSource::LiveRun {
        predictor: &mut predictor,
        results_dir: args.results.clone(),
        overwrite: args.overwrite,
    };
    let prefix = args
        .output
        .prefix
        .or_else(|| config.output.prefix.clone())
        .unwrap_or_else(|| source.default_prefix());
    let directory = args.output.output.unwrap_or_else(|| config.output.directory.clone());

    action(&format!(
        "Running {} on genomes in {} (results in {})",
        config.predictor.program,
        args.genomes.display(),
        args.results.display()
    ));

    let summary = aggregator.run(source)?;
    let paths = write_meta_tables(&summary, &directory, &prefix)
        .with_context(|| format!("Failed to write result tables to {}", directory.display()))?;

    tracing::info!(
        "{} finished on {} genomes",
        predictor.name(),
        summary.summary.len()
    );
    super::print_meta_summary(&summary, &paths);
    Ok(())
}
