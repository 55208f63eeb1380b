use crate::cli::output::action;
use crate::cli::{FilterArgs, OutputArgs};
use crate::core::aggregator::{InputSource, MetaAggregator};
use crate::core::config::Config;
use crate::report::write_meta_tables;
use anyhow::Context;
use clap::Args;
use std::path::PathBuf;

#[derive(Args)]
pub struct SummarizeArgs {
    /// Directory of genome FASTA files
    #[arg(short, long, value_name = "DIR")]
    pub genomes: PathBuf,

    /// Directory of predictor result folders (<genome>_ltrpred)
    #[arg(
        short,
        long,
        value_name = "DIR",
        required_unless_present = "manifest",
        conflicts_with = "manifest"
    )]
    pub results: Option<PathBuf>,

    /// TOML manifest mapping genomes to result folders
    #[arg(short, long, value_name = "FILE")]
    pub manifest: Option<PathBuf>,

    #[command(flatten)]
    pub output: OutputArgs,

    #[command(flatten)]
    pub filter: FilterArgs,
}

pub fn run(args: SummarizeArgs, mut config: Config) -> anyhow::Result<()> {
    args.filter.apply(&mut config.filter);

    let aggregator = MetaAggregator::from_config(&args.genomes, &config)?.with_progress(true);

    let source = match (args.results, args.manifest) {
        (Some(results_dir), _) => InputSource::Precomputed { results_dir },
        (None, Some(path)) => InputSource::Manifest { path },
        (None, None) => anyhow::bail!("Either --results or --manifest is required"),
    };

    let prefix = args
        .output
        .prefix
        .or_else(|| config.output.prefix.clone())
        .unwrap_or_else(|| source.default_prefix());
    let directory = args.output.output.unwrap_or_else(|| config.output.directory.clone());

    action(&format!(
        "Summarizing genomes in {} ({} similarity bins from {}%)",
        args.genomes.display(),
        aggregator.bins().len(),
        config.filter.similarity_threshold
    ));

    let summary = aggregator.run(source)?;
    let paths = write_meta_tables(&summary, &directory, &prefix)
        .with_context(|| format!("Failed to write result tables to {}", directory.display()))?;

    super::print_meta_summary(&summary, &paths);
    Ok(())
}
