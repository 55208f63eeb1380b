use crate::bio::prediction::read_predictions;
use crate::cli::output::{quality_notice, success};
use crate::cli::FilterArgs;
use crate::core::config::Config;
use crate::core::filter::PredictionFilter;
use crate::report::{write_bed, write_predictions_csv, ExportFormat};
use anyhow::Context;
use clap::Args;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

#[derive(Args)]
pub struct ExportArgs {
    /// Predictor data sheet to export
    #[arg(short, long, value_name = "FILE")]
    pub input: PathBuf,

    /// Output file
    #[arg(short, long, value_name = "FILE")]
    pub output: PathBuf,

    /// Output format (bed, csv)
    #[arg(short, long, default_value = "bed")]
    pub format: ExportFormat,

    #[command(flatten)]
    pub filter: FilterArgs,
}

pub fn run(args: ExportArgs, mut config: Config) -> anyhow::Result<()> {
    args.filter.apply(&mut config.filter);
    let filter = PredictionFilter::from_config(&config.filter)?;

    let records = read_predictions(&args.input)?;
    let retained = filter.apply(&records);
    quality_notice(filter.is_quality_filtered());

    let file = File::create(&args.output)
        .with_context(|| format!("Failed to create {}", args.output.display()))?;
    let mut writer = BufWriter::new(file);

    let written = match args.format {
        ExportFormat::Bed => write_bed(&mut writer, &retained)?,
        ExportFormat::Csv => {
            write_predictions_csv(&mut writer, &retained)?;
            retained.len()
        }
    };
    writer.flush()?;

    success(&format!(
        "Exported {} of {} predictions to {}",
        written,
        records.len(),
        args.output.display()
    ));
    Ok(())
}
