use crate::bio::prediction::read_predictions;
use crate::cli::output::*;
use crate::cli::visualize::{ascii_histogram, box_plot};
use crate::cli::FilterArgs;
use crate::core::bins::SimilarityBins;
use crate::core::config::Config;
use crate::core::filter::PredictionFilter;
use crate::core::stats::PredictionStats;
use clap::Args;
use std::path::PathBuf;

#[derive(Args)]
pub struct StatsArgs {
    /// Predictor data sheet
    #[arg(short, long, value_name = "FILE")]
    pub input: PathBuf,

    /// Output format (text, json)
    #[arg(long, default_value = "text")]
    pub format: String,

    /// Width of the histogram and box plot in characters
    #[arg(long, default_value = "40")]
    pub width: usize,

    #[command(flatten)]
    pub filter: FilterArgs,
}

pub fn run(args: StatsArgs, mut config: Config) -> anyhow::Result<()> {
    args.filter.apply(&mut config.filter);
    let filter = PredictionFilter::from_config(&config.filter)?;
    let bins = SimilarityBins::new(filter.similarity_threshold, config.filter.bin_width)?;

    let records = read_predictions(&args.input)?;
    let stats = PredictionStats::calculate(&records, &filter, &bins);

    match args.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&stats)?),
        "text" => print_text_stats(&stats, &bins, args.width.max(10)),
        other => anyhow::bail!("Unknown output format: {}", other),
    }

    Ok(())
}

fn print_text_stats(stats: &PredictionStats, bins: &SimilarityBins, width: usize) {
    section_header_with_line("LTR Retrotransposon Prediction Statistics");

    subsection_header("Predictions");
    tree_items(&[
        ("Total", format_number(stats.total_records)),
        ("Retained", format_number(stats.retained_records)),
        ("Unique IDs", format_number(stats.unique_ids)),
        ("With PBS", format_number(stats.with_pbs)),
        ("With protein domain", format_number(stats.with_domain)),
        ("Total mass", format_mbp(stats.total_mass_mbp)),
    ]);
    quality_notice(stats.quality_filtered);

    let Some(similarity) = stats.similarity else {
        println!();
        warning("No predictions passed the filter");
        return;
    };

    subsection_header("LTR Similarity (%)");
    tree_items(&[
        ("Min / Max", format!("{:.2} / {:.2}", similarity.min, similarity.max)),
        (
            "Q1 / Median / Q3",
            format!(
                "{:.2} / {:.2} / {:.2}",
                similarity.q1, similarity.median, similarity.q3
            ),
        ),
    ]);

    let breaks = bins.breaks();
    let (lo, hi) = (breaks[0], breaks[breaks.len() - 1]);
    println!();
    println!(
        "  {:<6}{}{:>6}",
        lo,
        box_plot(&similarity, lo, hi, width, true),
        hi
    );

    if let Some(w) = stats.width {
        subsection_header("Element Width (bp)");
        tree_items(&[
            (
                "Min / Max",
                format!(
                    "{} / {}",
                    format_number(w.min as usize),
                    format_number(w.max as usize)
                ),
            ),
            ("Median", format_number(w.median as usize)),
        ]);
    }

    subsection_header("Similarity Histogram");
    print!("{}", ascii_histogram(&stats.histogram, width, true));
}
