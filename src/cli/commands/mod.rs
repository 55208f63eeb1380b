pub mod config;
pub mod export;
pub mod predict;
pub mod stats;
pub mod summarize;

use crate::cli::output::*;
use crate::core::aggregator::MetaSummary;
use crate::report::TablePaths;
use comfy_table::Cell;

/// Print the per-genome summary after an aggregation run
pub(crate) fn print_meta_summary(summary: &MetaSummary, paths: &TablePaths) {
    section_header_with_line("LTR Retrotransposon Meta-Analysis");

    quality_notice(summary.quality_filtered);

    let mut table = create_standard_table();
    table.set_header(vec![
        header_cell("Organism"),
        header_cell("LTR-RTs"),
        header_cell("Mass (Mbp)"),
        header_cell("Genome (Mbp)"),
        header_cell("Genome share"),
        header_cell("Per Mbp"),
        header_cell("Unknown bases"),
    ]);
    for row in &summary.summary {
        table.add_row(vec![
            Cell::new(&row.organism),
            number_cell(format_number(row.prediction_count)),
            number_cell(format!("{:.3}", row.total_mass_mbp)),
            number_cell(format!("{:.3}", row.genome_size_mbp)),
            number_cell(format_percent(row.proportion)),
            number_cell(format!("{:.3}", row.normalized_count)),
            number_cell(format_percent(row.genome_quality)),
        ]);
    }
    println!("{}", table);

    if !summary.skipped.is_empty() {
        subsection_header("Skipped genomes");
        for (i, skipped) in summary.skipped.iter().enumerate() {
            tree_item(
                i == summary.skipped.len() - 1,
                &skipped.organism,
                Some(&skipped.reason),
            );
        }
    }

    println!();
    success(&format!("Similarity matrix: {}", paths.similarity_matrix.display()));
    success(&format!("Genome info:       {}", paths.genome_info.display()));
}
