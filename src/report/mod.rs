use crate::core::aggregator::{MetaSummary, SummaryRow};
use crate::LtrMetaError;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub mod bed;
pub mod export;

pub use bed::write_bed;
pub use export::write_predictions_csv;

const TABLE_DELIMITER: u8 = b';';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Bed,
    Csv,
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bed" => Ok(ExportFormat::Bed),
            "csv" => Ok(ExportFormat::Csv),
            _ => Err(format!("Unknown export format: {}", s)),
        }
    }
}

/// Files written for one meta-analysis run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TablePaths {
    pub similarity_matrix: PathBuf,
    pub genome_info: PathBuf,
}

impl TablePaths {
    pub fn new(directory: &Path, prefix: &str) -> Self {
        Self {
            similarity_matrix: directory.join(format!("{}_SimilarityMatrix.csv", prefix)),
            genome_info: directory.join(format!("{}_GenomeInfo.csv", prefix)),
        }
    }
}

/// Write the organism × similarity-bin count matrix
pub fn write_similarity_matrix<W: Write>(
    writer: W,
    summary: &MetaSummary,
) -> Result<(), LtrMetaError> {
    let mut csv = csv::WriterBuilder::new()
        .delimiter(TABLE_DELIMITER)
        .from_writer(writer);

    let mut header = vec!["organism".to_string()];
    header.extend(summary.bins.labels());
    csv.write_record(&header)?;

    for row in &summary.histogram {
        let mut record = vec![row.organism.clone()];
        record.extend(row.counts.iter().map(|c| c.to_string()));
        csv.write_record(&record)?;
    }

    csv.flush()?;
    Ok(())
}

/// Write one summary row per genome
pub fn write_genome_info<W: Write>(writer: W, rows: &[SummaryRow]) -> Result<(), LtrMetaError> {
    let mut csv = csv::WriterBuilder::new()
        .delimiter(TABLE_DELIMITER)
        .has_headers(true)
        .from_writer(writer);

    for row in rows {
        csv.serialize(row)?;
    }
    if rows.is_empty() {
        csv.write_record([
            "organism",
            "prediction_count",
            "total_mass_mbp",
            "proportion",
            "normalized_count",
            "genome_size_mbp",
            "genome_quality",
        ])?;
    }

    csv.flush()?;
    Ok(())
}

/// Write both meta-analysis tables into `directory`
pub fn write_meta_tables(
    summary: &MetaSummary,
    directory: &Path,
    prefix: &str,
) -> Result<TablePaths, LtrMetaError> {
    fs::create_dir_all(directory)?;
    let paths = TablePaths::new(directory, prefix);

    let mut writer = BufWriter::new(File::create(&paths.similarity_matrix)?);
    write_similarity_matrix(&mut writer, summary)?;
    writer.flush()?;

    let mut writer = BufWriter::new(File::create(&paths.genome_info)?);
    write_genome_info(&mut writer, &summary.summary)?;
    writer.flush()?;

    Ok(paths)
}
