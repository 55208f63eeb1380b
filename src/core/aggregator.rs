//! Meta-analysis across genomes
//!
//! For every genome the aggregator loads the predictor data sheet, filters
//! it, counts retained elements per similarity bin and relates the retained
//! mass to the genome size. Rows are kept in processing order.

use crate::bio::fasta::{scan_genome, GenomeDescriptor};
use crate::bio::prediction::{read_predictions, PredictionRecord};
use crate::core::bins::SimilarityBins;
use crate::core::config::{Config, NamingConfig};
use crate::core::filter::PredictionFilter;
use crate::core::matching::{self, GenomeEntry, Manifest, MatchedGenome};
use crate::tools::traits::{PredictionJob, Predictor};
use crate::LtrMetaError;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Where per-genome predictions come from
pub enum InputSource<'a> {
    /// Result folders named `<genome basename><suffix>` inside `results_dir`
    Precomputed { results_dir: PathBuf },
    /// Explicit genome → result folder mapping
    Manifest { path: PathBuf },
    /// Run the predictor per genome and move its output into `results_dir`
    LiveRun {
        predictor: &'a mut dyn Predictor,
        results_dir: PathBuf,
        overwrite: bool,
    },
}

impl InputSource<'_> {
    /// Name used for output files when no prefix is given
    pub fn default_prefix(&self) -> String {
        let path = match self {
            InputSource::Precomputed { results_dir } => results_dir.as_path(),
            InputSource::LiveRun { results_dir, .. } => results_dir.as_path(),
            InputSource::Manifest { path } => {
                return path
                    .file_stem()
                    .map(|s| s.to_string_lossy().to_string())
                    .unwrap_or_else(|| "ltrmeta".to_string());
            }
        };
        let absolute = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        absolute
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "ltrmeta".to_string())
    }
}

/// Retained elements per similarity bin for one genome
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramRow {
    pub organism: String,
    pub counts: Vec<u64>,
}

impl HistogramRow {
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }
}

/// Genome-level summary of retained predictions
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    pub organism: String,
    pub prediction_count: usize,
    pub total_mass_mbp: f64,
    pub proportion: f64,
    pub normalized_count: f64,
    pub genome_size_mbp: f64,
    pub genome_quality: f64,
}

impl SummaryRow {
    pub fn from_predictions(
        organism: &str,
        retained: &[&PredictionRecord],
        genome: &GenomeDescriptor,
    ) -> Self {
        let prediction_count = retained
            .iter()
            .map(|r| r.id.as_str())
            .collect::<HashSet<_>>()
            .len();
        let total_mass_mbp =
            retained.iter().filter_map(|r| r.width).sum::<u64>() as f64 / 1_000_000.0;
        let genome_size_mbp = genome.size_mbp();

        Self {
            organism: organism.to_string(),
            prediction_count,
            total_mass_mbp,
            proportion: total_mass_mbp / genome_size_mbp,
            normalized_count: prediction_count as f64 / genome_size_mbp,
            genome_size_mbp,
            genome_quality: genome.unknown_fraction(),
        }
    }
}

/// Genome left out of the tables and why
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedGenome {
    pub organism: String,
    pub reason: String,
}

/// Result of a meta-analysis run
#[derive(Debug, Clone, Serialize)]
pub struct MetaSummary {
    pub bins: SimilarityBins,
    pub histogram: Vec<HistogramRow>,
    pub summary: Vec<SummaryRow>,
    pub skipped: Vec<SkippedGenome>,
    pub quality_filtered: bool,
}

pub struct MetaAggregator {
    genome_dir: PathBuf,
    filter: PredictionFilter,
    bins: SimilarityBins,
    naming: NamingConfig,
    show_progress: bool,
}

impl MetaAggregator {
    /// Validate the genome directory and binning before any work is done
    pub fn new(
        genome_dir: impl Into<PathBuf>,
        filter: PredictionFilter,
        bin_width: f64,
        naming: NamingConfig,
    ) -> Result<Self, LtrMetaError> {
        let genome_dir = genome_dir.into();
        if !genome_dir.is_dir() {
            return Err(LtrMetaError::Config(format!(
                "Genome directory {} does not exist",
                genome_dir.display()
            )));
        }
        let bins = SimilarityBins::new(filter.similarity_threshold, bin_width)?;

        Ok(Self {
            genome_dir,
            filter,
            bins,
            naming,
            show_progress: false,
        })
    }

    pub fn from_config(
        genome_dir: impl Into<PathBuf>,
        config: &Config,
    ) -> Result<Self, LtrMetaError> {
        let filter = PredictionFilter::from_config(&config.filter)?;
        Self::new(
            genome_dir,
            filter,
            config.filter.bin_width,
            config.naming.clone(),
        )
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn bins(&self) -> &SimilarityBins {
        &self.bins
    }

    pub fn run(&self, source: InputSource<'_>) -> Result<MetaSummary, LtrMetaError> {
        if !self.filter.is_quality_filtered() {
            tracing::warn!(
                "No quality filter applied: only the {}% similarity threshold is used",
                self.filter.similarity_threshold
            );
        }

        match source {
            InputSource::Precomputed { results_dir } => {
                let genomes = matching::list_genomes(&self.genome_dir, &self.naming)?;
                let matched = matching::match_result_folders(&genomes, &results_dir, &self.naming)?;
                self.aggregate_folders(&matched)
            }
            InputSource::Manifest { path } => {
                let manifest = Manifest::load(&path)?;
                let manifest_dir = path
                    .parent()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| PathBuf::from("."));
                let matched = manifest.resolve(&self.genome_dir, &manifest_dir, &self.naming)?;
                self.aggregate_folders(&matched)
            }
            InputSource::LiveRun {
                predictor,
                results_dir,
                overwrite,
            } => self.aggregate_live(predictor, &results_dir, overwrite),
        }
    }

    fn progress_bar(&self, len: usize) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new(len as u64);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        {
            pb.set_style(style.progress_chars("#>-"));
        }
        pb
    }

    fn new_summary(&self) -> MetaSummary {
        MetaSummary {
            bins: self.bins.clone(),
            histogram: Vec::new(),
            summary: Vec::new(),
            skipped: Vec::new(),
            quality_filtered: self.filter.is_quality_filtered(),
        }
    }

    fn aggregate_folders(&self, matched: &[MatchedGenome]) -> Result<MetaSummary, LtrMetaError> {
        let mut result = self.new_summary();
        let pb = self.progress_bar(matched.len());

        for entry in matched {
            let organism = &entry.genome.organism;
            pb.set_message(organism.clone());

            let datasheet = matching::find_datasheet(&entry.result_folder, &self.naming)?;
            let Some(datasheet) = datasheet else {
                let reason = format!(
                    "no file ending in '{}' in {}",
                    self.naming.datasheet_suffix,
                    entry.result_folder.display()
                );
                tracing::warn!("Skipping {}: {}", organism, reason);
                result.skipped.push(SkippedGenome {
                    organism: organism.clone(),
                    reason,
                });
                pb.inc(1);
                continue;
            };

            let records = read_predictions(&datasheet)?;
            self.process_genome(&entry.genome, &records, &mut result)?;
            pb.inc(1);
        }

        pb.finish_and_clear();
        Ok(result)
    }

    fn aggregate_live(
        &self,
        predictor: &mut dyn Predictor,
        results_dir: &Path,
        overwrite: bool,
    ) -> Result<MetaSummary, LtrMetaError> {
        let genomes = matching::list_genomes(&self.genome_dir, &self.naming)?;
        fs::create_dir_all(results_dir)?;

        for genome in &genomes {
            let target = self.result_folder_for(results_dir, &genome.organism);
            if target.exists() && !overwrite {
                return Err(LtrMetaError::Config(format!(
                    "Result folder {} already exists (use overwrite to replace it)",
                    target.display()
                )));
            }
        }

        predictor
            .verify_installation()
            .map_err(|e| LtrMetaError::Predictor(format!("{:#}", e)))?;

        let mut result = self.new_summary();
        let pb = self.progress_bar(genomes.len());

        for genome in &genomes {
            pb.set_message(genome.organism.clone());
            tracing::info!("Predicting LTR retrotransposons in {}", genome.organism);

            let genome_path = fs::canonicalize(&genome.path)?;
            let staging = tempfile::Builder::new()
                .prefix(".ltrmeta-")
                .tempdir_in(results_dir)?;
            let job = PredictionJob {
                name: &genome.organism,
                genome: &genome_path,
                work_dir: staging.path(),
            };
            let produced = predictor
                .predict(&job)
                .map_err(|e| LtrMetaError::Predictor(format!("{:#}", e)))?;

            let target = self.result_folder_for(results_dir, &genome.organism);
            if target.exists() {
                fs::remove_dir_all(&target)?;
            }
            move_dir(&produced, &target)?;

            let datasheet = matching::find_datasheet(&target, &self.naming)?.ok_or_else(|| {
                LtrMetaError::Predictor(format!(
                    "{} produced no data sheet in {}",
                    predictor.name(),
                    target.display()
                ))
            })?;
            let records = read_predictions(&datasheet)?;
            self.process_genome(genome, &records, &mut result)?;
            pb.inc(1);
        }

        pb.finish_and_clear();
        Ok(result)
    }

    fn result_folder_for(&self, results_dir: &Path, organism: &str) -> PathBuf {
        results_dir.join(format!("{}{}", organism, self.naming.result_folder_suffix))
    }

    /// Filter, bin and summarise one genome's predictions
    fn process_genome(
        &self,
        genome: &GenomeEntry,
        records: &[PredictionRecord],
        result: &mut MetaSummary,
    ) -> Result<(), LtrMetaError> {
        let descriptor = scan_genome(&genome.path)?;
        let (histogram, summary) = self.summarize_genome(&genome.organism, records, &descriptor);

        tracing::info!(
            "{}: {} of {} predictions retained ({:.3} Mbp in a {:.3} Mbp genome)",
            genome.organism,
            histogram.total(),
            records.len(),
            summary.total_mass_mbp,
            summary.genome_size_mbp
        );

        result.histogram.push(histogram);
        result.summary.push(summary);
        Ok(())
    }

    /// Rows for a genome whose predictions and size are already known
    pub fn summarize_genome(
        &self,
        organism: &str,
        records: &[PredictionRecord],
        genome: &GenomeDescriptor,
    ) -> (HistogramRow, SummaryRow) {
        let retained = self.filter.apply(records);
        let counts = self
            .bins
            .count(retained.iter().filter_map(|r| r.similarity));

        let histogram = HistogramRow {
            organism: organism.to_string(),
            counts,
        };
        let summary = SummaryRow::from_predictions(organism, &retained, genome);
        (histogram, summary)
    }
}

/// Move a directory, copying when a rename across filesystems is refused
fn move_dir(from: &Path, to: &Path) -> Result<(), LtrMetaError> {
    if fs::rename(from, to).is_ok() {
        return Ok(());
    }
    copy_dir(from, to)?;
    fs::remove_dir_all(from)?;
    Ok(())
}

fn copy_dir(from: &Path, to: &Path) -> Result<(), LtrMetaError> {
    fs::create_dir_all(to)?;
    for entry in fs::read_dir(from)? {
        let entry = entry?;
        let dest = to.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_dir(&entry.path(), &dest)?;
        } else {
            fs::copy(entry.path(), dest)?;
        }
    }
    Ok(())
}
