//! Common test utilities for ltrmeta integration tests
//!
//! Builds genome directories, predictor result folders and data sheets in a
//! temporary directory, plus a predictor stand-in for live runs.
#![allow(dead_code)]

use anyhow::Result;
use ltrmeta::tools::{PredictionJob, Predictor};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const HEADER: &str =
    "ID\tchromosome\tstart\tend\tstrand\tltr_similarity\twidth\torfs\tPBS_start\tprotein_domain\tTE_N_abs";

/// One data sheet row: (id, similarity, width, orfs, pbs, domain, n_count)
pub type Row<'a> = (&'a str, f64, u64, u32, Option<u64>, Option<&'a str>, u64);

pub fn datasheet(rows: &[Row<'_>]) -> String {
    let mut out = String::from(HEADER);
    out.push('\n');
    for (i, (id, sim, width, orfs, pbs, domain, n)) in rows.iter().enumerate() {
        let start = 1000 * (i as u64 + 1);
        out.push_str(&format!(
            "{}\tChr1\t{}\t{}\t+\t{}\t{}\t{}\t{}\t{}\t{}\n",
            id,
            start,
            start + width - 1,
            sim,
            width,
            orfs,
            pbs.map(|p| p.to_string()).unwrap_or_else(|| "NA".to_string()),
            domain.unwrap_or("NA"),
            n
        ));
    }
    out
}

/// A clean, quality-passing element
pub fn good(id: &str, similarity: f64, width: u64) -> Row<'_> {
    (id, similarity, width, 1, Some(100), Some("RVT_1"), 0)
}

/// Temporary layout with `genomes/` and `results/`
pub struct TestEnvironment {
    temp_dir: TempDir,
    pub genomes: PathBuf,
    pub results: PathBuf,
    pub output: PathBuf,
}

impl TestEnvironment {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let genomes = temp_dir.path().join("genomes");
        let results = temp_dir.path().join("results");
        let output = temp_dir.path().join("out");
        fs::create_dir_all(&genomes).expect("Failed to create genome dir");
        fs::create_dir_all(&results).expect("Failed to create results dir");

        TestEnvironment {
            temp_dir,
            genomes,
            results,
            output,
        }
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Write a genome of `length` bases of which `n_count` are N
    pub fn add_genome(&self, file_name: &str, length: usize, n_count: usize) -> PathBuf {
        let path = self.genomes.join(file_name);
        fs::write(&path, genome_fasta(length, n_count)).expect("Failed to write genome");
        path
    }

    /// Create `<name>_ltrpred/<name>_LTRpred_DataSheet.tsv`
    pub fn add_results(&self, name: &str, rows: &[Row<'_>]) -> PathBuf {
        let folder = self.results.join(format!("{}_ltrpred", name));
        fs::create_dir_all(&folder).expect("Failed to create result folder");
        fs::write(
            folder.join(format!("{}_LTRpred_DataSheet.tsv", name)),
            datasheet(rows),
        )
        .expect("Failed to write data sheet");
        folder
    }

    pub fn add_empty_results(&self, name: &str) -> PathBuf {
        let folder = self.results.join(format!("{}_ltrpred", name));
        fs::create_dir_all(&folder).expect("Failed to create result folder");
        folder
    }
}

/// Two records split over 60-column lines
pub fn genome_fasta(length: usize, n_count: usize) -> String {
    let half = length / 2;
    let mut bases: Vec<u8> = (0..length).map(|i| b"ACGT"[i % 4]).collect();
    for b in bases.iter_mut().take(n_count) {
        *b = b'N';
    }

    let mut out = String::new();
    for (i, chunk) in [&bases[..half], &bases[half..]].iter().enumerate() {
        out.push_str(&format!(">chr{} test chromosome\n", i + 1));
        for line in chunk.chunks(60) {
            out.push_str(std::str::from_utf8(line).unwrap());
            out.push('\n');
        }
    }
    out
}

/// Predictor that writes a fixed data sheet instead of running a tool
pub struct MockPredictor {
    pub rows: Vec<(String, f64, u64)>,
    pub calls: Vec<String>,
    pub fail_on: Option<String>,
}

impl MockPredictor {
    pub fn new(rows: Vec<(String, f64, u64)>) -> Self {
        Self {
            rows,
            calls: Vec::new(),
            fail_on: None,
        }
    }
}

impl Predictor for MockPredictor {
    fn predict(&mut self, job: &PredictionJob<'_>) -> Result<PathBuf> {
        self.calls.push(job.name.to_string());
        if self.fail_on.as_deref() == Some(job.name) {
            anyhow::bail!("mock predictor crashed on {}", job.name);
        }

        let folder = job.work_dir.join(format!("{}_ltrpred", job.name));
        fs::create_dir_all(&folder)?;
        let rows: Vec<Row<'_>> = self
            .rows
            .iter()
            .map(|(id, sim, width)| good(id.as_str(), *sim, *width))
            .collect();
        fs::write(
            folder.join(format!("{}_LTRpred_DataSheet.tsv", job.name)),
            datasheet(&rows),
        )?;
        Ok(folder)
    }

    fn verify_installation(&self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "MockPredictor"
    }
}
