//! Predictor data sheets
//!
//! One row per predicted LTR retrotransposon. Only the columns the
//! aggregator and exporters use are mapped; everything else in the sheet is
//! ignored.

use crate::LtrMetaError;
use serde::{Deserialize, Deserializer, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;

/// A single predicted element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRecord {
    #[serde(rename = "ID")]
    pub id: String,

    #[serde(rename = "ltr_similarity", deserialize_with = "na_as_none")]
    pub similarity: Option<f64>,

    #[serde(rename = "width", deserialize_with = "na_as_none")]
    pub width: Option<u64>,

    #[serde(rename = "orfs", default, deserialize_with = "na_as_none")]
    pub orfs: Option<u32>,

    #[serde(rename = "PBS_start", default, deserialize_with = "na_as_none")]
    pub pbs_start: Option<u64>,

    #[serde(rename = "protein_domain", default, deserialize_with = "na_as_none")]
    pub protein_domain: Option<String>,

    #[serde(rename = "TE_N_abs", default, deserialize_with = "na_as_none")]
    pub n_count: Option<u64>,

    #[serde(default, deserialize_with = "na_as_none")]
    pub chromosome: Option<String>,

    #[serde(default, deserialize_with = "na_as_none")]
    pub start: Option<u64>,

    #[serde(default, deserialize_with = "na_as_none")]
    pub end: Option<u64>,

    #[serde(default, deserialize_with = "na_as_none")]
    pub strand: Option<String>,
}

impl PredictionRecord {
    /// Record with only the required columns set
    pub fn new(id: impl Into<String>, similarity: f64, width: u64) -> Self {
        Self {
            id: id.into(),
            similarity: Some(similarity),
            width: Some(width),
            orfs: None,
            pbs_start: None,
            protein_domain: None,
            n_count: None,
            chromosome: None,
            start: None,
            end: None,
            strand: None,
        }
    }

    pub fn with_orfs(mut self, orfs: u32) -> Self {
        self.orfs = Some(orfs);
        self
    }

    pub fn with_pbs(mut self, pbs_start: u64) -> Self {
        self.pbs_start = Some(pbs_start);
        self
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.protein_domain = Some(domain.into());
        self
    }

    pub fn with_unknown_bases(mut self, n_count: u64) -> Self {
        self.n_count = Some(n_count);
        self
    }

    pub fn with_location(mut self, chromosome: impl Into<String>, start: u64, end: u64) -> Self {
        self.chromosome = Some(chromosome.into());
        self.start = Some(start);
        self.end = Some(end);
        self
    }

    /// Fraction of the element made of unknown bases
    ///
    /// `None` when either the N count or the width is missing, or the width
    /// is zero.
    pub fn unknown_fraction(&self) -> Option<f64> {
        match (self.n_count, self.width) {
            (Some(n), Some(w)) if w > 0 => Some(n as f64 / w as f64),
            _ => None,
        }
    }

    /// Whether the element carries a PBS or a protein domain hit
    pub fn has_evidence(&self) -> bool {
        self.pbs_start.is_some() || self.protein_domain.is_some()
    }
}

/// Treat R-style missing markers as absent values
fn na_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") | Some("NA") | Some("NaN") | Some("<NA>") => Ok(None),
        Some(value) => value
            .parse::<T>()
            .map(Some)
            .map_err(|e| serde::de::Error::custom(format!("invalid value '{}': {}", value, e))),
    }
}

/// Pick the field delimiter from a header line
pub fn detect_delimiter(header: &str) -> u8 {
    let candidates = [b'\t', b',', b';'];
    candidates
        .iter()
        .copied()
        .max_by_key(|&d| header.bytes().filter(|&b| b == d).count())
        .filter(|&d| header.as_bytes().contains(&d))
        .unwrap_or(b'\t')
}

const REQUIRED_COLUMNS: [&str; 3] = ["ID", "ltr_similarity", "width"];

/// Read a predictor data sheet
pub fn read_predictions<P: AsRef<Path>>(path: P) -> Result<Vec<PredictionRecord>, LtrMetaError> {
    let path = path.as_ref();

    let mut header = String::new();
    BufReader::new(File::open(path)?).read_line(&mut header)?;
    if header.trim().is_empty() {
        return Err(LtrMetaError::Parse(format!(
            "Prediction table {} is empty",
            path.display()
        )));
    }
    let delimiter = detect_delimiter(&header);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(csv::Trim::All)
        .from_path(path)?;

    let headers = reader.headers()?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(LtrMetaError::Parse(format!(
                "Prediction table {} is missing required column '{}'",
                path.display(),
                column
            )));
        }
    }

    reader
        .deserialize()
        .collect::<Result<Vec<PredictionRecord>, csv::Error>>()
        .map_err(|e| {
            LtrMetaError::Parse(format!(
                "Failed to read prediction table {}: {}",
                path.display(),
                e
            ))
        })
}
