use crate::bio::PredictionRecord;
use crate::core::bins::SimilarityBins;
use crate::core::filter::PredictionFilter;
use serde::Serialize;
use std::collections::HashSet;

/// Five-number summary of a sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Quartiles {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

impl Quartiles {
    /// Linear interpolation between closest ranks; `None` for an empty sample
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));

        let quantile = |p: f64| {
            let pos = p * (sorted.len() - 1) as f64;
            let lower = pos.floor() as usize;
            let upper = pos.ceil() as usize;
            sorted[lower] + (sorted[upper] - sorted[lower]) * (pos - lower as f64)
        };

        Some(Self {
            min: sorted[0],
            q1: quantile(0.25),
            median: quantile(0.5),
            q3: quantile(0.75),
            max: sorted[sorted.len() - 1],
        })
    }
}

/// Statistics of a single prediction table
#[derive(Debug, Clone, Serialize)]
pub struct PredictionStats {
    pub total_records: usize,
    pub retained_records: usize,
    pub unique_ids: usize,
    pub quality_filtered: bool,
    pub similarity: Option<Quartiles>,
    pub width: Option<Quartiles>,
    pub total_mass_mbp: f64,
    pub with_pbs: usize,
    pub with_domain: usize,
    pub histogram: Vec<(String, u64)>,
}

impl PredictionStats {
    pub fn calculate(
        records: &[PredictionRecord],
        filter: &PredictionFilter,
        bins: &SimilarityBins,
    ) -> Self {
        let retained = filter.apply(records);

        let similarities: Vec<f64> = retained.iter().filter_map(|r| r.similarity).collect();
        let widths: Vec<f64> = retained.iter().filter_map(|r| r.width).map(|w| w as f64).collect();
        let histogram = bins
            .labels()
            .into_iter()
            .zip(bins.count(similarities.iter().copied()))
            .collect();

        Self {
            total_records: records.len(),
            retained_records: retained.len(),
            unique_ids: retained.iter().map(|r| r.id.as_str()).collect::<HashSet<_>>().len(),
            quality_filtered: filter.is_quality_filtered(),
            similarity: Quartiles::from_values(&similarities),
            width: Quartiles::from_values(&widths),
            total_mass_mbp: widths.iter().sum::<f64>() / 1_000_000.0,
            with_pbs: retained.iter().filter(|r| r.pbs_start.is_some()).count(),
            with_domain: retained.iter().filter(|r| r.protein_domain.is_some()).count(),
            histogram,
        }
    }
}
