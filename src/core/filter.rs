//! Retention rules for predicted elements
//!
//! There is a single filter definition; every input mode of the aggregator
//! and the export/stats commands go through [`PredictionFilter::retains`].

use crate::bio::PredictionRecord;
use crate::core::config::FilterConfig;
use crate::LtrMetaError;

/// Structural quality requirements applied on top of the similarity cut
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QualityCriteria {
    pub max_unknown_fraction: f64,
    pub min_orfs: u32,
}

impl Default for QualityCriteria {
    fn default() -> Self {
        Self {
            max_unknown_fraction: 0.1,
            min_orfs: 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PredictionFilter {
    pub similarity_threshold: f64,
    /// `None` disables the quality checks
    pub quality: Option<QualityCriteria>,
}

impl PredictionFilter {
    pub fn new(
        similarity_threshold: f64,
        quality: Option<QualityCriteria>,
    ) -> Result<Self, LtrMetaError> {
        if !(0.0..100.0).contains(&similarity_threshold) {
            return Err(LtrMetaError::Config(format!(
                "Similarity threshold must be within [0, 100), got {}",
                similarity_threshold
            )));
        }
        if let Some(criteria) = quality {
            if !(0.0..=1.0).contains(&criteria.max_unknown_fraction) {
                return Err(LtrMetaError::Config(format!(
                    "Maximum unknown-base fraction must be within [0, 1], got {}",
                    criteria.max_unknown_fraction
                )));
            }
        }

        Ok(Self {
            similarity_threshold,
            quality,
        })
    }

    pub fn from_config(config: &FilterConfig) -> Result<Self, LtrMetaError> {
        let quality = config.quality_filter.then_some(QualityCriteria {
            max_unknown_fraction: config.max_unknown_fraction,
            min_orfs: config.min_orfs,
        });
        Self::new(config.similarity_threshold, quality)
    }

    pub fn is_quality_filtered(&self) -> bool {
        self.quality.is_some()
    }

    /// Whether a record passes every active rule
    ///
    /// Missing values never satisfy a comparison, so a record without a
    /// similarity is always dropped, and with quality checks on a record
    /// without ORF or N counts is dropped too. Similarities above 100 lie
    /// outside every bin and are dropped.
    pub fn retains(&self, record: &PredictionRecord) -> bool {
        let Some(similarity) = record.similarity else {
            return false;
        };
        if !(self.similarity_threshold..=100.0).contains(&similarity) {
            return false;
        }

        match self.quality {
            None => true,
            Some(criteria) => {
                let clean = record
                    .unknown_fraction()
                    .is_some_and(|f| f <= criteria.max_unknown_fraction);
                let enough_orfs = record.orfs.is_some_and(|o| o >= criteria.min_orfs);

                clean && record.has_evidence() && enough_orfs
            }
        }
    }

    pub fn apply<'a>(&self, records: &'a [PredictionRecord]) -> Vec<&'a PredictionRecord> {
        records.iter().filter(|r| self.retains(r)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn strict() -> PredictionFilter {
        PredictionFilter::new(70.0, Some(QualityCriteria::default())).unwrap()
    }

    fn lenient() -> PredictionFilter {
        PredictionFilter::new(70.0, None).unwrap()
    }

    fn good_record() -> PredictionRecord {
        PredictionRecord::new("te", 95.0, 1000)
            .with_orfs(1)
            .with_pbs(10)
            .with_unknown_bases(0)
    }

    #[test]
    fn test_good_record_passes_both() {
        assert!(strict().retains(&good_record()));
        assert!(lenient().retains(&good_record()));
    }

    #[test]
    fn test_unknown_fraction_only_matters_with_quality_filter() {
        let record = good_record().with_unknown_bases(150);
        assert!(!strict().retains(&record));
        assert!(lenient().retains(&record));
    }

    #[rstest]
    #[case(70.0, true)]
    #[case(69.99, false)]
    #[case(100.0, true)]
    fn test_threshold_is_inclusive(#[case] similarity: f64, #[case] expected: bool) {
        let mut record = good_record();
        record.similarity = Some(similarity);
        assert_eq!(strict().retains(&record), expected);
        assert_eq!(lenient().retains(&record), expected);
    }

    #[test]
    fn test_requires_pbs_or_domain() {
        let mut record = good_record();
        record.pbs_start = None;
        assert!(!strict().retains(&record));

        let record = record.with_domain("RVT_1");
        assert!(strict().retains(&record));
    }

    #[test]
    fn test_min_orfs() {
        let mut record = good_record();
        record.orfs = Some(0);
        assert!(!strict().retains(&record));

        record.orfs = None;
        assert!(!strict().retains(&record));
        assert!(lenient().retains(&record));
    }

    #[rstest]
    #[case(100.5)]
    #[case(100.000001)]
    #[case(f64::NAN)]
    fn test_similarity_outside_axis_is_dropped(#[case] similarity: f64) {
        let mut record = good_record();
        record.similarity = Some(similarity);
        assert!(!strict().retains(&record));
        assert!(!lenient().retains(&record));
    }

    #[test]
    fn test_missing_similarity_is_dropped() {
        let mut record = good_record();
        record.similarity = None;
        assert!(!lenient().retains(&record));
    }

    #[test]
    fn test_unknown_fraction_boundary() {
        let record = good_record().with_unknown_bases(100);
        assert!(strict().retains(&record));
    }

    #[test]
    fn test_invalid_threshold() {
        assert!(PredictionFilter::new(100.0, None).is_err());
        assert!(PredictionFilter::new(-1.0, None).is_err());
    }

    #[test]
    fn test_from_config() {
        let mut config = FilterConfig::default();
        assert!(PredictionFilter::from_config(&config).unwrap().is_quality_filtered());

        config.quality_filter = false;
        assert!(!PredictionFilter::from_config(&config).unwrap().is_quality_filtered());
    }
}
