use crate::LtrMetaError;
use serde::Serialize;

/// Fixed partition of the similarity axis into `(lo, hi]` intervals
///
/// The first bin also takes values equal to the lowest breakpoint, so every
/// value in `[threshold, 100]` lands in exactly one bin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarityBins {
    breaks: Vec<f64>,
}

fn round_break(value: f64) -> f64 {
    (value * 1e9).round() / 1e9
}

impl SimilarityBins {
    pub fn new(threshold: f64, width: f64) -> Result<Self, LtrMetaError> {
        if !width.is_finite() || width <= 0.0 {
            return Err(LtrMetaError::Config(format!(
                "Bin width must be positive, got {}",
                width
            )));
        }
        if !(0.0..100.0).contains(&threshold) {
            return Err(LtrMetaError::Config(format!(
                "Similarity threshold must be within [0, 100), got {}",
                threshold
            )));
        }

        let steps = ((100.0 - threshold) / width + 1e-10).floor() as usize;
        let mut breaks: Vec<f64> = (0..=steps)
            .map(|i| round_break(threshold + i as f64 * width))
            .collect();

        if breaks.len() < 2 {
            return Err(LtrMetaError::Config(format!(
                "Similarity threshold {} and bin width {} yield fewer than two breakpoints",
                threshold, width
            )));
        }

        if let Some(&last) = breaks.last() {
            if last < 100.0 - 1e-9 {
                breaks.push(100.0);
            }
        }

        Ok(Self { breaks })
    }

    pub fn breaks(&self) -> &[f64] {
        &self.breaks
    }

    pub fn len(&self) -> usize {
        self.breaks.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn labels(&self) -> Vec<String> {
        self.breaks
            .windows(2)
            .map(|w| format!("({},{}]", w[0], w[1]))
            .collect()
    }

    /// Index of the bin holding `value`, if it lies on the axis
    pub fn bin_index(&self, value: f64) -> Option<usize> {
        let lowest = self.breaks[0];
        let highest = self.breaks[self.breaks.len() - 1];
        if value.is_nan() || value < lowest || value > highest {
            return None;
        }

        let below = self.breaks.partition_point(|&b| b < value);
        Some(below.saturating_sub(1))
    }

    /// Count values per bin; every bin is present, empty ones as zero
    pub fn count<I>(&self, values: I) -> Vec<u64>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut counts = vec![0u64; self.len()];
        for value in values {
            if let Some(index) = self.bin_index(value) {
                counts[index] += 1;
            }
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_partition_has_fifteen_bins() {
        let bins = SimilarityBins::new(70.0, 2.0).unwrap();
        assert_eq!(bins.len(), 15);

        let labels = bins.labels();
        assert_eq!(labels.first().unwrap(), "(70,72]");
        assert_eq!(labels[1], "(72,74]");
        assert_eq!(labels.last().unwrap(), "(98,100]");
    }

    #[test]
    fn test_bin_edges() {
        let bins = SimilarityBins::new(70.0, 2.0).unwrap();
        assert_eq!(bins.bin_index(70.0), Some(0));
        assert_eq!(bins.bin_index(72.0), Some(0));
        assert_eq!(bins.bin_index(72.01), Some(1));
        assert_eq!(bins.bin_index(95.0), Some(12));
        assert_eq!(bins.bin_index(100.0), Some(14));
        assert_eq!(bins.bin_index(69.9), None);
        assert_eq!(bins.bin_index(100.1), None);
    }

    #[test]
    fn test_count_keeps_empty_bins() {
        let bins = SimilarityBins::new(70.0, 2.0).unwrap();
        let counts = bins.count(std::iter::repeat(95.0).take(100));

        assert_eq!(counts.len(), 15);
        assert_eq!(counts[12], 100);
        assert_eq!(counts.iter().sum::<u64>(), 100);
        assert!(counts.iter().enumerate().all(|(i, &c)| i == 12 || c == 0));
    }

    #[test]
    fn test_uneven_width_closes_at_hundred() {
        let bins = SimilarityBins::new(70.0, 4.0).unwrap();
        assert_eq!(bins.breaks().last(), Some(&100.0));
        assert_eq!(bins.labels().last().unwrap(), "(98,100]");
        assert_eq!(bins.bin_index(99.5), Some(bins.len() - 1));
    }

    #[test]
    fn test_fractional_width_labels() {
        let bins = SimilarityBins::new(99.0, 0.1).unwrap();
        assert_eq!(bins.len(), 10);
        assert_eq!(bins.labels()[2], "(99.2,99.3]");
    }

    #[test]
    fn test_incompatible_pair_is_config_error() {
        let err = SimilarityBins::new(99.0, 2.0).unwrap_err();
        assert!(matches!(err, LtrMetaError::Config(_)));
        assert!(err.to_string().contains("99"));
        assert!(err.to_string().contains("2"));
    }

    #[test]
    fn test_non_positive_width() {
        assert!(SimilarityBins::new(70.0, 0.0).is_err());
        assert!(SimilarityBins::new(70.0, -2.0).is_err());
    }
}
