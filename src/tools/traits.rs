/// Trait definitions for external predictor tools
///
/// The aggregator only sees this interface, so a live run can be driven by
/// the real predictor binary or by a stand-in in tests.

use anyhow::Result;
use std::path::{Path, PathBuf};

/// A genome handed to the predictor
#[derive(Debug, Clone)]
pub struct PredictionJob<'a> {
    /// Basename shared by the genome file, result folder and data sheet
    pub name: &'a str,
    pub genome: &'a Path,
    /// Directory the predictor writes its result folder into
    pub work_dir: &'a Path,
}

/// Common interface for LTR retrotransposon predictors
pub trait Predictor {
    /// Run the predictor on one genome and return the result folder it wrote
    ///
    /// Blocks until the tool exits.
    fn predict(&mut self, job: &PredictionJob<'_>) -> Result<PathBuf>;

    /// Verify that the tool is properly installed
    fn verify_installation(&self) -> Result<()>;

    /// Get the name of this predictor
    fn name(&self) -> &str;
}
