pub mod bio;
pub mod cli;
pub mod core;
pub mod report;
pub mod tools;

pub use crate::core::aggregator::{InputSource, MetaAggregator, MetaSummary};
pub use crate::core::bins::SimilarityBins;
pub use crate::core::filter::PredictionFilter;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LtrMetaError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Inconsistent input data: {0}")]
    DataConsistency(String),

    #[error("Predictor error: {0}")]
    Predictor(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, LtrMetaError>;
