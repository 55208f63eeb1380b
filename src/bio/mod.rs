pub mod fasta;
pub mod prediction;

pub use fasta::{GenomeDescriptor, SequenceSummary};
pub use prediction::PredictionRecord;
