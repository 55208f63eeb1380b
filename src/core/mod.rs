pub mod aggregator;
pub mod bins;
pub mod config;
pub mod filter;
pub mod matching;
pub mod stats;
