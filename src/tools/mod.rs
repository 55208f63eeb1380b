pub mod command;
pub mod traits;

pub use command::CommandPredictor;
pub use traits::{PredictionJob, Predictor};
