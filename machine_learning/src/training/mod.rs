mod accumulator;
mod block_trainer;
mod builder;
mod config;
mod error_tracker;
mod momentum;
pub mod source;

pub use accumulator::GradientAccumulator;
pub use block_trainer::BlockTrainer;
pub use builder::TrainerBuilder;
pub use config::{ErrorGranularity, TrainerConfig};
pub use error_tracker::{ERROR_SENTINEL, ErrorTracker};
pub use momentum::MomentumState;
