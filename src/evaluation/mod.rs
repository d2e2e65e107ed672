pub mod algorithm;
pub mod config;

pub use algorithm::{evaluate_squat, sample_frame, standing_window, EvaluationError, FrameSample};
pub use config::SquatFormRules;
