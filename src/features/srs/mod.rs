//! Half-Life Regression spaced repetition.
//!
//! The estimator, predictor and scheduler are pure functions over an explicit
//! [`SchedulerConfig`](crate::config::SchedulerConfig); [`SrsService`] composes
//! them with a store.

pub mod difficulty;
pub mod error_conversions;
pub mod half_life;
pub mod queue;
pub mod recall;
pub mod scheduler;
pub mod service;
pub mod stats;

pub use difficulty::assess_difficulty;
pub use half_life::calculate_half_life;
pub use recall::get_recall_probability;
pub use scheduler::{schedule_next_review, validate_quality};
pub use service::SrsService;
