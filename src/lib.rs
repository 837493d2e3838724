//! Spaced-repetition scheduling for Gheg Albanian vocabulary.
//!
//! A Half-Life Regression model estimates how long a learner retains each
//! item, predicts current recall, and schedules the next review.

pub mod config;
pub mod data;
pub mod features;
pub mod schema;
pub mod utils;

pub use config::{SchedulerConfig, Settings};
pub use data::models::{
    ExerciseType, HalfLifeEstimate, PerformanceHistory, RecallEstimate, RecallQueueItem,
    Recommendation, RecordLookup, ResponseData, ResponseOutcome, ReviewSession, ScheduleOutcome,
    SchedulingRecord, SchedulingState, SrsError, StoreError,
};
pub use data::repositories::{ContentCatalog, MemoryStore, SqliteStore, SrsStore};
pub use features::srs::{
    calculate_half_life, get_recall_probability, schedule_next_review, SrsService,
};
