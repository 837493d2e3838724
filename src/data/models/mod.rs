pub mod content_models;
pub mod error_models;
pub mod row_models;
pub mod srs_models;
pub mod stats_models;

pub use content_models::{ContentDisplay, LessonContent};
pub use error_models::{SrsError, StoreError};
pub use row_models::{NewSessionRow, SchedulingRow, SessionRow};
pub use srs_models::{
    ExerciseType, HalfLifeEstimate, PerformanceHistory, PerformanceSummary,
    RecallEstimate, RecallQueueItem, Recommendation, RecordLookup, ResponseData,
    ResponseOutcome, ReviewSession, ReviewTarget, ScheduleOutcome, SchedulingRecord, SchedulingState,
    SpacedRepetitionUpdate,
};
pub use stats_models::{
    AdjustmentConfidence, AdjustmentReason, BatchReview, BatchReviewResult,
    ContentPerformance, DifficultyAdjustment, DifficultyTrend, IntervalBreakdown, UpcomingDay, UserStats,
};
