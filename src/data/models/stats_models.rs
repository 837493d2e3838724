use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::data::models::{ExerciseType, ResponseOutcome};

/// Scheduling overview for one learner
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct UserStats {
    pub total_items: usize,
    pub due_now: usize,
    pub due_within_day: usize,
    pub avg_ease_factor: Option<f64>,
    pub avg_interval: Option<f64>, // Hours
    pub total_reviews: i64,
    pub total_successes: i64,
    pub success_rate: f64, // Mean of per-item success rates
    pub interval_breakdown: IntervalBreakdown,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct IntervalBreakdown {
    pub new: usize,      // Never reviewed
    pub learning: usize, // Under a day
    pub young: usize,    // Under three weeks
    pub mature: usize,
}

/// Items due on one calendar day (UTC)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpcomingDay {
    pub review_date: NaiveDate,
    pub items_due: usize,
}

/// A learner's performance on items of one difficulty score
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DifficultyTrend {
    pub difficulty_score: f64,
    pub success_rate: f64, // Mean of per-item success rates, unreviewed items count as 0
    pub avg_ease_factor: f64,
    pub item_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentConfidence {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentReason {
    InsufficientData,
    TooEasy,
    TooHard,
    Optimal,
}

/// Population-level performance on one content item
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentPerformance {
    pub avg_quality: f64,
    pub avg_ease_factor: f64,
    pub avg_success_rate: f64,
    pub total_attempts: usize,
}

/// Suggested change to an item's difficulty score
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DifficultyAdjustment {
    pub adjustment: i32,
    pub confidence: AdjustmentConfidence,
    pub reason: AdjustmentReason,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<ContentPerformance>,
}

/// One entry of a batch submission
#[derive(Debug, Clone, Deserialize)]
pub struct BatchReview {
    pub content_id: String,
    pub quality: i32,
    pub time: Option<f64>,
    #[serde(default)]
    pub exercise_type: ExerciseType,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchReviewResult {
    pub content_id: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<ResponseOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
