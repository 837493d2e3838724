use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::config::SchedulerConfig;
use crate::data::models::{ContentDisplay, SrsError};
use crate::utils::time::{add_hours, hours_between};

/// Aggregated performance of one learner on one content item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceHistory {
    pub repetitions: i32,          // Consecutive successful reviews
    pub success_count: i32,        // Lifetime successes
    pub total_reviews: i32,        // Lifetime attempts
    pub last_response_quality: Option<i32>,
    pub ease_factor: f64,
}

impl Default for PerformanceHistory {
    fn default() -> Self {
        Self {
            repetitions: 0,
            success_count: 0,
            total_reviews: 0,
            last_response_quality: None,
            ease_factor: SchedulerConfig::default().initial_ease_factor,
        }
    }
}

impl PerformanceHistory {
    /// Share of successful reviews, `None` when the item was never reviewed.
    pub fn success_rate(&self) -> Option<f64> {
        if self.total_reviews > 0 {
            Some(f64::from(self.success_count) / f64::from(self.total_reviews))
        } else {
            None
        }
    }
}

/// Durable scheduling state for a (user, content) pair.
///
/// `next_review` is not stored on the struct: it is always derived from the
/// last review time and the current interval.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchedulingRecord {
    pub user_id: String,
    pub content_id: String,
    pub current_interval: f64, // Hours until the next review
    pub ease_factor: f64,
    pub repetitions: i32,
    pub success_count: i32,
    pub total_reviews: i32,
    pub last_response_quality: Option<i32>,
    pub last_reviewed: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl SchedulingRecord {
    /// A never-reviewed record, due immediately.
    pub fn fresh(user_id: &str, content_id: &str, config: &SchedulerConfig, now: DateTime<Utc>) -> Self {
        Self {
            user_id: user_id.to_string(),
            content_id: content_id.to_string(),
            current_interval: config.default_interval,
            ease_factor: config.initial_ease_factor,
            repetitions: 0,
            success_count: 0,
            total_reviews: 0,
            last_response_quality: None,
            last_reviewed: None,
            created_at: now,
        }
    }

    pub fn next_review(&self) -> DateTime<Utc> {
        match self.last_reviewed {
            Some(reviewed) => add_hours(reviewed, self.current_interval),
            None => self.created_at,
        }
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_review() <= now
    }

    /// Hours since the last review, or twice the interval for a record never reviewed.
    pub fn hours_since_review(&self, now: DateTime<Utc>) -> f64 {
        match self.last_reviewed {
            Some(reviewed) => hours_between(reviewed, now),
            None => self.current_interval * 2.0,
        }
    }

    pub fn state(&self) -> SchedulingState {
        SchedulingState {
            ease_factor: self.ease_factor,
            repetitions: self.repetitions,
            current_interval: self.current_interval,
        }
    }

    pub fn history(&self) -> PerformanceHistory {
        PerformanceHistory {
            repetitions: self.repetitions,
            success_count: self.success_count,
            total_reviews: self.total_reviews,
            last_response_quality: self.last_response_quality,
            ease_factor: self.ease_factor,
        }
    }

    /// Folds one scheduled response into the record.
    pub fn apply_review(
        &mut self,
        quality: i32,
        succeeded: bool,
        outcome: &ScheduleOutcome,
        reviewed_at: DateTime<Utc>,
    ) {
        self.current_interval = outcome.new_interval;
        self.ease_factor = outcome.new_ease_factor;
        self.repetitions = outcome.new_repetitions;
        self.total_reviews += 1;
        if succeeded {
            self.success_count += 1;
        }
        self.last_response_quality = Some(quality);
        self.last_reviewed = Some(reviewed_at);
    }
}

/// The fields of a record the review scheduler transitions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SchedulingState {
    pub ease_factor: f64,
    pub repetitions: i32,
    pub current_interval: f64, // Hours
}

/// Result of a persistence lookup for a (user, content) pair.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordLookup {
    Found(SchedulingRecord),
    Absent,
}

impl RecordLookup {
    pub fn into_option(self) -> Option<SchedulingRecord> {
        match self {
            RecordLookup::Found(record) => Some(record),
            RecordLookup::Absent => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, RecordLookup::Found(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HalfLifeEstimate {
    pub half_life: f64, // Hours
    pub confidence: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    ReviewNow,
    ReviewSoon,
    ReviewLater,
}

impl Recommendation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Recommendation::ReviewNow => "review_now",
            Recommendation::ReviewSoon => "review_soon",
            Recommendation::ReviewLater => "review_later",
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecallEstimate {
    pub probability: f64,
    pub recommendation: Recommendation,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScheduleOutcome {
    pub new_interval: f64, // Hours
    pub new_ease_factor: f64,
    pub new_repetitions: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseType {
    #[default]
    Flashcard,
    Audio,
    Conversation,
    Visual,
}

impl ExerciseType {
    /// Relative difficulty of the exercise format.
    pub fn weight(&self) -> f64 {
        match self {
            ExerciseType::Flashcard => 1.0,
            ExerciseType::Audio => 1.2,
            ExerciseType::Conversation => 1.5,
            ExerciseType::Visual => 0.9,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExerciseType::Flashcard => "flashcard",
            ExerciseType::Audio => "audio",
            ExerciseType::Conversation => "conversation",
            ExerciseType::Visual => "visual",
        }
    }
}

impl fmt::Display for ExerciseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExerciseType {
    type Err = SrsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "flashcard" => Ok(ExerciseType::Flashcard),
            "audio" => Ok(ExerciseType::Audio),
            "conversation" => Ok(ExerciseType::Conversation),
            "visual" => Ok(ExerciseType::Visual),
            other => Err(SrsError::Validation(format!("unknown exercise type: {}", other))),
        }
    }
}

/// Payload of one learner response.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ResponseData {
    pub quality: i32,
    #[validate(range(min = 0.0, message = "Response time cannot be negative"))]
    pub time: Option<f64>, // Seconds
    #[serde(default)]
    pub exercise_type: ExerciseType,
}

/// Identifiers of the pair a response belongs to.
#[derive(Debug, Validate)]
pub struct ReviewTarget {
    #[validate(length(min = 1, message = "user id is required"))]
    pub user_id: String,
    #[validate(length(min = 1, message = "content id is required"))]
    pub content_id: String,
}

impl ReviewTarget {
    pub fn new(user_id: &str, content_id: &str) -> Self {
        Self {
            user_id: user_id.trim().to_string(),
            content_id: content_id.trim().to_string(),
        }
    }
}

/// Append-only log entry for one response event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewSession {
    pub user_id: String,
    pub content_id: String,
    pub response_quality: i32,
    pub response_time: Option<f64>,
    pub exercise_type: ExerciseType,
    pub type_weight: f64,
    pub half_life: f64,
    pub next_review: DateTime<Utc>,
    pub reviewed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpacedRepetitionUpdate {
    pub record: SchedulingRecord,
    pub next_review: DateTime<Utc>,
    pub half_life: f64,
    pub confidence: f64,
    pub scheduling: ScheduleOutcome,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceSummary {
    pub quality: i32,
    pub time: Option<f64>,
    pub exercise_type: ExerciseType,
    pub improved_retention: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseOutcome {
    pub success: bool,
    pub spaced_repetition: SpacedRepetitionUpdate,
    pub session: ReviewSession,
    pub performance: PerformanceSummary,
}

/// One ranked entry of a learner's review queue.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecallQueueItem {
    pub content_id: String,
    pub recall_probability: f64,
    pub recommendation: Recommendation,
    pub half_life: f64,
    pub time_since_review: f64, // Hours
    pub next_review: DateTime<Utc>,
    pub current_interval: f64,
    pub ease_factor: f64,
    pub repetitions: i32,
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub display: Option<ContentDisplay>,
}
