use std::str::FromStr;

use chrono::NaiveDateTime;
use diesel::{Insertable, Queryable, Selectable};

use crate::data::models::{ExerciseType, ReviewSession, SchedulingRecord};
use crate::schema::{review_sessions, spaced_repetition};
use crate::utils::time::{from_naive, to_naive};

/// Row of the spaced repetition table
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = spaced_repetition)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SchedulingRow {
    pub user_id: String,
    pub content_id: String,
    pub current_interval: f64,
    pub ease_factor: f64,
    pub repetitions: i32,
    pub success_count: i32,
    pub total_reviews: i32,
    pub last_response_quality: Option<i32>,
    pub last_reviewed: Option<NaiveDateTime>,
    pub next_review: NaiveDateTime, // Derived, kept for the due query
    pub created_at: NaiveDateTime,
}

impl From<&SchedulingRecord> for SchedulingRow {
    fn from(record: &SchedulingRecord) -> Self {
        Self {
            user_id: record.user_id.clone(),
            content_id: record.content_id.clone(),
            current_interval: record.current_interval,
            ease_factor: record.ease_factor,
            repetitions: record.repetitions,
            success_count: record.success_count,
            total_reviews: record.total_reviews,
            last_response_quality: record.last_response_quality,
            last_reviewed: record.last_reviewed.map(to_naive),
            next_review: to_naive(record.next_review()),
            created_at: to_naive(record.created_at),
        }
    }
}

impl From<SchedulingRow> for SchedulingRecord {
    fn from(row: SchedulingRow) -> Self {
        Self {
            user_id: row.user_id,
            content_id: row.content_id,
            current_interval: row.current_interval,
            ease_factor: row.ease_factor,
            repetitions: row.repetitions,
            success_count: row.success_count,
            total_reviews: row.total_reviews,
            last_response_quality: row.last_response_quality,
            last_reviewed: row.last_reviewed.map(from_naive),
            created_at: from_naive(row.created_at),
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = review_sessions)]
pub struct NewSessionRow<'a> {
    pub user_id: &'a str,
    pub content_id: &'a str,
    pub response_quality: i32,
    pub response_time: Option<f64>,
    pub exercise_type: &'a str,
    pub type_weight: f64,
    pub half_life: f64,
    pub next_review: NaiveDateTime,
    pub reviewed_at: NaiveDateTime,
}

impl<'a> From<&'a ReviewSession> for NewSessionRow<'a> {
    fn from(session: &'a ReviewSession) -> Self {
        Self {
            user_id: &session.user_id,
            content_id: &session.content_id,
            response_quality: session.response_quality,
            response_time: session.response_time,
            exercise_type: session.exercise_type.as_str(),
            type_weight: session.type_weight,
            half_life: session.half_life,
            next_review: to_naive(session.next_review),
            reviewed_at: to_naive(session.reviewed_at),
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = review_sessions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SessionRow {
    pub session_id: i32,
    pub user_id: String,
    pub content_id: String,
    pub response_quality: i32,
    pub response_time: Option<f64>,
    pub exercise_type: String,
    pub type_weight: f64,
    pub half_life: f64,
    pub next_review: NaiveDateTime,
    pub reviewed_at: NaiveDateTime,
}

impl SessionRow {
    pub fn into_session(self) -> ReviewSession {
        let exercise_type = ExerciseType::from_str(&self.exercise_type).unwrap_or_else(|_| {
            log::warn!(
                "Unknown exercise type {} on session {}",
                self.exercise_type,
                self.session_id
            );
            ExerciseType::default()
        });

        ReviewSession {
            user_id: self.user_id,
            content_id: self.content_id,
            response_quality: self.response_quality,
            response_time: self.response_time,
            exercise_type,
            type_weight: self.type_weight,
            half_life: self.half_life,
            next_review: from_naive(self.next_review),
            reviewed_at: from_naive(self.reviewed_at),
        }
    }
}
