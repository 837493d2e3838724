use chrono::{DateTime, Utc};
use validator::Validate;

use crate::config::SchedulerConfig;
use crate::data::models::{
    BatchReview, BatchReviewResult, DifficultyAdjustment, DifficultyTrend, PerformanceSummary, RecallQueueItem,
    RecordLookup, ResponseData, ResponseOutcome, ReviewSession, ReviewTarget, SchedulingRecord,
    SpacedRepetitionUpdate, SrsError, UpcomingDay, UserStats,
};
use crate::data::repositories::{ContentCatalog, SrsStore};
use crate::features::srs::difficulty::assess_difficulty;
use crate::features::srs::half_life::calculate_half_life;
use crate::features::srs::queue::{build_queue_item, rank_queue};
use crate::features::srs::scheduler::{schedule_next_review, validate_quality};
use crate::features::srs::stats;

/// Ties the estimator, predictor and scheduler to a store.
pub struct SrsService<S> {
    store: S,
    config: SchedulerConfig,
}

impl<S> SrsService<S>
where
    S: SrsStore + ContentCatalog,
{
    pub fn new(store: S) -> Self {
        Self::with_config(store, SchedulerConfig::default())
    }

    pub fn with_config(store: S, config: SchedulerConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn process_user_response(
        &mut self,
        user_id: &str,
        content_id: &str,
        response: &ResponseData,
    ) -> Result<ResponseOutcome, SrsError> {
        self.process_user_response_at(user_id, content_id, response, Utc::now())
    }

    /// Records one response: reschedules the item and logs the session, atomically.
    pub fn process_user_response_at(
        &mut self,
        user_id: &str,
        content_id: &str,
        response: &ResponseData,
        now: DateTime<Utc>,
    ) -> Result<ResponseOutcome, SrsError> {
        validate_quality(response.quality)?;
        let target = ReviewTarget::new(user_id, content_id);
        target.validate()?;
        response.validate()?;

        let config = &self.config;
        let outcome = self
            .store
            .atomically(|store| apply_response(store, config, &target, response, now))
            .map_err(|e| {
                log::error!(
                    "Failed to record response for user {} on {}: {}",
                    target.user_id,
                    target.content_id,
                    e
                );
                e
            })?;

        log::info!(
            "User {} answered {} with quality {}, next review in {:.1}h",
            target.user_id,
            target.content_id,
            response.quality,
            outcome.spaced_repetition.scheduling.new_interval
        );

        Ok(outcome)
    }

    /// Flashcard response without session details; returns the scheduling part.
    pub fn update_user_performance(
        &mut self,
        user_id: &str,
        content_id: &str,
        quality: i32,
        response_time: Option<f64>,
    ) -> Result<SpacedRepetitionUpdate, SrsError> {
        let response = ResponseData {
            quality,
            time: response_time,
            ..ResponseData::default()
        };
        self.process_user_response(user_id, content_id, &response)
            .map(|outcome| outcome.spaced_repetition)
    }

    pub fn get_review_queue(&mut self, user_id: &str, limit: usize) -> Result<Vec<RecallQueueItem>, SrsError> {
        self.get_review_queue_at(user_id, limit, Utc::now())
    }

    /// Due items ranked by urgency, at most `limit` of them.
    pub fn get_review_queue_at(
        &mut self,
        user_id: &str,
        limit: usize,
        now: DateTime<Utc>,
    ) -> Result<Vec<RecallQueueItem>, SrsError> {
        require_user(user_id)?;

        let due = self.store.list_due_records(user_id, now)?;
        let mut items = Vec::with_capacity(due.len());
        for record in &due {
            let difficulty = self.content_difficulty(&record.content_id)?;
            let display = self.store.display(&record.content_id)?;
            items.push(build_queue_item(&self.config, record, difficulty, display, now));
        }

        rank_queue(&mut items);
        items.truncate(limit);

        log::debug!("Review queue for {}: {} of {} due items", user_id, items.len(), due.len());
        Ok(items)
    }

    pub fn get_difficulty_adjustment(&mut self, content_id: &str) -> Result<DifficultyAdjustment, SrsError> {
        let records = self.store.list_content_records(content_id)?;
        Ok(assess_difficulty(&records))
    }

    pub fn initialize_content(&mut self, user_id: &str, content_ids: &[&str]) -> Result<usize, SrsError> {
        self.initialize_content_at(user_id, content_ids, Utc::now())
    }

    /// Creates due-now records for items the learner has not met yet.
    pub fn initialize_content_at(
        &mut self,
        user_id: &str,
        content_ids: &[&str],
        now: DateTime<Utc>,
    ) -> Result<usize, SrsError> {
        require_user(user_id)?;

        let config = &self.config;
        let created = self.store.atomically(|store| {
            let mut created = 0;
            for content_id in content_ids {
                if let RecordLookup::Absent = store.get_record(user_id, content_id)? {
                    store.upsert_record(&SchedulingRecord::fresh(user_id, content_id, config, now))?;
                    created += 1;
                }
            }
            Ok(created)
        })?;

        log::info!("Initialized {} new items for user {}", created, user_id);
        Ok(created)
    }

    pub fn reset_item(&mut self, user_id: &str, content_id: &str) -> Result<Option<SchedulingRecord>, SrsError> {
        self.reset_item_at(user_id, content_id, Utc::now())
    }

    /// Starts a tracked item over; `None` when the learner has no record for it.
    pub fn reset_item_at(
        &mut self,
        user_id: &str,
        content_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<SchedulingRecord>, SrsError> {
        let target = ReviewTarget::new(user_id, content_id);
        target.validate()?;

        let config = &self.config;
        let reset = self.store.atomically(|store| {
            match store.get_record(&target.user_id, &target.content_id)? {
                RecordLookup::Found(_) => {
                    let record = SchedulingRecord::fresh(&target.user_id, &target.content_id, config, now);
                    store.upsert_record(&record)?;
                    Ok(Some(record))
                }
                RecordLookup::Absent => Ok(None),
            }
        })?;

        match &reset {
            Some(_) => log::info!("Reset {} for user {}", target.content_id, target.user_id),
            None => log::warn!("No record to reset for user {} on {}", target.user_id, target.content_id),
        }
        Ok(reset)
    }

    pub fn batch_review(&mut self, user_id: &str, reviews: &[BatchReview]) -> Vec<BatchReviewResult> {
        self.batch_review_at(user_id, reviews, Utc::now())
    }

    /// Applies each review independently; one failure does not stop the rest.
    pub fn batch_review_at(
        &mut self,
        user_id: &str,
        reviews: &[BatchReview],
        now: DateTime<Utc>,
    ) -> Vec<BatchReviewResult> {
        reviews
            .iter()
            .map(|review| {
                let response = ResponseData {
                    quality: review.quality,
                    time: review.time,
                    exercise_type: review.exercise_type,
                };
                match self.process_user_response_at(user_id, &review.content_id, &response, now) {
                    Ok(outcome) => BatchReviewResult {
                        content_id: review.content_id.clone(),
                        success: true,
                        outcome: Some(outcome),
                        error: None,
                    },
                    Err(e) => {
                        log::warn!("Batch review of {} failed: {}", review.content_id, e);
                        BatchReviewResult {
                            content_id: review.content_id.clone(),
                            success: false,
                            outcome: None,
                            error: Some(e.to_string()),
                        }
                    }
                }
            })
            .collect()
    }

    pub fn get_stats(&mut self, user_id: &str) -> Result<UserStats, SrsError> {
        self.get_stats_at(user_id, Utc::now())
    }

    pub fn get_stats_at(&mut self, user_id: &str, now: DateTime<Utc>) -> Result<UserStats, SrsError> {
        require_user(user_id)?;
        let records = self.store.list_user_records(user_id)?;
        Ok(stats::summarize(&records, now))
    }

    pub fn optimal_batch_size(&mut self, user_id: &str) -> Result<usize, SrsError> {
        let stats = self.get_stats(user_id)?;
        Ok(stats::optimal_batch_size(&stats))
    }

    pub fn upcoming_reviews(&mut self, user_id: &str, days: u32) -> Result<Vec<UpcomingDay>, SrsError> {
        self.upcoming_reviews_at(user_id, days, Utc::now())
    }

    pub fn upcoming_reviews_at(
        &mut self,
        user_id: &str,
        days: u32,
        now: DateTime<Utc>,
    ) -> Result<Vec<UpcomingDay>, SrsError> {
        require_user(user_id)?;
        let records = self.store.list_user_records(user_id)?;
        Ok(stats::upcoming_reviews(&records, now, days))
    }

    /// Performance grouped by content difficulty; items missing from the catalog are left out.
    pub fn performance_trends(&mut self, user_id: &str) -> Result<Vec<DifficultyTrend>, SrsError> {
        require_user(user_id)?;

        let records = self.store.list_user_records(user_id)?;
        let mut scored = Vec::with_capacity(records.len());
        for record in records {
            if let Some(difficulty) = self.store.difficulty(&record.content_id)? {
                scored.push((difficulty, record));
            }
        }
        Ok(stats::performance_trends(&scored))
    }

    fn content_difficulty(&mut self, content_id: &str) -> Result<f64, SrsError> {
        Ok(self
            .store
            .difficulty(content_id)?
            .unwrap_or(self.config.default_difficulty))
    }
}

fn apply_response<S>(
    store: &mut S,
    config: &SchedulerConfig,
    target: &ReviewTarget,
    response: &ResponseData,
    now: DateTime<Utc>,
) -> Result<ResponseOutcome, SrsError>
where
    S: SrsStore + ContentCatalog,
{
    let mut record = match store.get_record(&target.user_id, &target.content_id)? {
        RecordLookup::Found(record) => record,
        RecordLookup::Absent => {
            log::debug!(
                "No history for user {} on {}, starting fresh",
                target.user_id,
                target.content_id
            );
            SchedulingRecord::fresh(&target.user_id, &target.content_id, config, now)
        }
    };

    let difficulty = store
        .difficulty(&target.content_id)?
        .unwrap_or(config.default_difficulty);
    let estimate = calculate_half_life(config, &record.history(), difficulty);
    let scheduling = schedule_next_review(config, response.quality, estimate.half_life, &record.state())?;

    let improved_retention = config.is_success(response.quality);
    record.apply_review(response.quality, improved_retention, &scheduling, now);
    let next_review = record.next_review();

    let session = ReviewSession {
        user_id: target.user_id.clone(),
        content_id: target.content_id.clone(),
        response_quality: response.quality,
        response_time: response.time,
        exercise_type: response.exercise_type,
        type_weight: response.exercise_type.weight(),
        half_life: estimate.half_life,
        next_review,
        reviewed_at: now,
    };

    store.upsert_record(&record)?;
    store.insert_session(&session)?;

    Ok(ResponseOutcome {
        success: true,
        spaced_repetition: SpacedRepetitionUpdate {
            record,
            next_review,
            half_life: estimate.half_life,
            confidence: estimate.confidence,
            scheduling,
        },
        session,
        performance: PerformanceSummary {
            quality: response.quality,
            time: response.time,
            exercise_type: response.exercise_type,
            improved_retention,
        },
    })
}

fn require_user(user_id: &str) -> Result<(), SrsError> {
    if user_id.trim().is_empty() {
        return Err(SrsError::Validation("user id is required".into()));
    }
    Ok(())
}
