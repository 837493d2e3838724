use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use crate::config::SchedulerConfig;
use crate::data::models::{ContentDisplay, RecallQueueItem, SchedulingRecord};
use crate::features::srs::half_life::calculate_half_life;
use crate::features::srs::recall::get_recall_probability;

/// Scores one due record against the forgetting curve.
pub fn build_queue_item(
    config: &SchedulerConfig,
    record: &SchedulingRecord,
    difficulty: f64,
    display: Option<ContentDisplay>,
    now: DateTime<Utc>,
) -> RecallQueueItem {
    let estimate = calculate_half_life(config, &record.history(), difficulty);
    let time_since_review = record.hours_since_review(now);
    let recall = get_recall_probability(config, estimate.half_life, time_since_review);

    RecallQueueItem {
        content_id: record.content_id.clone(),
        recall_probability: recall.probability,
        recommendation: recall.recommendation,
        half_life: estimate.half_life,
        time_since_review,
        next_review: record.next_review(),
        current_interval: record.current_interval,
        ease_factor: record.ease_factor,
        repetitions: record.repetitions,
        display,
    }
}

/// Most urgent first: recommendation, then lowest recall, then oldest due date.
pub fn rank_queue(items: &mut [RecallQueueItem]) {
    items.sort_by(compare_urgency);
}

fn compare_urgency(a: &RecallQueueItem, b: &RecallQueueItem) -> Ordering {
    a.recommendation
        .cmp(&b.recommendation)
        .then_with(|| a.recall_probability.total_cmp(&b.recall_probability))
        .then_with(|| a.next_review.cmp(&b.next_review))
}
