//! Half-Life Regression estimate of how long a learner keeps an item.
//!
//! Memory strength is modelled as exponential decay; the half-life is the
//! number of hours after which recall probability drops to one half. Practice
//! and success lengthen it, intrinsic difficulty shortens it.

use crate::config::SchedulerConfig;
use crate::data::models::{HalfLifeEstimate, PerformanceHistory};

const HOURS_PER_DAY: f64 = 24.0;
const NEUTRAL_DIFFICULTY: f64 = 5.0;
const DIFFICULTY_STEP: f64 = 0.1;
const REPETITION_GROWTH: f64 = 1.3;
const MAX_COUNTED_REPETITIONS: i32 = 10;
const REVIEWS_FOR_FULL_CONFIDENCE: f64 = 10.0;
/// Success rate assumed for an item with no reviews yet.
const PRIOR_SUCCESS_RATE: f64 = 0.0;

/// Estimates the half-life of `history` on content of the given difficulty.
///
/// A history with at least one success never scores below a fresh item of
/// the same difficulty, even when lapses have pushed its ease factor down.
pub fn calculate_half_life(
    config: &SchedulerConfig,
    history: &PerformanceHistory,
    content_difficulty: f64,
) -> HalfLifeEstimate {
    let ease = if history.ease_factor.is_finite() {
        config.clamp_ease(history.ease_factor)
    } else {
        config.initial_ease_factor
    };

    let difficulty = normalize_difficulty(config, content_difficulty);
    let success_rate = history
        .success_rate()
        .map(|rate| rate.clamp(0.0, 1.0))
        .unwrap_or(PRIOR_SUCCESS_RATE);

    let mut raw = raw_half_life(config, ease, difficulty, success_rate, history.repetitions);
    if history.success_count > 0 {
        let fresh = raw_half_life(config, config.initial_ease_factor, difficulty, PRIOR_SUCCESS_RATE, 0);
        raw = raw.max(fresh);
    }

    let half_life = if raw.is_finite() {
        config.clamp_interval(raw)
    } else {
        config.min_interval
    };

    HalfLifeEstimate {
        half_life,
        confidence: confidence(history.total_reviews),
    }
}

fn raw_half_life(
    config: &SchedulerConfig,
    ease: f64,
    difficulty: f64,
    success_rate: f64,
    repetitions: i32,
) -> f64 {
    let difficulty_multiplier = 1.0 - (difficulty - NEUTRAL_DIFFICULTY) * DIFFICULTY_STEP;
    let performance_multiplier = 0.5 + success_rate * 1.5;
    let repetition_multiplier = REPETITION_GROWTH.powi(repetitions.clamp(0, MAX_COUNTED_REPETITIONS));

    ease * HOURS_PER_DAY
        * difficulty_multiplier
        * performance_multiplier
        * repetition_multiplier
        * config.language_difficulty_multiplier
}

/// Clamps a catalog difficulty to 0-10; unusable scores fall back to the default.
pub fn normalize_difficulty(config: &SchedulerConfig, content_difficulty: f64) -> f64 {
    if content_difficulty.is_finite() {
        content_difficulty.clamp(0.0, 10.0)
    } else {
        config.default_difficulty
    }
}

fn confidence(total_reviews: i32) -> f64 {
    (f64::from(total_reviews.max(0)) / REVIEWS_FOR_FULL_CONFIDENCE).min(1.0)
}
