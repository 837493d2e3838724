use crate::config::SchedulerConfig;
use crate::data::models::{RecallEstimate, Recommendation};

/// Forgetting curve `p = 2^(-t/h)` with the review recommendation it implies.
pub fn get_recall_probability(
    config: &SchedulerConfig,
    half_life: f64,
    hours_elapsed: f64,
) -> RecallEstimate {
    // Clock skew can report a review in the future
    let elapsed = if hours_elapsed.is_nan() { 0.0 } else { hours_elapsed.max(0.0) };

    let probability = if half_life.is_finite() && half_life > 0.0 {
        2f64.powf(-elapsed / half_life).clamp(0.0, 1.0)
    } else {
        0.0
    };

    RecallEstimate {
        probability,
        recommendation: recommend(config, probability),
    }
}

pub fn recommend(config: &SchedulerConfig, probability: f64) -> Recommendation {
    if probability < config.review_now_below {
        Recommendation::ReviewNow
    } else if probability < config.review_soon_below {
        Recommendation::ReviewSoon
    } else {
        Recommendation::ReviewLater
    }
}
