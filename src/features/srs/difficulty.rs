use crate::data::models::{
    AdjustmentConfidence, AdjustmentReason, ContentPerformance, DifficultyAdjustment,
    SchedulingRecord,
};

const MIN_ATTEMPTS: usize = 5;
const HIGH_CONFIDENCE_ATTEMPTS: usize = 20;

/// Suggests moving an item's difficulty score from how all learners fare on it.
pub fn assess_difficulty(records: &[SchedulingRecord]) -> DifficultyAdjustment {
    let reviewed: Vec<&SchedulingRecord> = records.iter().filter(|r| r.total_reviews > 0).collect();

    if reviewed.len() < MIN_ATTEMPTS {
        return DifficultyAdjustment {
            adjustment: 0,
            confidence: AdjustmentConfidence::Low,
            reason: AdjustmentReason::InsufficientData,
            stats: None,
        };
    }

    let count = reviewed.len() as f64;
    let qualities: Vec<f64> = reviewed
        .iter()
        .filter_map(|r| r.last_response_quality)
        .map(f64::from)
        .collect();
    let avg_quality = if qualities.is_empty() {
        3.0
    } else {
        qualities.iter().sum::<f64>() / qualities.len() as f64
    };
    let avg_ease_factor = reviewed.iter().map(|r| r.ease_factor).sum::<f64>() / count;
    let avg_success_rate = reviewed
        .iter()
        .filter_map(|r| r.history().success_rate())
        .sum::<f64>()
        / count;

    let (adjustment, reason) = if avg_quality > 4.2 && avg_success_rate > 0.9 {
        (1, AdjustmentReason::TooEasy)
    } else if avg_quality < 2.5 && avg_success_rate < 0.4 {
        (-1, AdjustmentReason::TooHard)
    } else {
        (0, AdjustmentReason::Optimal)
    };

    let confidence = if reviewed.len() >= HIGH_CONFIDENCE_ATTEMPTS {
        AdjustmentConfidence::High
    } else {
        AdjustmentConfidence::Medium
    };

    DifficultyAdjustment {
        adjustment,
        confidence,
        reason,
        stats: Some(ContentPerformance {
            avg_quality,
            avg_ease_factor,
            avg_success_rate,
            total_attempts: reviewed.len(),
        }),
    }
}
