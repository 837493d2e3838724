use crate::config::SchedulerConfig;
use crate::data::models::{ScheduleOutcome, SchedulingState, SrsError};

pub const MIN_QUALITY: i32 = 0;
pub const MAX_QUALITY: i32 = 5;

/// Rejects ratings outside 0..=5 instead of clamping them.
pub fn validate_quality(quality: i32) -> Result<usize, SrsError> {
    if (MIN_QUALITY..=MAX_QUALITY).contains(&quality) {
        Ok(quality as usize)
    } else {
        Err(SrsError::InvalidQuality(quality))
    }
}

/// One transition of the per-item scheduling state machine.
///
/// SM-2 style ease adjustment, with the HLR half-life anchoring the interval
/// once the item has been recalled before: the next review lands no earlier
/// than the point where predicted recall falls to the target probability.
///
/// Successes grow the interval and failures shrink it, except at the
/// configured bounds: a failure at `min_interval` or a success at
/// `max_interval` keeps the interval where it is.
pub fn schedule_next_review(
    config: &SchedulerConfig,
    quality: i32,
    half_life: f64,
    state: &SchedulingState,
) -> Result<ScheduleOutcome, SrsError> {
    let index = validate_quality(quality)?;

    let ease = if state.ease_factor.is_finite() {
        state.ease_factor
    } else {
        config.initial_ease_factor
    };
    let new_ease_factor = config.clamp_ease(ease + config.ease_adjustments[index]);

    let current = if state.current_interval.is_finite() && state.current_interval > 0.0 {
        state.current_interval
    } else {
        config.default_interval
    };

    let (interval, new_repetitions) = if config.is_success(quality) {
        let base = if state.repetitions <= 0 {
            config.initial_intervals[index]
        } else {
            let target_time = half_life * (1.0 / config.target_recall_probability).log2();
            target_time.max(current * new_ease_factor)
        };
        (base.max(current * config.min_growth_factor), state.repetitions.max(0) + 1)
    } else {
        (config.initial_intervals[index].min(current * config.lapse_factor), 0)
    };

    let new_interval = if interval.is_finite() {
        config.clamp_interval(interval)
    } else {
        log::warn!("Non-finite interval for quality {}, using default", quality);
        config.clamp_interval(config.default_interval)
    };

    Ok(ScheduleOutcome {
        new_interval,
        new_ease_factor,
        new_repetitions,
    })
}
