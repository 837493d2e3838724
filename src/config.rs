use serde::{Deserialize, Serialize};

/// Tunable constants of the HLR model and the review scheduler.
///
/// Passed explicitly to every scheduling function; there is no global instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    pub initial_ease_factor: f64,
    pub min_ease_factor: f64,
    pub max_ease_factor: f64,
    /// Ease delta indexed by response quality (0..=5).
    pub ease_adjustments: [f64; 6],
    /// Interval in hours used for a first success, or as the ceiling after a failure.
    pub initial_intervals: [f64; 6],
    /// Quality at or above which a response counts as recalled.
    pub success_threshold: i32,
    pub target_recall_probability: f64,
    /// Minimum growth applied to the interval after a success.
    pub min_growth_factor: f64,
    /// Maximum fraction of the interval kept after a failure.
    pub lapse_factor: f64,
    pub min_interval: f64,
    pub max_interval: f64,
    /// Interval of a record that has never been reviewed.
    pub default_interval: f64,
    /// Difficulty used when the catalog has no score for an item.
    pub default_difficulty: f64,
    /// Gheg Albanian language difficulty multiplier on the half-life.
    pub language_difficulty_multiplier: f64,
    pub review_now_below: f64,
    pub review_soon_below: f64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            initial_ease_factor: 2.5,
            min_ease_factor: 1.3,
            max_ease_factor: 4.0,
            ease_adjustments: [-0.8, -0.8, -0.15, 0.0, 0.1, 0.15],
            initial_intervals: [1.0, 1.0, 6.0, 24.0, 72.0, 168.0],
            success_threshold: 3,
            target_recall_probability: 0.8,
            min_growth_factor: 1.2,
            lapse_factor: 0.5,
            min_interval: 10.0 / 60.0,
            max_interval: 30.0 * 24.0,
            default_interval: 24.0,
            default_difficulty: 5.0,
            language_difficulty_multiplier: 1.2,
            review_now_below: 0.7,
            review_soon_below: 0.85,
        }
    }
}

impl SchedulerConfig {
    pub fn clamp_ease(&self, ease: f64) -> f64 {
        ease.clamp(self.min_ease_factor, self.max_ease_factor)
    }

    pub fn clamp_interval(&self, hours: f64) -> f64 {
        hours.clamp(self.min_interval, self.max_interval)
    }

    pub fn is_success(&self, quality: i32) -> bool {
        quality >= self.success_threshold
    }
}

/// Process-level settings read from the environment (and `.env` when present).
#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub queue_limit: usize,
    pub pool_size: u32,
}

impl Settings {
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();

        let database_url =
            std::env::var("DATABASE_URL").unwrap_or_else(|_| "srs.db".into());
        let queue_limit = env_or("SRS_QUEUE_LIMIT", 20);
        let pool_size = env_or("SRS_POOL_SIZE", 4);

        Self {
            database_url,
            queue_limit,
            pool_size,
        }
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            log::warn!("Ignoring unparsable {}={}", key, raw);
            default
        }),
        Err(_) => default,
    }
}
