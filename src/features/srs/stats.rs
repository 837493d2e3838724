use std::collections::BTreeMap;

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::data::models::{
    DifficultyTrend, IntervalBreakdown, SchedulingRecord, UpcomingDay, UserStats,
};

const LEARNING_BELOW_HOURS: f64 = 24.0;
const YOUNG_BELOW_HOURS: f64 = 21.0 * 24.0;

pub fn summarize(records: &[SchedulingRecord], now: DateTime<Utc>) -> UserStats {
    if records.is_empty() {
        return UserStats::default();
    }

    let count = records.len() as f64;
    let tomorrow = now + Duration::days(1);
    let mut breakdown = IntervalBreakdown::default();

    for record in records {
        if record.total_reviews == 0 {
            breakdown.new += 1;
        } else if record.current_interval < LEARNING_BELOW_HOURS {
            breakdown.learning += 1;
        } else if record.current_interval < YOUNG_BELOW_HOURS {
            breakdown.young += 1;
        } else {
            breakdown.mature += 1;
        }
    }

    UserStats {
        total_items: records.len(),
        due_now: records.iter().filter(|r| r.is_due(now)).count(),
        due_within_day: records.iter().filter(|r| r.next_review() <= tomorrow).count(),
        avg_ease_factor: Some(records.iter().map(|r| r.ease_factor).sum::<f64>() / count),
        avg_interval: Some(records.iter().map(|r| r.current_interval).sum::<f64>() / count),
        total_reviews: records.iter().map(|r| i64::from(r.total_reviews)).sum(),
        total_successes: records.iter().map(|r| i64::from(r.success_count)).sum(),
        success_rate: records
            .iter()
            .map(|r| r.history().success_rate().unwrap_or(0.0))
            .sum::<f64>()
            / count,
        interval_breakdown: breakdown,
    }
}

/// Review batch size suited to how well the learner is doing.
pub fn optimal_batch_size(stats: &UserStats) -> usize {
    match stats.success_rate {
        rate if rate >= 0.8 => 25,
        rate if rate >= 0.6 => 20,
        rate if rate >= 0.4 => 15,
        _ => 10,
    }
}

/// Items due per calendar day, from today through `days - 1` days ahead.
pub fn upcoming_reviews(records: &[SchedulingRecord], now: DateTime<Utc>, days: u32) -> Vec<UpcomingDay> {
    let first = now.date_naive();
    let end = first
        .checked_add_signed(Duration::days(i64::from(days)))
        .unwrap_or(NaiveDate::MAX);
    let mut per_day: BTreeMap<_, usize> = BTreeMap::new();

    for record in records {
        let day = record.next_review().date_naive();
        if day >= first && day < end {
            *per_day.entry(day).or_default() += 1;
        }
    }

    per_day
        .into_iter()
        .map(|(review_date, items_due)| UpcomingDay {
            review_date,
            items_due,
        })
        .collect()
}

/// Success rate, ease and item count per content difficulty, easiest first.
///
/// Each entry pairs a record with its item's difficulty score.
pub fn performance_trends(records: &[(f64, SchedulingRecord)]) -> Vec<DifficultyTrend> {
    let mut sorted: Vec<&(f64, SchedulingRecord)> = records.iter().collect();
    sorted.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut trends: Vec<DifficultyTrend> = Vec::new();
    for (difficulty, record) in sorted {
        let success_rate = record.history().success_rate().unwrap_or(0.0);
        match trends.last_mut() {
            Some(trend) if trend.difficulty_score == *difficulty => {
                let n = trend.item_count as f64;
                trend.success_rate = (trend.success_rate * n + success_rate) / (n + 1.0);
                trend.avg_ease_factor = (trend.avg_ease_factor * n + record.ease_factor) / (n + 1.0);
                trend.item_count += 1;
            }
            _ => trends.push(DifficultyTrend {
                difficulty_score: *difficulty,
                success_rate,
                avg_ease_factor: record.ease_factor,
                item_count: 1,
            }),
        }
    }
    trends
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SchedulerConfig;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 10, 12, 0, 0).unwrap()
    }

    fn reviewed(content: &str, hours_ago: i64, interval: f64, successes: i32, total: i32) -> SchedulingRecord {
        let mut record = SchedulingRecord::fresh("u1", content, &SchedulerConfig::default(), now());
        record.last_reviewed = Some(now() - Duration::hours(hours_ago));
        record.current_interval = interval;
        record.success_count = successes;
        record.total_reviews = total;
        record
    }

    #[test]
    fn empty_history_has_default_stats() {
        let stats = summarize(&[], now());
        assert_eq!(stats.total_items, 0);
        assert_eq!(stats.avg_ease_factor, None);
        assert_eq!(optimal_batch_size(&stats), 10);
    }

    #[test]
    fn summary_counts_due_items_and_groups() {
        let config = SchedulerConfig::default();
        let records = vec![
            SchedulingRecord::fresh("u1", "new", &config, now()),
            reviewed("learning", 10, 6.0, 1, 1),
            reviewed("young", 1, 48.0, 3, 4),
            reviewed("mature", 1, 600.0, 9, 10),
        ];
        let stats = summarize(&records, now());

        assert_eq!(stats.total_items, 4);
        assert_eq!(stats.due_now, 2);
        assert_eq!(stats.due_within_day, 2);
        assert_eq!(stats.total_reviews, 15);
        assert_eq!(stats.total_successes, 13);
        assert_eq!(
            stats.interval_breakdown,
            IntervalBreakdown {
                new: 1,
                learning: 1,
                young: 1,
                mature: 1
            }
        );
    }

    #[test]
    fn batch_size_tracks_success_rate() {
        let strong = UserStats {
            success_rate: 0.85,
            ..UserStats::default()
        };
        let shaky = UserStats {
            success_rate: 0.45,
            ..UserStats::default()
        };
        assert_eq!(optimal_batch_size(&strong), 25);
        assert_eq!(optimal_batch_size(&shaky), 15);
    }

    #[test]
    fn huge_day_window_does_not_overflow() {
        let records = vec![reviewed("a", 0, 48.0, 1, 1)];
        let days = upcoming_reviews(&records, now(), u32::MAX);
        assert_eq!(days.len(), 1);
        assert_eq!(days[0].items_due, 1);
    }

    #[test]
    fn trends_group_by_difficulty_ascending() {
        let mut shaky = reviewed("b", 1, 6.0, 1, 4);
        shaky.ease_factor = 1.5;
        let records = vec![
            (7.0, shaky),
            (2.0, reviewed("a", 1, 48.0, 4, 4)),
            (7.0, reviewed("c", 1, 48.0, 3, 4)),
            (7.0, SchedulingRecord::fresh("u1", "d", &SchedulerConfig::default(), now())),
        ];
        let trends = performance_trends(&records);

        assert_eq!(trends.len(), 2);
        assert_eq!(trends[0].difficulty_score, 2.0);
        assert_eq!(trends[0].item_count, 1);
        assert_eq!(trends[0].success_rate, 1.0);

        let hard = &trends[1];
        assert_eq!(hard.item_count, 3);
        assert!((hard.success_rate - (0.25 + 0.75 + 0.0) / 3.0).abs() < 1e-9);
        assert!((hard.avg_ease_factor - (1.5 + 2.5 + 2.5) / 3.0).abs() < 1e-9);
    }

    #[test]
    fn upcoming_groups_by_day() {
        let records = vec![
            reviewed("a", 0, 13.0, 1, 1), // tomorrow 01:00
            reviewed("b", 0, 14.0, 1, 1), // tomorrow 02:00
            reviewed("c", 0, 2.0, 1, 1),  // today
            reviewed("d", 0, 24.0 * 9.0, 1, 1),
        ];
        let days = upcoming_reviews(&records, now(), 7);

        assert_eq!(days.len(), 2);
        assert_eq!(days[0].review_date, now().date_naive());
        assert_eq!(days[0].items_due, 1);
        assert_eq!(days[1].items_due, 2);
    }
}
