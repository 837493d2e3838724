use chrono::{DateTime, Duration, TimeZone, Utc};

use gheg_srs::data::models::{
    BatchReview, ContentDisplay, LessonContent, ReviewSession, StoreError,
};
use gheg_srs::{
    calculate_half_life, ContentCatalog, ExerciseType, MemoryStore, PerformanceHistory,
    Recommendation, RecordLookup, ResponseData, SchedulerConfig, SchedulingRecord, SrsError,
    SrsService, SrsStore,
};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 9, 14, 18, 30, 0).unwrap()
}

fn content(id: &str, english: &str, target: &str, difficulty: f64) -> LessonContent {
    LessonContent {
        id: id.to_string(),
        english_phrase: english.to_string(),
        target_phrase: target.to_string(),
        pronunciation_guide: None,
        cultural_context: None,
        difficulty_score: difficulty,
    }
}

fn seeded_store() -> MemoryStore {
    let mut store = MemoryStore::new();
    store.add_content(content("greeting_1", "Good morning", "Mirëmëngjes", 3.0));
    store.add_content(content("thanks_1", "Thank you", "Faleminderit", 4.0));
    store.add_content(content("water_1", "Water", "Ujë", 2.0));
    store
}

fn response(quality: i32, exercise_type: ExerciseType) -> ResponseData {
    ResponseData {
        quality,
        time: Some(3.2),
        exercise_type,
    }
}

/// A record last reviewed `hours_ago` with a 24h interval and one success.
fn reviewed_record(content_id: &str, hours_ago: f64) -> SchedulingRecord {
    let config = SchedulerConfig::default();
    let mut record = SchedulingRecord::fresh("learner", content_id, &config, now() - Duration::days(7));
    record.last_reviewed = Some(now() - Duration::seconds((hours_ago * 3600.0) as i64));
    record.current_interval = 24.0;
    record.repetitions = 1;
    record.success_count = 1;
    record.total_reviews = 1;
    record.last_response_quality = Some(4);
    record
}

#[test]
fn responses_accumulate_on_one_record() {
    let mut service = SrsService::new(seeded_store());

    let first = service
        .process_user_response_at("learner", "greeting_1", &response(4, ExerciseType::Conversation), now())
        .unwrap();
    assert!(first.success);
    assert_eq!(first.spaced_repetition.record.total_reviews, 1);
    assert_eq!(first.session.exercise_type, ExerciseType::Conversation);
    assert_eq!(first.session.type_weight, 1.5);
    assert_eq!(first.performance.quality, 4);
    assert!(first.performance.improved_retention);

    let json = serde_json::to_value(&first).unwrap();
    assert_eq!(json["session"]["exercise_type"], "conversation");

    let later = now() + Duration::hours(30);
    let second = service
        .process_user_response_at("learner", "greeting_1", &response(2, ExerciseType::Flashcard), later)
        .unwrap();
    assert_eq!(second.spaced_repetition.record.total_reviews, 2);
    assert_eq!(second.spaced_repetition.record.success_count, 1);
    assert_eq!(second.spaced_repetition.record.repetitions, 0);
    assert!(!second.performance.improved_retention);

    let store = service.store();
    assert_eq!(store.sessions().len(), 2);
    assert_eq!(store.record("learner", "greeting_1").unwrap().total_reviews, 2);
}

#[test]
fn next_review_is_interval_after_response() {
    let mut service = SrsService::new(seeded_store());
    let outcome = service
        .process_user_response_at("learner", "thanks_1", &response(5, ExerciseType::Audio), now())
        .unwrap();

    let update = &outcome.spaced_repetition;
    let expected = now() + Duration::milliseconds((update.scheduling.new_interval * 3_600_000.0).round() as i64);
    assert!((update.next_review - expected).num_milliseconds().abs() <= 1);
    assert_eq!(outcome.session.next_review, update.next_review);
    assert_eq!(update.record.last_reviewed, Some(now()));
    assert!(update.scheduling.new_interval > 24.0);
}

#[test]
fn update_user_performance_returns_scheduling_only() {
    let mut service = SrsService::new(seeded_store());
    let update = service
        .update_user_performance("learner", "water_1", 1, None)
        .unwrap();

    assert_eq!(update.record.repetitions, 0);
    assert!(update.scheduling.new_interval <= 1.0);
    assert_eq!(service.store().sessions()[0].exercise_type, ExerciseType::Flashcard);
}

#[test]
fn invalid_quality_writes_nothing() {
    let mut service = SrsService::new(seeded_store());

    for quality in [-1, 6, 42] {
        let err = service
            .process_user_response_at("learner", "greeting_1", &response(quality, ExerciseType::Flashcard), now())
            .unwrap_err();
        assert!(matches!(err, SrsError::InvalidQuality(q) if q == quality));
        assert!(err.is_validation());
    }

    let err = service
        .update_user_performance("learner", "greeting_1", 6, None)
        .unwrap_err();
    assert!(matches!(err, SrsError::InvalidQuality(6)));

    let store = service.store();
    assert!(store.sessions().is_empty());
    assert!(store.record("learner", "greeting_1").is_none());
}

#[test]
fn blank_identifiers_and_negative_time_are_rejected() {
    let mut service = SrsService::new(seeded_store());

    let blank_user = service.process_user_response_at("  ", "greeting_1", &response(4, ExerciseType::Flashcard), now());
    assert!(matches!(blank_user, Err(SrsError::Validation(_))));

    let blank_content = service.process_user_response_at("learner", "", &response(4, ExerciseType::Flashcard), now());
    assert!(matches!(blank_content, Err(SrsError::Validation(_))));

    let negative = ResponseData {
        quality: 4,
        time: Some(-2.0),
        exercise_type: ExerciseType::Visual,
    };
    let negative_time = service.process_user_response_at("learner", "greeting_1", &negative, now());
    assert!(matches!(negative_time, Err(SrsError::Validation(_))));

    assert!(service.store().sessions().is_empty());
}

#[test]
fn queue_holds_only_due_items_most_urgent_first() {
    let mut store = seeded_store();
    store.upsert_record(&reviewed_record("greeting_1", 26.0)).unwrap(); // due 2h ago
    store.upsert_record(&reviewed_record("thanks_1", 24.0 + 10.0 / 60.0)).unwrap(); // due 10 min ago
    store.upsert_record(&reviewed_record("water_1", 22.0)).unwrap(); // due in 2h

    let mut service = SrsService::new(store);
    let queue = service.get_review_queue_at("learner", 20, now()).unwrap();

    let ids: Vec<_> = queue.iter().map(|item| item.content_id.as_str()).collect();
    assert_eq!(ids.len(), 2);
    assert!(!ids.contains(&"water_1"));
    assert!(queue[0].recall_probability <= queue[1].recall_probability);
    assert!(queue[0].recommendation <= queue[1].recommendation);

    let display = queue[0].display.as_ref().unwrap();
    assert!(!display.target_phrase.is_empty());
}

#[test]
fn queue_respects_limit_and_unknown_user() {
    let mut store = seeded_store();
    for id in ["greeting_1", "thanks_1", "water_1"] {
        store.upsert_record(&reviewed_record(id, 100.0)).unwrap();
    }
    let mut service = SrsService::new(store);

    assert_eq!(service.get_review_queue_at("learner", 2, now()).unwrap().len(), 2);
    assert!(service.get_review_queue_at("stranger", 20, now()).unwrap().is_empty());
}

#[test]
fn long_overdue_item_is_reviewed_now() {
    let mut store = seeded_store();
    store.upsert_record(&reviewed_record("greeting_1", 24.0 * 20.0)).unwrap();
    let mut service = SrsService::new(store);

    let queue = service.get_review_queue_at("learner", 20, now()).unwrap();
    assert_eq!(queue[0].recommendation, Recommendation::ReviewNow);
    assert!(queue[0].recall_probability < 0.7);
}

#[test]
fn initialize_skips_known_items_and_reset_starts_over() {
    let mut service = SrsService::new(seeded_store());
    service
        .process_user_response_at("learner", "greeting_1", &response(5, ExerciseType::Flashcard), now())
        .unwrap();

    let created = service
        .initialize_content_at("learner", &["greeting_1", "thanks_1", "water_1"], now())
        .unwrap();
    assert_eq!(created, 2);
    assert_eq!(service.store().record("learner", "greeting_1").unwrap().total_reviews, 1);

    let due = service.get_review_queue_at("learner", 20, now()).unwrap();
    assert_eq!(due.len(), 2);

    let reset = service.reset_item_at("learner", "greeting_1", now()).unwrap().unwrap();
    assert_eq!(reset.total_reviews, 0);
    assert_eq!(reset.ease_factor, 2.5);
    assert!(reset.is_due(now()));
    assert_eq!(service.store().sessions().len(), 1);
}

#[test]
fn reset_of_untracked_item_creates_nothing() {
    let mut service = SrsService::new(seeded_store());
    assert_eq!(service.reset_item_at("learner", "water_1", now()).unwrap(), None);
    assert!(service.store().record("learner", "water_1").is_none());
}

#[test]
fn mixed_history_keeps_at_least_a_fresh_half_life() {
    let config = SchedulerConfig::default();
    let mut service = SrsService::new(seeded_store());

    let mut at = now();
    for quality in [3, 3, 1, 1, 3] {
        service
            .process_user_response_at("learner", "greeting_1", &response(quality, ExerciseType::Flashcard), at)
            .unwrap();
        at = at + Duration::hours(12);
    }

    let history = service.store().record("learner", "greeting_1").unwrap().history();
    assert_eq!(history.total_reviews, 5);
    assert_eq!(history.success_count, 3);

    let fresh = calculate_half_life(&config, &PerformanceHistory::default(), 5.0);
    let seasoned = calculate_half_life(&config, &history, 5.0);
    assert!(seasoned.half_life >= fresh.half_life);
}

#[test]
fn trends_follow_catalog_difficulty() {
    let mut service = SrsService::new(seeded_store());
    for (content_id, quality) in [("water_1", 5), ("greeting_1", 1), ("thanks_1", 4)] {
        service
            .process_user_response_at("learner", content_id, &response(quality, ExerciseType::Flashcard), now())
            .unwrap();
    }
    service
        .process_user_response_at("learner", "not_in_catalog", &response(5, ExerciseType::Flashcard), now())
        .unwrap();

    let trends = service.performance_trends("learner").unwrap();
    let levels: Vec<_> = trends.iter().map(|t| t.difficulty_score).collect();
    assert_eq!(levels, vec![2.0, 3.0, 4.0]);
    assert_eq!(trends[0].success_rate, 1.0);
    assert_eq!(trends[1].success_rate, 0.0);
    assert!(trends.iter().all(|t| t.item_count == 1));
}

#[test]
fn batch_review_reports_each_item() {
    let mut service = SrsService::new(seeded_store());
    let reviews = vec![
        BatchReview {
            content_id: "greeting_1".into(),
            quality: 4,
            time: Some(2.0),
            exercise_type: ExerciseType::Flashcard,
        },
        BatchReview {
            content_id: "thanks_1".into(),
            quality: 9,
            time: None,
            exercise_type: ExerciseType::Audio,
        },
        BatchReview {
            content_id: "water_1".into(),
            quality: 0,
            time: None,
            exercise_type: ExerciseType::Visual,
        },
    ];

    let results = service.batch_review_at("learner", &reviews, now());
    assert_eq!(results.len(), 3);
    assert!(results[0].success && results[0].outcome.is_some());
    assert!(!results[1].success);
    assert!(results[1].error.as_deref().unwrap().contains('9'));
    assert!(results[2].success);
    assert_eq!(service.store().sessions().len(), 2);
}

#[test]
fn stats_and_upcoming_cover_all_records() {
    let mut service = SrsService::new(seeded_store());
    service
        .initialize_content_at("learner", &["greeting_1", "thanks_1"], now())
        .unwrap();
    service
        .process_user_response_at("learner", "water_1", &response(5, ExerciseType::Flashcard), now())
        .unwrap();

    let stats = service.get_stats_at("learner", now()).unwrap();
    assert_eq!(stats.total_items, 3);
    assert_eq!(stats.due_now, 2);
    assert_eq!(stats.total_reviews, 1);
    assert_eq!(stats.interval_breakdown.new, 2);

    let upcoming = service.upcoming_reviews_at("learner", 30, now()).unwrap();
    assert_eq!(upcoming.iter().map(|day| day.items_due).sum::<usize>(), 3);
    assert_eq!(upcoming[0].review_date, now().date_naive());
}

#[test]
fn difficulty_needs_enough_learners() {
    let mut service = SrsService::new(seeded_store());
    for n in 0..6 {
        let user = format!("learner{}", n);
        service
            .process_user_response_at(&user, "water_1", &response(5, ExerciseType::Flashcard), now())
            .unwrap();
    }
    service
        .process_user_response_at("learner0", "thanks_1", &response(5, ExerciseType::Flashcard), now())
        .unwrap();

    let easy = service.get_difficulty_adjustment("water_1").unwrap();
    assert_eq!(easy.adjustment, 1);

    let unknown = service.get_difficulty_adjustment("thanks_1").unwrap();
    assert_eq!(unknown.adjustment, 0);
    assert!(unknown.stats.is_none());
}

/// Store whose session log rejects every write.
#[derive(Default)]
struct BrokenSessionLog {
    inner: MemoryStore,
}

impl SrsStore for BrokenSessionLog {
    fn get_record(&mut self, user_id: &str, content_id: &str) -> Result<RecordLookup, StoreError> {
        self.inner.get_record(user_id, content_id)
    }

    fn upsert_record(&mut self, record: &SchedulingRecord) -> Result<(), StoreError> {
        self.inner.upsert_record(record)
    }

    fn insert_session(&mut self, _session: &ReviewSession) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("session log is read-only".into()))
    }

    fn list_due_records(&mut self, user_id: &str, now: DateTime<Utc>) -> Result<Vec<SchedulingRecord>, StoreError> {
        self.inner.list_due_records(user_id, now)
    }

    fn list_user_records(&mut self, user_id: &str) -> Result<Vec<SchedulingRecord>, StoreError> {
        self.inner.list_user_records(user_id)
    }

    fn list_content_records(&mut self, content_id: &str) -> Result<Vec<SchedulingRecord>, StoreError> {
        self.inner.list_content_records(content_id)
    }

    fn atomically<T, F>(&mut self, f: F) -> Result<T, SrsError>
    where
        F: FnOnce(&mut Self) -> Result<T, SrsError>,
    {
        let snapshot = self.inner.clone();
        let result = f(self);
        if result.is_err() {
            self.inner = snapshot;
        }
        result
    }
}

impl ContentCatalog for BrokenSessionLog {
    fn difficulty(&mut self, content_id: &str) -> Result<Option<f64>, StoreError> {
        self.inner.difficulty(content_id)
    }

    fn display(&mut self, content_id: &str) -> Result<Option<ContentDisplay>, StoreError> {
        self.inner.display(content_id)
    }
}

#[test]
fn failed_session_write_leaves_record_untouched() {
    let mut store = BrokenSessionLog::default();
    let before = reviewed_record("greeting_1", 30.0);
    store.inner.upsert_record(&before).unwrap();

    let mut service = SrsService::new(store);
    let err = service
        .process_user_response_at("learner", "greeting_1", &response(5, ExerciseType::Flashcard), now())
        .unwrap_err();

    assert!(matches!(err, SrsError::Store(StoreError::Unavailable(_))));
    assert!(!err.is_validation());
    let after = service.store().inner.record("learner", "greeting_1").unwrap();
    assert_eq!(after, &before);
}
