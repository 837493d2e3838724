use std::thread;

use chrono::{DateTime, Duration, TimeZone, Utc};
use diesel::prelude::*;

use gheg_srs::data::db::{create_tables, establish_pool};
use gheg_srs::data::models::LessonContent;
use gheg_srs::{
    ContentCatalog, ExerciseType, ResponseData, SchedulerConfig, SchedulingRecord, SqliteStore,
    SrsError, SrsService, SrsStore,
};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 2, 7, 45, 0).unwrap()
}

fn memory_db() -> SqliteConnection {
    let mut conn = SqliteConnection::establish(":memory:").unwrap();
    create_tables(&mut conn).unwrap();
    conn
}

fn bread() -> LessonContent {
    LessonContent {
        id: "food_bread".into(),
        english_phrase: "Bread".into(),
        target_phrase: "Bukë".into(),
        pronunciation_guide: Some("BOO-kuh".into()),
        cultural_context: Some("Shared at every meal".into()),
        difficulty_score: 2.5,
    }
}

#[test]
fn record_round_trips_through_sqlite() {
    let mut conn = memory_db();
    let mut store = SqliteStore::new(&mut conn);

    let mut record = SchedulingRecord::fresh("learner", "food_bread", &SchedulerConfig::default(), now());
    assert!(!store.get_record("learner", "food_bread").unwrap().is_found());

    store.upsert_record(&record).unwrap();
    record.total_reviews = 2;
    record.success_count = 1;
    record.last_response_quality = Some(3);
    record.last_reviewed = Some(now() + Duration::hours(1));
    store.upsert_record(&record).unwrap();

    let loaded = store.get_record("learner", "food_bread").unwrap().into_option().unwrap();
    assert_eq!(loaded, record);
    assert_eq!(store.list_user_records("learner").unwrap().len(), 1);
}

#[test]
fn due_listing_filters_on_next_review() {
    let mut conn = memory_db();
    let mut store = SqliteStore::new(&mut conn);
    let config = SchedulerConfig::default();

    let due = SchedulingRecord::fresh("learner", "due", &config, now() - Duration::hours(1));
    let mut later = SchedulingRecord::fresh("learner", "later", &config, now() - Duration::hours(1));
    later.last_reviewed = Some(now());
    later.total_reviews = 1;
    let other_user = SchedulingRecord::fresh("someone", "due", &config, now() - Duration::hours(1));

    for record in [&due, &later, &other_user] {
        store.upsert_record(record).unwrap();
    }

    let listed = store.list_due_records("learner", now()).unwrap();
    assert_eq!(listed, vec![due]);
    assert_eq!(store.list_content_records("due").unwrap().len(), 2);
}

#[test]
fn content_catalog_reads_saved_items() {
    let mut conn = memory_db();
    let mut store = SqliteStore::new(&mut conn);

    store.save_content(&bread()).unwrap();
    let mut harder = bread();
    harder.difficulty_score = 6.0;
    store.save_content(&harder).unwrap();

    assert_eq!(store.difficulty("food_bread").unwrap(), Some(6.0));
    assert_eq!(store.difficulty("missing").unwrap(), None);
    assert_eq!(store.display("food_bread").unwrap().unwrap().target_phrase, "Bukë");
}

#[test]
fn service_persists_record_and_session() {
    let mut conn = memory_db();
    let mut service = SrsService::new(SqliteStore::new(&mut conn));
    service.store_mut().save_content(&bread()).unwrap();

    let response = ResponseData {
        quality: 4,
        time: Some(1.8),
        exercise_type: ExerciseType::Audio,
    };
    let outcome = service
        .process_user_response_at("learner", "food_bread", &response, now())
        .unwrap();
    service
        .process_user_response_at("learner", "food_bread", &response, now() + Duration::days(3))
        .unwrap();

    let store = service.store_mut();
    let record = store.get_record("learner", "food_bread").unwrap().into_option().unwrap();
    assert_eq!(record.total_reviews, 2);
    assert_eq!(record.success_count, 2);

    let sessions = store.list_sessions("learner").unwrap();
    assert_eq!(sessions.len(), 2);
    assert_eq!(sessions[0], outcome.session);
    assert_eq!(sessions[1].exercise_type, ExerciseType::Audio);
    assert_eq!(sessions[1].type_weight, 1.2);
}

#[test]
fn rejected_transaction_rolls_back() {
    let mut conn = memory_db();
    let mut store = SqliteStore::new(&mut conn);
    let record = SchedulingRecord::fresh("learner", "food_bread", &SchedulerConfig::default(), now());

    let result: Result<(), SrsError> = store.atomically(|store| {
        store.upsert_record(&record)?;
        Err(SrsError::Validation("abort".into()))
    });

    assert!(result.is_err());
    assert!(!store.get_record("learner", "food_bread").unwrap().is_found());
}

#[test]
fn concurrent_responses_are_all_counted() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("srs.db");
    let pool = establish_pool(path.to_str().unwrap(), 4).unwrap();

    const WORKERS: usize = 4;
    const RESPONSES_PER_WORKER: usize = 5;

    let handles: Vec<_> = (0..WORKERS)
        .map(|worker| {
            let pool = pool.clone();
            thread::spawn(move || {
                let mut conn = pool.get().unwrap();
                let mut service = SrsService::new(SqliteStore::new(&mut conn));
                for n in 0..RESPONSES_PER_WORKER {
                    let response = ResponseData {
                        quality: ((worker + n) % 6) as i32,
                        ..ResponseData::default()
                    };
                    service
                        .process_user_response("learner", "food_bread", &response)
                        .unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let mut conn = pool.get().unwrap();
    let mut store = SqliteStore::new(&mut conn);
    let record = store.get_record("learner", "food_bread").unwrap().into_option().unwrap();
    assert_eq!(record.total_reviews as usize, WORKERS * RESPONSES_PER_WORKER);
    assert_eq!(store.list_sessions("learner").unwrap().len(), WORKERS * RESPONSES_PER_WORKER);
}
