use std::time::Duration;

use diesel::connection::SimpleConnection;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool};
use diesel::SqliteConnection;

use crate::data::models::StoreError;

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;

const CREATE_TABLES: &str = r#"
CREATE TABLE IF NOT EXISTS lesson_content (
    id TEXT PRIMARY KEY NOT NULL,
    english_phrase TEXT NOT NULL,
    target_phrase TEXT NOT NULL,
    pronunciation_guide TEXT,
    cultural_context TEXT,
    difficulty_score DOUBLE NOT NULL DEFAULT 5.0
);

CREATE TABLE IF NOT EXISTS spaced_repetition (
    user_id TEXT NOT NULL,
    content_id TEXT NOT NULL,
    current_interval DOUBLE NOT NULL,
    ease_factor DOUBLE NOT NULL,
    repetitions INTEGER NOT NULL DEFAULT 0,
    success_count INTEGER NOT NULL DEFAULT 0,
    total_reviews INTEGER NOT NULL DEFAULT 0,
    last_response_quality INTEGER,
    last_reviewed TIMESTAMP,
    next_review TIMESTAMP NOT NULL,
    created_at TIMESTAMP NOT NULL,
    PRIMARY KEY (user_id, content_id)
);

CREATE INDEX IF NOT EXISTS idx_spaced_repetition_due
    ON spaced_repetition (user_id, next_review);

CREATE TABLE IF NOT EXISTS review_sessions (
    session_id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
    user_id TEXT NOT NULL,
    content_id TEXT NOT NULL,
    response_quality INTEGER NOT NULL,
    response_time DOUBLE,
    exercise_type TEXT NOT NULL,
    type_weight DOUBLE NOT NULL,
    half_life DOUBLE NOT NULL,
    next_review TIMESTAMP NOT NULL,
    reviewed_at TIMESTAMP NOT NULL
);
"#;

/// Per-connection pragmas applied by the pool.
#[derive(Debug, Clone, Copy)]
pub struct ConnectionOptions {
    pub busy_timeout: Option<Duration>,
}

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for ConnectionOptions {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        if let Some(timeout) = self.busy_timeout {
            conn.batch_execute(&format!("PRAGMA busy_timeout = {};", timeout.as_millis()))
                .map_err(diesel::r2d2::Error::QueryError)?;
        }
        conn.batch_execute("PRAGMA foreign_keys = ON;")
            .map_err(diesel::r2d2::Error::QueryError)
    }
}

/// Creates the scheduler tables when they are missing.
pub fn create_tables(conn: &mut SqliteConnection) -> Result<(), StoreError> {
    conn.batch_execute(CREATE_TABLES)?;
    Ok(())
}

pub fn establish_pool(database_url: &str, max_size: u32) -> Result<DbPool, StoreError> {
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    let pool = Pool::builder()
        .max_size(max_size)
        .connection_customizer(Box::new(ConnectionOptions {
            busy_timeout: Some(Duration::from_secs(5)),
        }))
        .build(manager)?;

    let mut conn = pool.get()?;
    create_tables(&mut conn)?;
    log::info!("Database ready at {}", database_url);

    Ok(pool)
}
