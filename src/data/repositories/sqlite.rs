use chrono::{DateTime, Utc};
use diesel::connection::{AnsiTransactionManager, TransactionManager};
use diesel::prelude::*;

use crate::data::models::{
    ContentDisplay, LessonContent, NewSessionRow, RecordLookup, ReviewSession, SchedulingRecord,
    SchedulingRow, SessionRow, SrsError, StoreError,
};
use crate::data::repositories::{ContentCatalog, SrsStore};
use crate::schema::{lesson_content, review_sessions, spaced_repetition};
use crate::utils::time::to_naive;

/// Diesel-backed store over a borrowed SQLite connection.
pub struct SqliteStore<'a> {
    conn: &'a mut SqliteConnection,
}

impl<'a> SqliteStore<'a> {
    pub fn new(conn: &'a mut SqliteConnection) -> Self {
        SqliteStore { conn }
    }

    /// Inserts or refreshes a vocabulary item.
    pub fn save_content(&mut self, content: &LessonContent) -> Result<(), StoreError> {
        diesel::insert_into(lesson_content::table)
            .values(content)
            .on_conflict(lesson_content::id)
            .do_update()
            .set((
                lesson_content::english_phrase.eq(&content.english_phrase),
                lesson_content::target_phrase.eq(&content.target_phrase),
                lesson_content::pronunciation_guide.eq(&content.pronunciation_guide),
                lesson_content::cultural_context.eq(&content.cultural_context),
                lesson_content::difficulty_score.eq(content.difficulty_score),
            ))
            .execute(self.conn)?;

        Ok(())
    }

    /// Session log of a learner, oldest first.
    pub fn list_sessions(&mut self, user_id: &str) -> Result<Vec<ReviewSession>, StoreError> {
        let rows = review_sessions::table
            .filter(review_sessions::user_id.eq(user_id))
            .order_by(review_sessions::session_id.asc())
            .select(SessionRow::as_select())
            .load(self.conn)?;

        Ok(rows.into_iter().map(SessionRow::into_session).collect())
    }
}

impl SrsStore for SqliteStore<'_> {
    fn get_record(&mut self, user_id: &str, content_id: &str) -> Result<RecordLookup, StoreError> {
        let row = spaced_repetition::table
            .filter(spaced_repetition::user_id.eq(user_id))
            .filter(spaced_repetition::content_id.eq(content_id))
            .select(SchedulingRow::as_select())
            .first(self.conn)
            .optional()?;

        Ok(match row {
            Some(row) => RecordLookup::Found(row.into()),
            None => RecordLookup::Absent,
        })
    }

    fn upsert_record(&mut self, record: &SchedulingRecord) -> Result<(), StoreError> {
        let row = SchedulingRow::from(record);

        diesel::insert_into(spaced_repetition::table)
            .values(&row)
            .on_conflict((spaced_repetition::user_id, spaced_repetition::content_id))
            .do_update()
            .set((
                spaced_repetition::current_interval.eq(row.current_interval),
                spaced_repetition::ease_factor.eq(row.ease_factor),
                spaced_repetition::repetitions.eq(row.repetitions),
                spaced_repetition::success_count.eq(row.success_count),
                spaced_repetition::total_reviews.eq(row.total_reviews),
                spaced_repetition::last_response_quality.eq(row.last_response_quality),
                spaced_repetition::last_reviewed.eq(row.last_reviewed),
                spaced_repetition::next_review.eq(row.next_review),
                spaced_repetition::created_at.eq(row.created_at),
            ))
            .execute(self.conn)?;

        Ok(())
    }

    fn insert_session(&mut self, session: &ReviewSession) -> Result<(), StoreError> {
        diesel::insert_into(review_sessions::table)
            .values(&NewSessionRow::from(session))
            .execute(self.conn)?;

        Ok(())
    }

    fn list_due_records(
        &mut self,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<SchedulingRecord>, StoreError> {
        let rows = spaced_repetition::table
            .filter(spaced_repetition::user_id.eq(user_id))
            .filter(spaced_repetition::next_review.le(to_naive(now)))
            .order_by(spaced_repetition::next_review.asc())
            .select(SchedulingRow::as_select())
            .load(self.conn)?;

        Ok(rows.into_iter().map(SchedulingRecord::from).collect())
    }

    fn list_user_records(&mut self, user_id: &str) -> Result<Vec<SchedulingRecord>, StoreError> {
        let rows = spaced_repetition::table
            .filter(spaced_repetition::user_id.eq(user_id))
            .order_by(spaced_repetition::next_review.asc())
            .select(SchedulingRow::as_select())
            .load(self.conn)?;

        Ok(rows.into_iter().map(SchedulingRecord::from).collect())
    }

    fn list_content_records(&mut self, content_id: &str) -> Result<Vec<SchedulingRecord>, StoreError> {
        let rows = spaced_repetition::table
            .filter(spaced_repetition::content_id.eq(content_id))
            .select(SchedulingRow::as_select())
            .load(self.conn)?;

        Ok(rows.into_iter().map(SchedulingRecord::from).collect())
    }

    // BEGIN IMMEDIATE takes the write lock up front, so a concurrent response
    // to the same record waits instead of reading stale state.
    fn atomically<T, F>(&mut self, f: F) -> Result<T, SrsError>
    where
        F: FnOnce(&mut Self) -> Result<T, SrsError>,
    {
        AnsiTransactionManager::begin_transaction_sql(&mut *self.conn, "BEGIN IMMEDIATE")?;

        match f(self) {
            Ok(value) => {
                AnsiTransactionManager::commit_transaction(&mut *self.conn)?;
                Ok(value)
            }
            Err(e) => {
                if let Err(rollback_err) = AnsiTransactionManager::rollback_transaction(&mut *self.conn) {
                    log::error!("Failed to roll back review transaction: {}", rollback_err);
                }
                Err(e)
            }
        }
    }
}

impl ContentCatalog for SqliteStore<'_> {
    fn difficulty(&mut self, content_id: &str) -> Result<Option<f64>, StoreError> {
        let score = lesson_content::table
            .find(content_id)
            .select(lesson_content::difficulty_score)
            .first::<f64>(self.conn)
            .optional()?;

        Ok(score)
    }

    fn display(&mut self, content_id: &str) -> Result<Option<ContentDisplay>, StoreError> {
        let content = lesson_content::table
            .find(content_id)
            .select(LessonContent::as_select())
            .first(self.conn)
            .optional()?;

        Ok(content.as_ref().map(LessonContent::display))
    }
}
