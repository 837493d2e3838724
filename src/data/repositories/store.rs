use chrono::{DateTime, Utc};

use crate::data::models::{
    ContentDisplay, RecordLookup, ReviewSession, SchedulingRecord, SrsError, StoreError,
};

/// Persistence contract of the scheduler.
///
/// The scheduler never talks to a storage engine directly; everything it needs
/// goes through these operations.
pub trait SrsStore {
    fn get_record(&mut self, user_id: &str, content_id: &str) -> Result<RecordLookup, StoreError>;

    fn upsert_record(&mut self, record: &SchedulingRecord) -> Result<(), StoreError>;

    fn insert_session(&mut self, session: &ReviewSession) -> Result<(), StoreError>;

    /// Records of `user_id` whose next review is at or before `now`.
    fn list_due_records(
        &mut self,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<SchedulingRecord>, StoreError>;

    fn list_user_records(&mut self, user_id: &str) -> Result<Vec<SchedulingRecord>, StoreError>;

    fn list_content_records(&mut self, content_id: &str) -> Result<Vec<SchedulingRecord>, StoreError>;

    /// Runs `f` as one unit: either every write inside it is applied or none is.
    ///
    /// Implementations must also keep concurrent read-modify-write cycles on
    /// the same record from interleaving.
    fn atomically<T, F>(&mut self, f: F) -> Result<T, SrsError>
    where
        F: FnOnce(&mut Self) -> Result<T, SrsError>;
}

/// Read-only view of the content store.
pub trait ContentCatalog {
    /// Difficulty score (0-10) of an item, `None` when unknown.
    fn difficulty(&mut self, content_id: &str) -> Result<Option<f64>, StoreError>;

    fn display(&mut self, content_id: &str) -> Result<Option<ContentDisplay>, StoreError>;
}
