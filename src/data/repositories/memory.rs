use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::data::models::{
    ContentDisplay, LessonContent, RecordLookup, ReviewSession, SchedulingRecord, SrsError,
    StoreError,
};
use crate::data::repositories::{ContentCatalog, SrsStore};

type RecordKey = (String, String);

/// In-process store, useful for analytics and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: BTreeMap<RecordKey, SchedulingRecord>,
    sessions: Vec<ReviewSession>,
    content: BTreeMap<String, LessonContent>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_content(&mut self, content: LessonContent) {
        self.content.insert(content.id.clone(), content);
    }

    pub fn sessions(&self) -> &[ReviewSession] {
        &self.sessions
    }

    pub fn record(&self, user_id: &str, content_id: &str) -> Option<&SchedulingRecord> {
        self.records
            .get(&(user_id.to_string(), content_id.to_string()))
    }

    fn user_records(&self, user_id: &str) -> impl Iterator<Item = &SchedulingRecord> {
        self.records
            .values()
            .filter(move |record| record.user_id == user_id)
    }
}

impl SrsStore for MemoryStore {
    fn get_record(&mut self, user_id: &str, content_id: &str) -> Result<RecordLookup, StoreError> {
        Ok(match self.record(user_id, content_id) {
            Some(record) => RecordLookup::Found(record.clone()),
            None => RecordLookup::Absent,
        })
    }

    fn upsert_record(&mut self, record: &SchedulingRecord) -> Result<(), StoreError> {
        self.records.insert(
            (record.user_id.clone(), record.content_id.clone()),
            record.clone(),
        );
        Ok(())
    }

    fn insert_session(&mut self, session: &ReviewSession) -> Result<(), StoreError> {
        self.sessions.push(session.clone());
        Ok(())
    }

    fn list_due_records(
        &mut self,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<SchedulingRecord>, StoreError> {
        Ok(self
            .user_records(user_id)
            .filter(|record| record.is_due(now))
            .cloned()
            .collect())
    }

    fn list_user_records(&mut self, user_id: &str) -> Result<Vec<SchedulingRecord>, StoreError> {
        Ok(self.user_records(user_id).cloned().collect())
    }

    fn list_content_records(&mut self, content_id: &str) -> Result<Vec<SchedulingRecord>, StoreError> {
        Ok(self
            .records
            .values()
            .filter(|record| record.content_id == content_id)
            .cloned()
            .collect())
    }

    fn atomically<T, F>(&mut self, f: F) -> Result<T, SrsError>
    where
        F: FnOnce(&mut Self) -> Result<T, SrsError>,
    {
        let snapshot = (self.records.clone(), self.sessions.len());
        let result = f(self);
        if result.is_err() {
            let (records, session_count) = snapshot;
            self.records = records;
            self.sessions.truncate(session_count);
        }
        result
    }
}

impl ContentCatalog for MemoryStore {
    fn difficulty(&mut self, content_id: &str) -> Result<Option<f64>, StoreError> {
        Ok(self.content.get(content_id).map(|c| c.difficulty_score))
    }

    fn display(&mut self, content_id: &str) -> Result<Option<ContentDisplay>, StoreError> {
        Ok(self.content.get(content_id).map(LessonContent::display))
    }
}
