use diesel::{Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};

use crate::schema::lesson_content;

/// Display fields of a vocabulary item, joined onto queue entries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentDisplay {
    pub english_phrase: String,
    pub target_phrase: String, // Gheg Albanian
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pronunciation_guide: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cultural_context: Option<String>,
}

/// Row of the lesson content table
#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Insertable, Serialize, Deserialize)]
#[diesel(table_name = lesson_content)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct LessonContent {
    pub id: String,
    pub english_phrase: String,
    pub target_phrase: String,
    pub pronunciation_guide: Option<String>,
    pub cultural_context: Option<String>,
    pub difficulty_score: f64, // 0-10
}

impl LessonContent {
    pub fn display(&self) -> ContentDisplay {
        ContentDisplay {
            english_phrase: self.english_phrase.clone(),
            target_phrase: self.target_phrase.clone(),
            pronunciation_guide: self.pronunciation_guide.clone(),
            cultural_context: self.cultural_context.clone(),
        }
    }
}
