use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::resume::ResumeData;

/// Raw `saved_resumes` row. `resume_data` stays undecoded JSON until a caller
/// needs the document.
#[derive(Debug, Clone, FromRow)]
pub struct SavedResumeRow {
    pub id: Uuid,
    pub resume_data: Value,
    pub tags: Vec<String>,
    pub version: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl SavedResumeRow {
    /// Decodes the stored blob back into a document.
    pub fn decode(&self) -> Result<SavedResume, serde_json::Error> {
        let resume_data = ResumeData::deserialize(&self.resume_data)?;
        Ok(self.with_document(resume_data))
    }

    /// Attaches an already-known document instead of decoding the stored blob.
    pub fn with_document(&self, resume_data: ResumeData) -> SavedResume {
        SavedResume {
            id: self.id,
            resume_data,
            tags: self.tags.clone(),
            version: self.version.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// A persisted resume as returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedResume {
    pub id: Uuid,
    pub resume_data: ResumeData,
    pub tags: Vec<String>,
    pub version: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
