//! Persistence for versioned, tagged resumes.
//!
//! A record is identified for upsert purposes by its `version` plus its tags
//! compared as a set: saving the same pair again updates the record in place,
//! anything else creates a new one. Deleted records are never revived.

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;
use uuid::Uuid;

use crate::config::{Config, StoreBackend};
use crate::db::create_pool;
use crate::errors::AppError;
use crate::models::resume::ResumeData;
use crate::models::saved_resume::{SavedResume, SavedResumeRow};

pub mod handlers;
pub mod memory;
pub mod postgres;

pub use memory::MemoryResumeStore;
pub use postgres::PgResumeStore;

/// Result of a listing. `skipped` holds ids of records whose stored document
/// could not be decoded; those are left out of `resumes`.
#[derive(Debug, Default)]
pub struct ResumeListing {
    pub resumes: Vec<SavedResume>,
    pub skipped: Vec<Uuid>,
}

#[async_trait]
pub trait ResumeStore: Send + Sync {
    /// Creates a record, or updates the live one with the same version and tag set.
    /// The returned record carries `resume` as submitted.
    async fn save(
        &self,
        resume: ResumeData,
        version: &str,
        tags: &[String],
    ) -> Result<SavedResume, AppError>;

    /// Live records, newest first. A non-empty `tag_filter` keeps records
    /// sharing at least one tag with it.
    async fn list(&self, tag_filter: &[String]) -> Result<ResumeListing, AppError>;

    async fn delete(&self, id: &str) -> Result<(), AppError>;

    fn backend(&self) -> &'static str;
}

/// Builds the store selected by configuration.
pub async fn build_store(config: &Config) -> anyhow::Result<Arc<dyn ResumeStore>> {
    let store: Arc<dyn ResumeStore> = match config.store_backend {
        StoreBackend::Postgres => {
            let pool = create_pool(&config.database_url, config.db_max_connections).await?;
            Arc::new(PgResumeStore::new(pool))
        }
        StoreBackend::Memory => {
            warn!("Using in-memory resume store; saved resumes will not survive a restart");
            Arc::new(MemoryResumeStore::new())
        }
    };
    Ok(store)
}

pub fn parse_id(id: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(id.trim())
        .map_err(|e| AppError::InvalidArgument(format!("invalid resume ID '{id}': {e}")))
}

/// Trims surrounding whitespace and drops blank tags, keeping order.
/// Applied to tags on save and to list filters alike.
pub fn normalize_tags(tags: &[String]) -> Vec<String> {
    tags.iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Tags as an unordered, duplicate-free set.
pub fn tag_set(tags: &[String]) -> BTreeSet<&str> {
    tags.iter().map(String::as_str).collect()
}

/// Canonical identity of a (version, tag set) pair. Equal pairs give equal keys
/// regardless of tag order or duplicates.
pub fn upsert_key(version: &str, tags: &[String]) -> String {
    let mut key = String::from(version);
    for tag in tag_set(tags) {
        key.push('\u{1f}');
        key.push_str(tag);
    }
    key
}

pub fn tags_overlap(tags: &[String], filter: &[String]) -> bool {
    let filter = tag_set(filter);
    tags.iter().any(|t| filter.contains(t.as_str()))
}

/// Decodes stored rows, skipping (and logging) any whose document is corrupt.
pub fn decode_rows(rows: Vec<SavedResumeRow>) -> ResumeListing {
    let mut listing = ResumeListing::default();
    for row in rows {
        match row.decode() {
            Ok(saved) => listing.resumes.push(saved),
            Err(e) => {
                warn!(resume_id = %row.id, error = %e, "Skipping resume with undecodable data");
                listing.skipped.push(row.id);
            }
        }
    }
    listing
}
