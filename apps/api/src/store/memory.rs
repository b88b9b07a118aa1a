use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::ResumeData;
use crate::models::saved_resume::{SavedResume, SavedResumeRow};
use crate::store::{decode_rows, parse_id, tag_set, tags_overlap, ResumeListing, ResumeStore};

#[derive(Default)]
struct Inner {
    rows: Vec<SavedResumeRow>,
    last_timestamp: Option<DateTime<Utc>>,
}

impl Inner {
    /// Wall-clock time, nudged forward so successive timestamps strictly increase.
    fn tick(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let next = match self.last_timestamp {
            Some(last) if now <= last => last + Duration::microseconds(1),
            _ => now,
        };
        self.last_timestamp = Some(next);
        next
    }
}

/// Process-local store. Find-or-create runs under the write lock, so
/// concurrent saves of the same pair always converge on one record.
#[derive(Default)]
pub struct MemoryResumeStore {
    inner: RwLock<Inner>,
}

impl MemoryResumeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a row with an arbitrary stored blob, bypassing serialization.
    #[cfg(test)]
    pub async fn insert_raw(
        &self,
        resume_data: serde_json::Value,
        version: &str,
        tags: &[String],
    ) -> Uuid {
        let mut inner = self.inner.write().await;
        let now = inner.tick();
        let id = Uuid::new_v4();
        inner.rows.push(SavedResumeRow {
            id,
            resume_data,
            tags: tags.to_vec(),
            version: version.to_string(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        });
        id
    }
}

#[async_trait]
impl ResumeStore for MemoryResumeStore {
    async fn save(
        &self,
        resume: ResumeData,
        version: &str,
        tags: &[String],
    ) -> Result<SavedResume, AppError> {
        info!("Saving resume version {version} with tags {tags:?}");
        let resume_json = serde_json::to_value(&resume)?;
        let wanted = tag_set(tags);

        let mut inner = self.inner.write().await;
        let now = inner.tick();

        let existing = inner.rows.iter_mut().find(|row| {
            row.deleted_at.is_none() && row.version == version && tag_set(&row.tags) == wanted
        });

        let row = match existing {
            Some(row) => {
                info!("Updating existing resume with ID {}", row.id);
                row.resume_data = resume_json;
                row.updated_at = now;
                row.clone()
            }
            None => {
                let row = SavedResumeRow {
                    id: Uuid::new_v4(),
                    resume_data: resume_json,
                    tags: tags.to_vec(),
                    version: version.to_string(),
                    created_at: now,
                    updated_at: now,
                    deleted_at: None,
                };
                info!("Created resume with ID {}", row.id);
                inner.rows.push(row.clone());
                row
            }
        };

        Ok(row.with_document(resume))
    }

    async fn list(&self, tag_filter: &[String]) -> Result<ResumeListing, AppError> {
        let inner = self.inner.read().await;
        let mut rows: Vec<SavedResumeRow> = inner
            .rows
            .iter()
            .filter(|row| row.deleted_at.is_none())
            .filter(|row| tag_filter.is_empty() || tags_overlap(&row.tags, tag_filter))
            .cloned()
            .collect();
        drop(inner);

        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(decode_rows(rows))
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let uuid = parse_id(id)?;

        let mut inner = self.inner.write().await;
        let now = inner.tick();
        let row = inner
            .rows
            .iter_mut()
            .find(|row| row.id == uuid && row.deleted_at.is_none())
            .ok_or_else(|| AppError::NotFound(format!("resume not found with ID: {id}")))?;

        row.deleted_at = Some(now);
        info!("Deleted resume {uuid}");
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;

    use super::*;
    use serde_json::json;

    fn tags(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn resume(name: &str) -> ResumeData {
        ResumeData {
            full_name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            skills: vec!["Rust".to_string()],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_first_save_creates_record() {
        let store = MemoryResumeStore::new();
        let saved = store
            .save(resume("Ada"), "v1", &tags(&["backend"]))
            .await
            .unwrap();

        assert_eq!(saved.version, "v1");
        assert_eq!(saved.tags, vec!["backend"]);
        assert_eq!(saved.resume_data, resume("Ada"));
        assert_eq!(saved.created_at, saved.updated_at);
    }

    #[tokio::test]
    async fn test_same_version_and_tags_updates_in_place() {
        let store = MemoryResumeStore::new();
        let first = store
            .save(resume("Ada"), "v1", &tags(&["backend", "rust"]))
            .await
            .unwrap();
        let second = store
            .save(resume("Ada"), "v1", &tags(&["backend", "rust"]))
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(first.created_at, second.created_at);
        assert!(second.updated_at > first.updated_at);

        let listing = store.list(&[]).await.unwrap();
        assert_eq!(listing.resumes.len(), 1);
    }

    #[tokio::test]
    async fn test_update_replaces_document_and_keeps_tag_order() {
        let store = MemoryResumeStore::new();
        let first = store
            .save(resume("Ada"), "v1", &tags(&["rust", "backend"]))
            .await
            .unwrap();
        let second = store
            .save(resume("Grace"), "v1", &tags(&["backend", "rust", "rust"]))
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.resume_data.full_name, "Grace");
        assert_eq!(second.tags, vec!["rust", "backend"]);

        let listing = store.list(&[]).await.unwrap();
        assert_eq!(listing.resumes[0].resume_data.full_name, "Grace");
    }

    #[tokio::test]
    async fn test_different_tags_or_version_create_new_records() {
        let store = MemoryResumeStore::new();
        let a = store.save(resume("Ada"), "v1", &tags(&["backend"])).await.unwrap();
        let b = store
            .save(resume("Ada"), "v1", &tags(&["backend", "rust"]))
            .await
            .unwrap();
        let c = store.save(resume("Ada"), "v2", &tags(&["backend"])).await.unwrap();
        let d = store.save(resume("Ada"), "v1", &[]).await.unwrap();

        let ids: HashSet<Uuid> = [a.id, b.id, c.id, d.id].into_iter().collect();
        assert_eq!(ids.len(), 4);
        assert_eq!(store.list(&[]).await.unwrap().resumes.len(), 4);
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let store = MemoryResumeStore::new();
        let first = store.save(resume("A"), "v1", &tags(&["x"])).await.unwrap();
        let second = store.save(resume("B"), "v1", &tags(&["y"])).await.unwrap();
        let third = store.save(resume("C"), "v1", &tags(&["z"])).await.unwrap();

        // updating the oldest must not move it up
        store.save(resume("A2"), "v1", &tags(&["x"])).await.unwrap();

        let ids: Vec<Uuid> = store
            .list(&[])
            .await
            .unwrap()
            .resumes
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![third.id, second.id, first.id]);
    }

    #[tokio::test]
    async fn test_list_filter_is_set_overlap() {
        let store = MemoryResumeStore::new();
        let backend = store
            .save(resume("A"), "v1", &tags(&["backend", "rust"]))
            .await
            .unwrap();
        let frontend = store
            .save(resume("B"), "v1", &tags(&["frontend"]))
            .await
            .unwrap();
        store.save(resume("C"), "v1", &tags(&["data"])).await.unwrap();
        store.save(resume("D"), "v1", &[]).await.unwrap();

        let found: HashSet<Uuid> = store
            .list(&tags(&["rust", "frontend", "unused"]))
            .await
            .unwrap()
            .resumes
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(found, [backend.id, frontend.id].into_iter().collect());

        assert!(store.list(&tags(&["nothing"])).await.unwrap().resumes.is_empty());
    }

    #[tokio::test]
    async fn test_delete_hides_record() {
        let store = MemoryResumeStore::new();
        let saved = store.save(resume("A"), "v1", &tags(&["x"])).await.unwrap();

        store.delete(&saved.id.to_string()).await.unwrap();

        assert!(store.list(&[]).await.unwrap().resumes.is_empty());
        assert!(store.list(&tags(&["x"])).await.unwrap().resumes.is_empty());
    }

    #[tokio::test]
    async fn test_delete_twice_is_not_found() {
        let store = MemoryResumeStore::new();
        let saved = store.save(resume("A"), "v1", &[]).await.unwrap();
        let id = saved.id.to_string();

        store.delete(&id).await.unwrap();
        assert!(matches!(
            store.delete(&id).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_unknown_and_malformed_ids() {
        let store = MemoryResumeStore::new();
        assert!(matches!(
            store.delete(&Uuid::new_v4().to_string()).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            store.delete("resume-42").await,
            Err(AppError::InvalidArgument(_))
        ));
    }

    #[tokio::test]
    async fn test_save_after_delete_creates_new_record() {
        let store = MemoryResumeStore::new();
        let original = store.save(resume("A"), "v1", &tags(&["x"])).await.unwrap();
        store.delete(&original.id.to_string()).await.unwrap();

        let revived = store.save(resume("A"), "v1", &tags(&["x"])).await.unwrap();
        assert_ne!(revived.id, original.id);

        let listing = store.list(&[]).await.unwrap();
        assert_eq!(listing.resumes.len(), 1);
        assert_eq!(listing.resumes[0].id, revived.id);
    }

    #[tokio::test]
    async fn test_corrupt_record_is_skipped_and_reported() {
        let store = MemoryResumeStore::new();
        let good = store.save(resume("A"), "v1", &tags(&["x"])).await.unwrap();
        let bad = store
            .insert_raw(json!({ "skills": "not-a-list" }), "v1", &tags(&["y"]))
            .await;

        let listing = store.list(&[]).await.unwrap();
        assert_eq!(listing.resumes.len(), 1);
        assert_eq!(listing.resumes[0].id, good.id);
        assert_eq!(listing.skipped, vec![bad]);
    }

    #[tokio::test]
    async fn test_concurrent_saves_converge_on_one_record() {
        let store = Arc::new(MemoryResumeStore::new());
        let mut handles = Vec::new();
        for i in 0..16 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                let order = if i % 2 == 0 {
                    tags(&["a", "b"])
                } else {
                    tags(&["b", "a"])
                };
                store.save(resume("A"), "v1", &order).await.unwrap().id
            }));
        }

        let mut ids = HashSet::new();
        for handle in handles {
            ids.insert(handle.await.unwrap());
        }
        assert_eq!(ids.len(), 1);
        assert_eq!(store.list(&[]).await.unwrap().resumes.len(), 1);
    }
}
