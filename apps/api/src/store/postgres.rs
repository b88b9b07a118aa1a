use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;

use crate::errors::AppError;
use crate::models::resume::ResumeData;
use crate::models::saved_resume::{SavedResume, SavedResumeRow};
use crate::store::{decode_rows, parse_id, upsert_key, ResumeListing, ResumeStore};

// Tag arrays are compared as sets: containment both ways.
const FIND_LIVE_BY_VERSION_AND_TAGS: &str = r#"
    SELECT * FROM saved_resumes
    WHERE deleted_at IS NULL
      AND version = $1
      AND tags @> $2 AND tags <@ $2
    ORDER BY created_at ASC
    LIMIT 1
"#;

/// Postgres-backed store over the `saved_resumes` table.
///
/// Find-or-create in `save` runs inside a transaction holding an advisory
/// lock on the (version, tag set) key, so writers racing on the same pair
/// are serialized even across processes.
#[derive(Clone)]
pub struct PgResumeStore {
    pool: PgPool,
}

impl PgResumeStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ResumeStore for PgResumeStore {
    async fn save(
        &self,
        resume: ResumeData,
        version: &str,
        tags: &[String],
    ) -> Result<SavedResume, AppError> {
        info!("Saving resume version {version} with tags {tags:?}");
        let resume_json = serde_json::to_value(&resume)?;

        let mut tx = self.pool.begin().await?;

        sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1, 0))")
            .bind(upsert_key(version, tags))
            .execute(&mut *tx)
            .await?;

        let existing: Option<SavedResumeRow> = sqlx::query_as(FIND_LIVE_BY_VERSION_AND_TAGS)
            .bind(version)
            .bind(tags)
            .fetch_optional(&mut *tx)
            .await?;

        let row: SavedResumeRow = match existing {
            Some(existing) => {
                info!("Updating existing resume with ID {}", existing.id);
                sqlx::query_as(
                    r#"
                    UPDATE saved_resumes
                    SET resume_data = $1,
                        updated_at = GREATEST(
                            clock_timestamp(),
                            updated_at + interval '1 microsecond'
                        )
                    WHERE id = $2
                    RETURNING *
                    "#,
                )
                .bind(&resume_json)
                .bind(existing.id)
                .fetch_one(&mut *tx)
                .await?
            }
            None => {
                let row: SavedResumeRow = sqlx::query_as(
                    r#"
                    INSERT INTO saved_resumes (resume_data, tags, version, created_at, updated_at)
                    VALUES ($1, $2, $3, clock_timestamp(), clock_timestamp())
                    RETURNING *
                    "#,
                )
                .bind(&resume_json)
                .bind(tags)
                .bind(version)
                .fetch_one(&mut *tx)
                .await?;
                info!("Created resume with ID {}", row.id);
                row
            }
        };

        tx.commit().await?;

        Ok(row.with_document(resume))
    }

    async fn list(&self, tag_filter: &[String]) -> Result<ResumeListing, AppError> {
        let rows: Vec<SavedResumeRow> = if tag_filter.is_empty() {
            sqlx::query_as(
                "SELECT * FROM saved_resumes WHERE deleted_at IS NULL ORDER BY created_at DESC",
            )
            .fetch_all(&self.pool)
            .await?
        } else {
            sqlx::query_as(
                r#"
                SELECT * FROM saved_resumes
                WHERE deleted_at IS NULL AND tags && $1
                ORDER BY created_at DESC
                "#,
            )
            .bind(tag_filter)
            .fetch_all(&self.pool)
            .await?
        };

        Ok(decode_rows(rows))
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let uuid = parse_id(id)?;

        let result = sqlx::query(
            "UPDATE saved_resumes SET deleted_at = now() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(uuid)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("resume not found with ID: {id}")));
        }

        info!("Deleted resume {uuid}");
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}
