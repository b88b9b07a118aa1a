//! Resume validation — pluggable, trait-based orchestration of scoring.
//!
//! `LocalValidator` runs the keyword scorer in-process. `DelegatedValidator`
//! forwards the whole document to the external analysis service and only
//! translates its response. `AppState` holds an `Arc<dyn ResumeValidator>`
//! chosen at startup from `SCORING_MODE`.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::info;

use crate::config::{Config, ScoringMode};
use crate::errors::AppError;
use crate::models::resume::ResumeData;
use crate::scoring::analysis_client::AnalysisClient;
use crate::scoring::{keyword, ScoreResult};

#[async_trait]
pub trait ResumeValidator: Send + Sync {
    async fn validate(
        &self,
        resume: &ResumeData,
        job_description: &str,
    ) -> Result<ScoreResult, AppError>;

    /// "local" | "delegated", for logs.
    fn mode(&self) -> &'static str;
}

/// Builds the validator selected by configuration.
pub fn build_validator(config: &Config) -> Result<Arc<dyn ResumeValidator>, AppError> {
    let validator: Arc<dyn ResumeValidator> = match config.scoring_mode {
        ScoringMode::Local => Arc::new(LocalValidator),
        ScoringMode::Delegated => {
            let client = AnalysisClient::new(
                config.analysis_service_url.clone(),
                Duration::from_secs(config.analysis_timeout_secs),
            )
            .map_err(|e| AppError::Internal(anyhow::anyhow!("analysis client: {e}")))?;
            info!("Delegating resume analysis to {}", client.base_url());
            Arc::new(DelegatedValidator::new(client))
        }
    };
    Ok(validator)
}

pub struct LocalValidator;

#[async_trait]
impl ResumeValidator for LocalValidator {
    async fn validate(
        &self,
        resume: &ResumeData,
        job_description: &str,
    ) -> Result<ScoreResult, AppError> {
        Ok(keyword::calculate(&resume.scoring_text(), job_description))
    }

    fn mode(&self) -> &'static str {
        "local"
    }
}

pub struct DelegatedValidator {
    client: AnalysisClient,
}

impl DelegatedValidator {
    pub fn new(client: AnalysisClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ResumeValidator for DelegatedValidator {
    async fn validate(
        &self,
        resume: &ResumeData,
        job_description: &str,
    ) -> Result<ScoreResult, AppError> {
        let analysis = self
            .client
            .analyze(resume, job_description)
            .await
            .map_err(|e| AppError::Analysis(e.to_string()))?;

        Ok(ScoreResult {
            score: analysis.score,
            missing_keywords: analysis.missing_keywords,
            feedback: analysis.feedback,
            reasoning: analysis.reasoning,
        })
    }

    fn mode(&self) -> &'static str {
        "delegated"
    }
}
