//! Analysis client: the single point of contact with the external resume
//! analysis service used in delegated scoring mode.
//!
//! Calls are made exactly once. There is no retry or backoff here; a failed
//! call surfaces to the caller as-is.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::models::resume::ResumeData;

const ANALYZE_PATH: &str = "/api/v1/analyze";

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Serialize)]
struct AnalyzeRequest<'a> {
    resume: &'a ResumeData,
    job_description: &'a str,
}

/// Response body of the analysis service. Absent fields default.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AnalyzeResponse {
    pub score: u32,
    pub reasoning: Option<String>,
    pub feedback: Vec<String>,
    pub missing_keywords: Vec<String>,
}

#[derive(Clone)]
pub struct AnalysisClient {
    client: Client,
    base_url: String,
}

impl AnalysisClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, AnalysisError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            base_url: base_url.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Sends the full resume and job description for analysis.
    pub async fn analyze(
        &self,
        resume: &ResumeData,
        job_description: &str,
    ) -> Result<AnalyzeResponse, AnalysisError> {
        let url = format!("{}{}", self.base_url, ANALYZE_PATH);
        let response = self
            .client
            .post(&url)
            .json(&AnalyzeRequest {
                resume,
                job_description,
            })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(AnalysisError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let analysis: AnalyzeResponse = serde_json::from_str(&body)?;
        debug!(
            "Analysis call succeeded: score={}, missing_keywords={}",
            analysis.score,
            analysis.missing_keywords.len()
        );
        Ok(analysis)
    }
}
