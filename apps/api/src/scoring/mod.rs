// Resume scoring: the keyword scorer, the validator capability that picks
// between local scoring and the external analysis service, and its HTTP handler.

use serde::{Deserialize, Serialize};

pub mod analysis_client;
pub mod handlers;
pub mod keyword;
pub mod validator;

/// Outcome of validating a resume against a job description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResult {
    /// Percentage of JD keywords found in the resume, 0 – 100.
    pub score: u32,
    pub missing_keywords: Vec<String>,
    pub feedback: Vec<String>,
    /// Only present when the analysis service produced the score.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
}
