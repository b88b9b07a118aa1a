//! Keyword-overlap scorer. Pure, deterministic, never fails.
//!
//! Algorithm:
//! 1. Lower-case both inputs and split on anything that is not a letter or digit.
//! 2. Keywords = JD tokens longer than 3 bytes, minus stop words, deduplicated
//!    in first-seen order.
//! 3. score = matched / keywords × 100, truncated toward zero (0 when no keywords).
//! 4. One feedback line picked by the 50 / 80 thresholds.

use std::collections::HashSet;

use unicode_general_category::{get_general_category, GeneralCategory};

use crate::scoring::ScoreResult;

const STOP_WORDS: &[&str] = &["and", "the", "for", "with", "this", "that"];
const MIN_KEYWORD_LEN: usize = 4;

pub const FEEDBACK_REWORK: &str = "Resume is missing many critical keywords. Consider rewriting.";
pub const FEEDBACK_IMPROVABLE: &str =
    "Good match, but could be improved by adding specific technical terms.";
pub const FEEDBACK_EXCELLENT: &str = "Excellent match! High probability of passing ATS.";

/// Scores `resume_text` against the keywords of `job_description`.
pub fn calculate(resume_text: &str, job_description: &str) -> ScoreResult {
    let keywords = extract_keywords(job_description);
    let resume_tokens: HashSet<String> = tokenize(resume_text).collect();

    let mut matched = 0usize;
    let mut missing_keywords = Vec::new();
    for keyword in &keywords {
        if resume_tokens.contains(keyword) {
            matched += 1;
        } else {
            missing_keywords.push(keyword.clone());
        }
    }

    let score = if keywords.is_empty() {
        0
    } else {
        (matched as f64 / keywords.len() as f64 * 100.0) as u32
    };

    ScoreResult {
        score,
        missing_keywords,
        feedback: vec![feedback_for(score).to_string()],
        reasoning: None,
    }
}

/// Lower-cases `text` and yields its runs of letters and numbers.
fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !is_letter_or_number(c))
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
}

/// General category L* or N*. Combining marks (Mn, Mc) are separators even
/// where `char::is_alphabetic` would accept them.
fn is_letter_or_number(c: char) -> bool {
    use GeneralCategory::*;
    matches!(
        get_general_category(c),
        UppercaseLetter
            | LowercaseLetter
            | TitlecaseLetter
            | ModifierLetter
            | OtherLetter
            | DecimalNumber
            | LetterNumber
            | OtherNumber
    )
}

fn extract_keywords(job_description: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    tokenize(job_description)
        .filter(|token| token.len() >= MIN_KEYWORD_LEN && !STOP_WORDS.contains(&token.as_str()))
        .filter(|token| seen.insert(token.clone()))
        .collect()
}

fn feedback_for(score: u32) -> &'static str {
    if score < 50 {
        FEEDBACK_REWORK
    } else if score < 80 {
        FEEDBACK_IMPROVABLE
    } else {
        FEEDBACK_EXCELLENT
    }
}
