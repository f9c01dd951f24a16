use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::sentiment::{ConfidenceScale, Sentiment, SentimentLabel};
use crate::accounts::UserId;

/// Entries shorter than this (after trimming) are rejected before classification.
pub const MIN_ENTRY_CHARS: usize = 10;
pub const PREVIEW_CHARS: usize = 30;
pub const WORDS_PER_MINUTE: usize = 200;

const PREVIEW_ELLIPSIS: &str = "...";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AnalysisId(pub u64);

/// A stored journal entry and the sentiment assigned to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub id: AnalysisId,
    pub user_id: UserId,
    pub text: String,
    pub sentiment: Sentiment,
    pub created_at: DateTime<Utc>,
}

impl Analysis {
    pub fn label(&self) -> SentimentLabel {
        self.sentiment.label
    }

    pub fn preview(&self) -> String {
        text_preview(&self.text)
    }

    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }

    pub fn reading_time_minutes(&self) -> u32 {
        reading_time_minutes(self.word_count())
    }
}

#[derive(Debug, Clone)]
pub struct NewAnalysis {
    pub user_id: UserId,
    pub text: String,
    pub sentiment: Sentiment,
    pub created_at: DateTime<Utc>,
}

impl NewAnalysis {
    pub fn into_analysis(self, id: AnalysisId) -> Analysis {
        Analysis {
            id,
            user_id: self.user_id,
            text: self.text,
            sentiment: self.sentiment,
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JournalValidationError {
    #[error("journal entry must be at least {minimum} characters (got {actual})")]
    TooShort { minimum: usize, actual: usize },
}

/// Trims the entry and enforces the minimum length.
pub fn validate_entry(text: &str) -> Result<&str, JournalValidationError> {
    let trimmed = text.trim();
    let actual = trimmed.chars().count();
    if actual < MIN_ENTRY_CHARS {
        return Err(JournalValidationError::TooShort {
            minimum: MIN_ENTRY_CHARS,
            actual,
        });
    }
    Ok(trimmed)
}

pub fn text_preview(text: &str) -> String {
    if text.chars().count() <= PREVIEW_CHARS {
        return text.to_string();
    }
    let mut preview: String = text
        .chars()
        .take(PREVIEW_CHARS - PREVIEW_ELLIPSIS.len())
        .collect();
    preview.push_str(PREVIEW_ELLIPSIS);
    preview
}

/// Whole minutes at 200 words per minute, rounding half to even, never below one.
pub fn reading_time_minutes(words: usize) -> u32 {
    let minutes = (words as f64 / WORDS_PER_MINUTE as f64).round_ties_even();
    (minutes as u32).max(1)
}

/// History row: the entry preview with its sentiment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisSummary {
    pub id: AnalysisId,
    pub created_at: DateTime<Utc>,
    pub text_preview: String,
    pub sentiment: SentimentLabel,
    pub sentiment_display: &'static str,
    pub confidence: f64,
    pub confidence_percent: f64,
}

impl From<&Analysis> for AnalysisSummary {
    fn from(analysis: &Analysis) -> Self {
        Self {
            id: analysis.id,
            created_at: analysis.created_at,
            text_preview: analysis.preview(),
            sentiment: analysis.label(),
            sentiment_display: analysis.label().display_name(),
            confidence: analysis.sentiment.confidence,
            confidence_percent: analysis.sentiment.confidence_on(ConfidenceScale::Percent),
        }
    }
}
