//! Journal entries: sentiment classification, history, and the mood dashboard.

pub mod dashboard;
pub mod domain;
mod lexicon;
pub mod repository;
pub mod router;
pub mod sentiment;
pub mod service;

#[cfg(test)]
mod tests;

pub use dashboard::{JournalDashboard, SentimentCounts, WeeklyBars};
pub use domain::{
    reading_time_minutes, text_preview, validate_entry, Analysis, AnalysisId, AnalysisSummary,
    JournalValidationError, NewAnalysis, MIN_ENTRY_CHARS,
};
pub use lexicon::PolarityAnalyzer;
pub use repository::AnalysisRepository;
pub use router::journal_router;
pub use sentiment::{
    ClassifierStrategy, ConfidenceScale, KeywordClassifier, PolarityClassifier, Sentiment,
    SentimentClassifier, SentimentLabel,
};
pub use service::{AnalysisResult, JournalService, JournalServiceError};
