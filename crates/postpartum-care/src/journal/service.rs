use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use tracing::info;

use super::dashboard::JournalDashboard;
use super::domain::{
    validate_entry, Analysis, AnalysisId, AnalysisSummary, JournalValidationError, NewAnalysis,
};
use super::repository::AnalysisRepository;
use super::sentiment::{ClassifierStrategy, ConfidenceScale, SentimentClassifier, SentimentLabel};
use crate::accounts::UserId;
use crate::pagination::{Page, PageRequest};
use crate::storage::RepositoryError;
use crate::support::{emergency_contacts, EmergencyContact};

/// Classifies journal entries and keeps each user's analysis history.
pub struct JournalService<R> {
    repository: Arc<R>,
    classifier: Arc<dyn SentimentClassifier>,
}

/// Response body for a freshly analyzed entry.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    pub id: AnalysisId,
    pub created_at: DateTime<Utc>,
    pub text: String,
    pub sentiment: SentimentLabel,
    pub sentiment_display: &'static str,
    pub confidence: f64,
    pub strategy: ClassifierStrategy,
    pub native_scale: ConfidenceScale,
    pub native_confidence: f64,
    pub word_count: usize,
    pub reading_time_minutes: u32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub support_contacts: Vec<EmergencyContact>,
}

impl<R> JournalService<R>
where
    R: AnalysisRepository + 'static,
{
    pub fn new(repository: Arc<R>, strategy: ClassifierStrategy) -> Self {
        Self::with_classifier(repository, strategy.classifier())
    }

    pub fn with_classifier(repository: Arc<R>, classifier: Arc<dyn SentimentClassifier>) -> Self {
        Self {
            repository,
            classifier,
        }
    }

    pub fn strategy(&self) -> ClassifierStrategy {
        self.classifier.strategy()
    }

    /// Validate, classify and store one entry.
    pub async fn analyze(
        &self,
        user_id: UserId,
        text: &str,
    ) -> Result<Analysis, JournalServiceError> {
        self.analyze_at(user_id, text, Utc::now()).await
    }

    pub async fn analyze_at(
        &self,
        user_id: UserId,
        text: &str,
        now: DateTime<Utc>,
    ) -> Result<Analysis, JournalServiceError> {
        let text = validate_entry(text)?;
        let sentiment = self.classifier.classify(text);

        let analysis = self
            .repository
            .insert(NewAnalysis {
                user_id,
                text: text.to_string(),
                sentiment,
                created_at: now,
            })
            .await?;

        info!(
            user_id = user_id.0,
            analysis_id = analysis.id.0,
            sentiment = sentiment.label.as_str(),
            strategy = self.strategy().as_str(),
            "journal entry analyzed"
        );
        Ok(analysis)
    }

    /// Shape a stored analysis for the response, in the active strategy's native scale.
    pub fn result_view(&self, analysis: Analysis) -> AnalysisResult {
        let strategy = self.strategy();
        let native_scale = strategy.native_scale();
        let support_contacts = if analysis.label() == SentimentLabel::Negative {
            emergency_contacts().to_vec()
        } else {
            Vec::new()
        };

        AnalysisResult {
            id: analysis.id,
            created_at: analysis.created_at,
            sentiment: analysis.label(),
            sentiment_display: analysis.label().display_name(),
            confidence: analysis.sentiment.confidence,
            strategy,
            native_scale,
            native_confidence: analysis.sentiment.confidence_on(native_scale),
            word_count: analysis.word_count(),
            reading_time_minutes: analysis.reading_time_minutes(),
            support_contacts,
            text: analysis.text,
        }
    }

    pub async fn history(
        &self,
        user_id: UserId,
        request: PageRequest,
    ) -> Result<Page<AnalysisSummary>, JournalServiceError> {
        let analyses = self.repository.for_user(user_id).await?;
        Ok(Page::from_ordered(analyses, request).map(|analysis| AnalysisSummary::from(&analysis)))
    }

    pub async fn dashboard(
        &self,
        user_id: UserId,
        today: NaiveDate,
    ) -> Result<JournalDashboard, JournalServiceError> {
        let analyses = self.repository.for_user(user_id).await?;
        Ok(JournalDashboard::build(&analyses, today))
    }
}

/// Error raised by the journal service.
#[derive(Debug, thiserror::Error)]
pub enum JournalServiceError {
    #[error(transparent)]
    Validation(#[from] JournalValidationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
