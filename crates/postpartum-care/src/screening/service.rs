use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use super::domain::{NewScreeningSession, ScreeningRecord, ScreeningSessionId};
use super::repository::ScreeningRepository;
use super::scoring::{score, AnswerSheet, ScoringError};
use super::views::ScreeningSummary;
use crate::accounts::UserId;
use crate::pagination::{Page, PageRequest};
use crate::storage::RepositoryError;

/// Scores questionnaires and keeps each user's screening history.
pub struct ScreeningService<R> {
    repository: Arc<R>,
}

impl<R> ScreeningService<R>
where
    R: ScreeningRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Score a complete answer sheet and persist the session with its responses.
    pub async fn submit(
        &self,
        user_id: UserId,
        sheet: &AnswerSheet,
    ) -> Result<ScreeningRecord, ScreeningServiceError> {
        self.submit_at(user_id, sheet, Utc::now()).await
    }

    pub async fn submit_at(
        &self,
        user_id: UserId,
        sheet: &AnswerSheet,
        now: DateTime<Utc>,
    ) -> Result<ScreeningRecord, ScreeningServiceError> {
        let outcome = score(sheet)?;
        let record = self
            .repository
            .insert(NewScreeningSession {
                user_id,
                outcome,
                created_at: now,
            })
            .await?;

        let session = &record.session;
        if session.result_category.is_urgent() {
            warn!(
                user_id = user_id.0,
                session_id = session.id.0,
                q10_score = session.q10_score,
                "screening flagged self-harm risk"
            );
        } else {
            info!(
                user_id = user_id.0,
                session_id = session.id.0,
                total_score = session.total_score,
                category = session.result_category.as_str(),
                "screening recorded"
            );
        }

        Ok(record)
    }

    pub async fn history(
        &self,
        user_id: UserId,
        request: PageRequest,
    ) -> Result<Page<ScreeningSummary>, ScreeningServiceError> {
        let sessions = self.repository.for_user(user_id).await?;
        Ok(Page::from_ordered(sessions, request).map(|session| ScreeningSummary::from(&session)))
    }

    /// Sessions belonging to someone else are indistinguishable from missing ones.
    pub async fn get(
        &self,
        user_id: UserId,
        session_id: ScreeningSessionId,
    ) -> Result<ScreeningRecord, ScreeningServiceError> {
        let record = self
            .repository
            .fetch(session_id)
            .await?
            .filter(|record| record.session.user_id == user_id)
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }
}

/// Error raised by the screening service.
#[derive(Debug, thiserror::Error)]
pub enum ScreeningServiceError {
    #[error(transparent)]
    Scoring(#[from] ScoringError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
