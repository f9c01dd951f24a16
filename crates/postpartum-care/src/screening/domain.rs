use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::scoring::{ResultCategory, ScreeningOutcome};
use crate::accounts::UserId;

/// Identifier wrapper for completed screenings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ScreeningSessionId(pub u64);

/// Header row of a completed questionnaire. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreeningSession {
    pub id: ScreeningSessionId,
    pub user_id: UserId,
    pub total_score: u8,
    pub q10_score: u8,
    pub result_category: ResultCategory,
    pub created_at: DateTime<Utc>,
}

/// One answered item belonging to a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreeningResponse {
    pub session_id: ScreeningSessionId,
    pub question_number: u8,
    pub answer_value: u8,
}

/// A session together with its ten responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreeningRecord {
    pub session: ScreeningSession,
    pub responses: Vec<ScreeningResponse>,
}

impl ScreeningRecord {
    pub fn response_total(&self) -> u32 {
        self.responses
            .iter()
            .map(|response| u32::from(response.answer_value))
            .sum()
    }
}

/// Insert payload handed to the repository; ids are assigned on insert.
#[derive(Debug, Clone)]
pub struct NewScreeningSession {
    pub user_id: UserId,
    pub outcome: ScreeningOutcome,
    pub created_at: DateTime<Utc>,
}

impl NewScreeningSession {
    /// Materializes the stored rows once the repository has assigned `id`.
    pub fn into_record(self, id: ScreeningSessionId) -> ScreeningRecord {
        let responses = self
            .outcome
            .responses()
            .map(|(question_number, answer_value)| ScreeningResponse {
                session_id: id,
                question_number,
                answer_value,
            })
            .collect();

        ScreeningRecord {
            session: ScreeningSession {
                id,
                user_id: self.user_id,
                total_score: self.outcome.total_score(),
                q10_score: self.outcome.q10_score(),
                result_category: self.outcome.category(),
                created_at: self.created_at,
            },
            responses,
        }
    }
}
