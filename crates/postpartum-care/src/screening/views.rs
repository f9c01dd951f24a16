use chrono::{DateTime, Utc};
use serde::Serialize;

use super::domain::{ScreeningRecord, ScreeningSession, ScreeningSessionId};
use super::questions::get_question;
use super::scoring::{ResultCategory, MAX_TOTAL_SCORE};
use crate::support::{emergency_contacts, EmergencyContact};

/// History row for a completed screening.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScreeningSummary {
    pub id: ScreeningSessionId,
    pub created_at: DateTime<Utc>,
    pub total_score: u8,
    pub result_category: ResultCategory,
    pub category_label: &'static str,
    pub urgent: bool,
}

impl From<&ScreeningSession> for ScreeningSummary {
    fn from(session: &ScreeningSession) -> Self {
        Self {
            id: session.id,
            created_at: session.created_at,
            total_score: session.total_score,
            result_category: session.result_category,
            category_label: session.result_category.label(),
            urgent: session.result_category.is_urgent(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponseView {
    pub question_number: u8,
    pub prompt: &'static str,
    pub answer_value: u8,
    pub answer_text: Option<&'static str>,
}

/// Full result page: the scores, what they mean, and each answer alongside its question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScreeningResultView {
    pub id: ScreeningSessionId,
    pub created_at: DateTime<Utc>,
    pub total_score: u8,
    pub max_score: u8,
    pub q10_score: u8,
    pub result_category: ResultCategory,
    pub category_label: &'static str,
    pub guidance: &'static str,
    pub urgent: bool,
    pub responses: Vec<ResponseView>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub emergency_contacts: Vec<EmergencyContact>,
}

impl From<&ScreeningRecord> for ScreeningResultView {
    fn from(record: &ScreeningRecord) -> Self {
        let session = &record.session;
        let category = session.result_category;

        let responses = record
            .responses
            .iter()
            .filter_map(|response| {
                let question = get_question(u32::from(response.question_number)).ok()?;
                Some(ResponseView {
                    question_number: response.question_number,
                    prompt: question.prompt,
                    answer_value: response.answer_value,
                    answer_text: question
                        .option_for(response.answer_value)
                        .map(|option| option.text),
                })
            })
            .collect();

        let emergency_contacts = if category.is_urgent() {
            emergency_contacts().to_vec()
        } else {
            Vec::new()
        };

        Self {
            id: session.id,
            created_at: session.created_at,
            total_score: session.total_score,
            max_score: MAX_TOTAL_SCORE,
            q10_score: session.q10_score,
            result_category: category,
            category_label: category.label(),
            guidance: category.guidance(),
            urgent: category.is_urgent(),
            responses,
            emergency_contacts,
        }
    }
}
