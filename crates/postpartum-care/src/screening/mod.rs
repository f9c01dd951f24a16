//! EPDS questionnaire: the question bank, scoring and triage, and stored screenings.

pub mod domain;
pub mod questions;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;
pub mod views;

#[cfg(test)]
mod tests;

pub use domain::{
    NewScreeningSession, ScreeningRecord, ScreeningResponse, ScreeningSession, ScreeningSessionId,
};
pub use questions::{
    all_questions, get_question, AnswerOption, Question, QuestionBankError, QUESTION_COUNT,
    SELF_HARM_QUESTION,
};
pub use repository::ScreeningRepository;
pub use router::screening_router;
pub use scoring::{
    score, AnswerSheet, ResultCategory, ScoringError, ScreeningOutcome, MAX_TOTAL_SCORE,
    PPD_CUTOFF,
};
pub use service::{ScreeningService, ScreeningServiceError};
pub use views::{ResponseView, ScreeningResultView, ScreeningSummary};
