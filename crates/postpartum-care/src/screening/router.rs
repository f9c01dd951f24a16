use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Map, Value};

use super::domain::ScreeningSessionId;
use super::questions::{all_questions, get_question, Question};
use super::repository::ScreeningRepository;
use super::scoring::{AnswerSheet, ScoringError};
use super::service::{ScreeningService, ScreeningServiceError};
use super::views::ScreeningResultView;
use crate::accounts::RequireUser;
use crate::pagination::PageQuery;
use crate::storage::RepositoryError;

/// Accepts `{"q1": 0, ...}` or the same map nested under `answers`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum SubmissionBody {
    Wrapped { answers: Map<String, Value> },
    Flat(Map<String, Value>),
}

impl SubmissionBody {
    fn fields(&self) -> &Map<String, Value> {
        match self {
            SubmissionBody::Wrapped { answers } => answers,
            SubmissionBody::Flat(fields) => fields,
        }
    }
}

/// Router builder for the question bank (public) and screening sessions (signed in).
pub fn screening_router<R>(service: Arc<ScreeningService<R>>) -> Router
where
    R: ScreeningRepository + 'static,
{
    Router::new()
        .route("/api/v1/screening/questions", get(questions_handler))
        .route(
            "/api/v1/screening/questions/:number",
            get(question_handler),
        )
        .route(
            "/api/v1/screening/sessions",
            get(history_handler::<R>).post(submit_handler::<R>),
        )
        .route(
            "/api/v1/screening/sessions/:session_id",
            get(session_handler::<R>),
        )
        .with_state(service)
}

async fn questions_handler() -> Json<&'static [Question]> {
    Json(all_questions())
}

pub(crate) async fn question_handler(Path(number): Path<u32>) -> Response {
    match get_question(number) {
        Ok(question) => (StatusCode::OK, Json(question)).into_response(),
        Err(error) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::NOT_FOUND, Json(payload)).into_response()
        }
    }
}

pub(crate) async fn submit_handler<R>(
    State(service): State<Arc<ScreeningService<R>>>,
    RequireUser(user): RequireUser,
    Json(body): Json<SubmissionBody>,
) -> Response
where
    R: ScreeningRepository + 'static,
{
    let sheet = match AnswerSheet::from_fields(body.fields()) {
        Ok(sheet) => sheet,
        Err(error) => return screening_error_response(error.into()),
    };

    match service.submit(user.user_id, &sheet).await {
        Ok(record) => {
            let view = ScreeningResultView::from(&record);
            (StatusCode::CREATED, Json(view)).into_response()
        }
        Err(error) => screening_error_response(error),
    }
}

pub(crate) async fn history_handler<R>(
    State(service): State<Arc<ScreeningService<R>>>,
    RequireUser(user): RequireUser,
    Query(query): Query<PageQuery>,
) -> Response
where
    R: ScreeningRepository + 'static,
{
    match service.history(user.user_id, query.into()).await {
        Ok(page) => (StatusCode::OK, Json(page)).into_response(),
        Err(error) => screening_error_response(error),
    }
}

pub(crate) async fn session_handler<R>(
    State(service): State<Arc<ScreeningService<R>>>,
    RequireUser(user): RequireUser,
    Path(session_id): Path<u64>,
) -> Response
where
    R: ScreeningRepository + 'static,
{
    match service.get(user.user_id, ScreeningSessionId(session_id)).await {
        Ok(record) => (StatusCode::OK, Json(ScreeningResultView::from(&record))).into_response(),
        Err(error) => screening_error_response(error),
    }
}

fn screening_error_response(error: ScreeningServiceError) -> Response {
    match error {
        ScreeningServiceError::Scoring(scoring) => scoring_error_response(&scoring),
        ScreeningServiceError::Repository(RepositoryError::NotFound) => {
            let payload = json!({ "error": "screening session not found" });
            (StatusCode::NOT_FOUND, Json(payload)).into_response()
        }
        ScreeningServiceError::Repository(other) => {
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}

fn scoring_error_response(error: &ScoringError) -> Response {
    let payload = match error.question() {
        Some(question) => json!({ "error": error.to_string(), "question": question }),
        None => json!({ "error": error.to_string() }),
    };
    (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response()
}
