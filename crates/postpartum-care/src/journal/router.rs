use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use super::repository::AnalysisRepository;
use super::service::{JournalService, JournalServiceError};
use crate::accounts::RequireUser;
use crate::pagination::PageQuery;

#[derive(Debug, Deserialize)]
pub(crate) struct AnalyzeRequest {
    #[serde(default)]
    pub(crate) text: String,
}

/// Router builder for journal analysis, history and the dashboard. Every route needs a session.
pub fn journal_router<R>(service: Arc<JournalService<R>>) -> Router
where
    R: AnalysisRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/journal/analyses",
            get(history_handler::<R>).post(analyze_handler::<R>),
        )
        .route("/api/v1/journal/dashboard", get(dashboard_handler::<R>))
        .with_state(service)
}

pub(crate) async fn analyze_handler<R>(
    State(service): State<Arc<JournalService<R>>>,
    RequireUser(user): RequireUser,
    Json(request): Json<AnalyzeRequest>,
) -> Response
where
    R: AnalysisRepository + 'static,
{
    match service.analyze(user.user_id, &request.text).await {
        Ok(analysis) => {
            let view = service.result_view(analysis);
            (StatusCode::CREATED, Json(view)).into_response()
        }
        Err(error) => journal_error_response(error),
    }
}

pub(crate) async fn history_handler<R>(
    State(service): State<Arc<JournalService<R>>>,
    RequireUser(user): RequireUser,
    Query(query): Query<PageQuery>,
) -> Response
where
    R: AnalysisRepository + 'static,
{
    match service.history(user.user_id, query.into()).await {
        Ok(page) => (StatusCode::OK, Json(page)).into_response(),
        Err(error) => journal_error_response(error),
    }
}

pub(crate) async fn dashboard_handler<R>(
    State(service): State<Arc<JournalService<R>>>,
    RequireUser(user): RequireUser,
) -> Response
where
    R: AnalysisRepository + 'static,
{
    match service.dashboard(user.user_id, Utc::now().date_naive()).await {
        Ok(dashboard) => (StatusCode::OK, Json(dashboard)).into_response(),
        Err(error) => journal_error_response(error),
    }
}

fn journal_error_response(error: JournalServiceError) -> Response {
    let status = match &error {
        JournalServiceError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        JournalServiceError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({ "error": error.to_string() });
    (status, Json(payload)).into_response()
}
