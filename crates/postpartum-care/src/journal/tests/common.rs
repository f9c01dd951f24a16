use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request};
use axum::response::Response;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use crate::accounts::{AuthenticatedUser, UserId};
use crate::journal::{
    Analysis, AnalysisRepository, ClassifierStrategy, JournalService, NewAnalysis,
};
use crate::storage::{InMemoryAnalysisRepository, RepositoryError};

pub(super) const MAYA: UserId = UserId(1);
pub(super) const NOOR: UserId = UserId(2);

pub(super) fn build_service(
    strategy: ClassifierStrategy,
) -> (
    JournalService<InMemoryAnalysisRepository>,
    Arc<InMemoryAnalysisRepository>,
) {
    let repository = Arc::new(InMemoryAnalysisRepository::default());
    let service = JournalService::new(repository.clone(), strategy);
    (service, repository)
}

pub(super) fn at_minute(minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 4, 14, 8, minute, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) struct UnavailableRepository;

#[async_trait]
impl AnalysisRepository for UnavailableRepository {
    async fn insert(&self, _analysis: NewAnalysis) -> Result<Analysis, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    async fn for_user(&self, _user_id: UserId) -> Result<Vec<Analysis>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) fn signed_in(user_id: UserId) -> AuthenticatedUser {
    AuthenticatedUser {
        user_id,
        username: format!("user-{}", user_id.0),
    }
}

pub(super) fn json_request(
    method: Method,
    uri: &str,
    user: Option<AuthenticatedUser>,
    body: Option<Value>,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(user) = user {
        builder = builder.extension(user);
    }
    let body = match body {
        Some(value) => Body::from(serde_json::to_vec(&value).expect("serialize body")),
        None => Body::empty(),
    };
    builder.body(body).expect("request")
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
