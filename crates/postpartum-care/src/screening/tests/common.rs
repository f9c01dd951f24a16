use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request};
use axum::response::Response;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::{Map, Value};

use crate::accounts::{AuthenticatedUser, UserId};
use crate::screening::{
    AnswerSheet, NewScreeningSession, ScreeningRecord, ScreeningRepository, ScreeningService,
    ScreeningSession, ScreeningSessionId,
};
use crate::storage::{InMemoryScreeningRepository, RepositoryError};

pub(super) const MAYA: UserId = UserId(1);
pub(super) const NOOR: UserId = UserId(2);

pub(super) fn build_service() -> (
    ScreeningService<InMemoryScreeningRepository>,
    Arc<InMemoryScreeningRepository>,
) {
    let repository = Arc::new(InMemoryScreeningRepository::default());
    (ScreeningService::new(repository.clone()), repository)
}

pub(super) fn sheet(values: [i64; 10]) -> AnswerSheet {
    AnswerSheet::from_ordered(values).expect("ten answers")
}

pub(super) fn form(values: [i64; 10]) -> Map<String, Value> {
    values
        .iter()
        .enumerate()
        .map(|(index, value)| (format!("q{}", index + 1), Value::from(*value)))
        .collect()
}

pub(super) fn at_hour(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 2, 3, hour, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) struct UnavailableRepository;

#[async_trait]
impl ScreeningRepository for UnavailableRepository {
    async fn insert(
        &self,
        _session: NewScreeningSession,
    ) -> Result<ScreeningRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    async fn fetch(
        &self,
        _id: ScreeningSessionId,
    ) -> Result<Option<ScreeningRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    async fn for_user(&self, _user_id: UserId) -> Result<Vec<ScreeningSession>, RepositoryError> {
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
