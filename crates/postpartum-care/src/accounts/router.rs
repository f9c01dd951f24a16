use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;

use super::domain::{Credentials, Registration, UserView};
use super::extract::{bearer_token, RequireUser};
use super::repository::UserRepository;
use super::service::{AccountError, AccountService};
use crate::storage::RepositoryError;

#[derive(Debug, Serialize)]
struct LoginResponse {
    token: String,
    token_type: &'static str,
    expires_at: DateTime<Utc>,
    user: UserView,
}

/// Router builder exposing registration, login, logout and the current identity.
pub fn account_router<U>(service: Arc<AccountService<U>>) -> Router
where
    U: UserRepository + 'static,
{
    Router::new()
        .route("/api/v1/auth/register", post(register_handler::<U>))
        .route("/api/v1/auth/login", post(login_handler::<U>))
        .route("/api/v1/auth/logout", post(logout_handler::<U>))
        .route("/api/v1/auth/me", get(me_handler::<U>))
        .with_state(service)
}

pub(crate) async fn register_handler<U>(
    State(service): State<Arc<AccountService<U>>>,
    Json(registration): Json<Registration>,
) -> Response
where
    U: UserRepository + 'static,
{
    match service.register(registration).await {
        Ok(user) => (StatusCode::CREATED, Json(user.view())).into_response(),
        Err(error) => account_error_response(error),
    }
}

pub(crate) async fn login_handler<U>(
    State(service): State<Arc<AccountService<U>>>,
    Json(credentials): Json<Credentials>,
) -> Response
where
    U: UserRepository + 'static,
{
    match service.login(credentials).await {
        Ok(outcome) => {
            let body = LoginResponse {
                token: outcome.session.token.0,
                token_type: "Bearer",
                expires_at: outcome.session.expires_at,
                user: outcome.user.view(),
            };
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(error) => account_error_response(error),
    }
}

pub(crate) async fn logout_handler<U>(
    State(service): State<Arc<AccountService<U>>>,
    RequireUser(_user): RequireUser,
    headers: HeaderMap,
) -> Response
where
    U: UserRepository + 'static,
{
    let Some(token) = bearer_token(&headers) else {
        return account_error_response(AccountError::Unauthenticated);
    };

    match service.logout(token) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => account_error_response(error),
    }
}

pub(crate) async fn me_handler<U>(
    State(service): State<Arc<AccountService<U>>>,
    RequireUser(user): RequireUser,
) -> Response
where
    U: UserRepository + 'static,
{
    match service.profile(user.user_id).await {
        Ok(profile) => (StatusCode::OK, Json(profile.view())).into_response(),
        Err(error) => account_error_response(error),
    }
}

fn account_error_response(error: AccountError) -> Response {
    let status = match &error {
        AccountError::InvalidRegistration(_) => StatusCode::UNPROCESSABLE_ENTITY,
        AccountError::UsernameTaken
        | AccountError::EmailTaken
        | AccountError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        AccountError::InvalidCredentials | AccountError::Unauthenticated => {
            StatusCode::UNAUTHORIZED
        }
        AccountError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        AccountError::Hashing
        | AccountError::Repository(
            RepositoryError::Unavailable(_)
            | RepositoryError::Invalid(_)
            | RepositoryError::Database(_),
        ) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let payload = json!({ "error": error.to_string() });
    (status, Json(payload)).into_response()
}
