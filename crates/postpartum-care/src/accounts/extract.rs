use std::sync::Arc;

use axum::async_trait;
use axum::extract::{FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::http::{header, HeaderMap, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

use super::domain::AuthenticatedUser;
use super::repository::UserRepository;
use super::service::{AccountError, AccountService};

/// Pulls the token out of `Authorization: Bearer <token>`.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Resolves the bearer token and stores the identity in request extensions.
///
/// Requests without a token pass through untouched so public routes keep working;
/// protected handlers reject them through [`RequireUser`]. A token that does not resolve
/// is answered with 401 immediately.
pub async fn auth_middleware<U>(
    State(accounts): State<Arc<AccountService<U>>>,
    mut request: Request,
    next: Next,
) -> Response
where
    U: UserRepository + 'static,
{
    let Some(token) = bearer_token(request.headers()).map(str::to_string) else {
        return next.run(request).await;
    };

    match accounts.authenticate(&token).await {
        Ok(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(AccountError::Repository(err)) => {
            error!(error = %err, "session lookup failed");
            let payload = json!({ "error": "authentication unavailable" });
            (StatusCode::SERVICE_UNAVAILABLE, Json(payload)).into_response()
        }
        Err(_) => AuthRejection.into_response(),
    }
}

/// Extractor for handlers that need a signed-in user.
#[derive(Debug, Clone)]
pub struct RequireUser(pub AuthenticatedUser);

#[async_trait]
impl<S> FromRequestParts<S> for RequireUser
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .map(RequireUser)
            .ok_or(AuthRejection)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct AuthRejection;

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let payload = json!({ "error": AccountError::Unauthenticated.to_string() });
        (StatusCode::UNAUTHORIZED, Json(payload)).into_response()
    }
}
