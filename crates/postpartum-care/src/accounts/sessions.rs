use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::domain::UserId;
use crate::storage::{lock, RepositoryError};

/// Opaque bearer token handed to clients at login.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SessionToken(pub String);

impl SessionToken {
    fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthSession {
    pub token: SessionToken,
    pub user_id: UserId,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl AuthSession {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Live bearer sessions keyed by token.
#[derive(Debug, Default, Clone)]
pub struct SessionStore {
    sessions: Arc<Mutex<HashMap<String, AuthSession>>>,
}

impl SessionStore {
    /// Expired sessions are swept before the new one is stored.
    pub fn issue(
        &self,
        user_id: UserId,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<AuthSession, RepositoryError> {
        let expires_at = now.checked_add_signed(ttl).ok_or_else(|| {
            RepositoryError::Invalid(format!("session lifetime {ttl} overflows the clock"))
        })?;
        let session = AuthSession {
            token: SessionToken::generate(),
            user_id,
            issued_at: now,
            expires_at,
        };
        let mut sessions = lock(&self.sessions, "session")?;
        sessions.retain(|_, live| !live.is_expired(now));
        sessions.insert(session.token.0.clone(), session.clone());
        Ok(session)
    }

    /// Returns the live session for `token`; expired sessions are dropped on sight.
    pub fn resolve(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<AuthSession>, RepositoryError> {
        let mut sessions = lock(&self.sessions, "session")?;
        let expired = match sessions.get(token) {
            Some(session) => session.is_expired(now),
            None => return Ok(None),
        };
        if expired {
            sessions.remove(token);
            return Ok(None);
        }
        Ok(sessions.get(token).cloned())
    }

    pub fn revoke(&self, token: &str) -> Result<bool, RepositoryError> {
        let mut sessions = lock(&self.sessions, "session")?;
        Ok(sessions.remove(token).is_some())
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.sessions.lock().map(|sessions| sessions.len()).unwrap_or(0)
    }
}
