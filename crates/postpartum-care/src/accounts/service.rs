use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{error, info};

use super::domain::{AuthenticatedUser, Credentials, NewUser, Registration, User, UserId};
use super::password::PasswordHasher;
use super::repository::UserRepository;
use super::sessions::{AuthSession, SessionStore};
use crate::config::AuthConfig;
use crate::storage::RepositoryError;

pub const MIN_PASSWORD_LEN: usize = 8;

/// Registration, login and bearer-token resolution.
pub struct AccountService<U> {
    users: Arc<U>,
    sessions: SessionStore,
    hasher: PasswordHasher,
    placeholder_hash: String,
    session_ttl: Duration,
}

/// Successful login: the issued session and the account it belongs to.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub session: AuthSession,
    pub user: User,
}

impl<U> AccountService<U>
where
    U: UserRepository + 'static,
{
    pub fn new(users: Arc<U>, config: &AuthConfig) -> Self {
        Self::with_sessions(users, SessionStore::default(), config)
    }

    pub fn with_sessions(users: Arc<U>, sessions: SessionStore, config: &AuthConfig) -> Self {
        let hasher = PasswordHasher::new(config.password_iterations);
        Self {
            users,
            sessions,
            placeholder_hash: hasher.placeholder(),
            hasher,
            session_ttl: config.session_ttl(),
        }
    }

    pub async fn register(&self, registration: Registration) -> Result<User, AccountError> {
        let username = registration.username.trim().to_string();
        let email = registration.email.trim().to_string();

        if username.is_empty() {
            return Err(AccountError::InvalidRegistration("username is required"));
        }
        if email.is_empty() || !email.contains('@') {
            return Err(AccountError::InvalidRegistration(
                "a valid email address is required",
            ));
        }
        if registration.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AccountError::InvalidRegistration(
                "password must be at least 8 characters",
            ));
        }

        if self.users.find_by_username(&username).await?.is_some() {
            return Err(AccountError::UsernameTaken);
        }
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AccountError::EmailTaken);
        }

        let hasher = self.hasher;
        let password = registration.password;
        let password_hash = tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(hashing_failed)?;

        let user = self
            .users
            .insert(NewUser {
                username,
                email,
                password_hash,
                created_at: Utc::now(),
            })
            .await?;

        info!(user_id = user.id.0, "account registered");
        Ok(user)
    }

    pub async fn login(&self, credentials: Credentials) -> Result<LoginOutcome, AccountError> {
        self.login_at(credentials, Utc::now()).await
    }

    /// Unknown usernames are checked against a placeholder hash so both failures cost a
    /// full key derivation.
    pub async fn login_at(
        &self,
        credentials: Credentials,
        now: DateTime<Utc>,
    ) -> Result<LoginOutcome, AccountError> {
        let user = self
            .users
            .find_by_username(credentials.username.trim())
            .await?;

        let hasher = self.hasher;
        let stored = user
            .as_ref()
            .map_or_else(|| self.placeholder_hash.clone(), |user| user.password_hash.clone());
        let password = credentials.password;
        let verified = tokio::task::spawn_blocking(move || hasher.verify(&password, &stored))
            .await
            .map_err(hashing_failed)?;

        let user = user
            .filter(|_| verified)
            .ok_or(AccountError::InvalidCredentials)?;

        let session = self.sessions.issue(user.id, now, self.session_ttl)?;
        info!(user_id = user.id.0, expires_at = %session.expires_at, "session issued");
        Ok(LoginOutcome { session, user })
    }

    pub fn logout(&self, token: &str) -> Result<(), AccountError> {
        if self.sessions.revoke(token)? {
            Ok(())
        } else {
            Err(AccountError::Unauthenticated)
        }
    }

    pub async fn authenticate(&self, token: &str) -> Result<AuthenticatedUser, AccountError> {
        self.authenticate_at(token, Utc::now()).await
    }

    pub async fn authenticate_at(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<AuthenticatedUser, AccountError> {
        let session = self
            .sessions
            .resolve(token, now)?
            .ok_or(AccountError::Unauthenticated)?;
        let user = self
            .users
            .fetch(session.user_id)
            .await?
            .ok_or(AccountError::Unauthenticated)?;

        Ok(AuthenticatedUser {
            user_id: user.id,
            username: user.username,
        })
    }

    pub async fn profile(&self, user_id: UserId) -> Result<User, AccountError> {
        self.users
            .fetch(user_id)
            .await?
            .ok_or(AccountError::Repository(RepositoryError::NotFound))
    }
}

fn hashing_failed(join_error: tokio::task::JoinError) -> AccountError {
    error!(error = %join_error, "password hashing task failed");
    AccountError::Hashing
}

/// Error raised by the account service.
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error("{0}")]
    InvalidRegistration(&'static str),
    #[error("username already taken")]
    UsernameTaken,
    #[error("email already registered")]
    EmailTaken,
    #[error("invalid username or password")]
    InvalidCredentials,
    #[error("authentication required")]
    Unauthenticated,
    #[error("password hashing failed")]
    Hashing,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MAX_SESSION_TTL_HOURS;
    use crate::storage::InMemoryUserRepository;

    fn service_with_ttl(session_ttl_hours: i64) -> AccountService<InMemoryUserRepository> {
        let config = AuthConfig {
            session_ttl_hours,
            password_iterations: 8,
        };
        AccountService::new(Arc::new(InMemoryUserRepository::default()), &config)
    }

    fn service() -> AccountService<InMemoryUserRepository> {
        service_with_ttl(2)
    }

    fn registration(username: &str, email: &str) -> Registration {
        Registration {
            username: username.to_string(),
            email: email.to_string(),
            password: "sleepless-nights".to_string(),
        }
    }

    fn credentials(username: &str, password: &str) -> Credentials {
        Credentials {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn register_trims_and_stores_hash_only() {
        let service = service();
        let user = service
            .register(registration("  maya ", " maya@example.com "))
            .await
            .expect("registers");
        assert_eq!(user.username, "maya");
        assert_eq!(user.email, "maya@example.com");
        assert!(user.password_hash.starts_with("pbkdf2:sha256:8$"));
        assert!(!user.password_hash.contains("sleepless"));
    }

    #[tokio::test]
    async fn register_rejects_duplicates_and_bad_input() {
        let service = service();
        service
            .register(registration("maya", "maya@example.com"))
            .await
            .expect("registers");

        assert!(matches!(
            service
                .register(registration("maya", "other@example.com"))
                .await,
            Err(AccountError::UsernameTaken)
        ));
        assert!(matches!(
            service
                .register(registration("other", "MAYA@example.com"))
                .await,
            Err(AccountError::EmailTaken)
        ));
        assert!(matches!(
            service.register(registration("   ", "x@example.com")).await,
            Err(AccountError::InvalidRegistration(_))
        ));
        assert!(matches!(
            service
                .register(registration("noemail", "not-an-email"))
                .await,
            Err(AccountError::InvalidRegistration(_))
        ));

        let mut short = registration("shorty", "shorty@example.com");
        short.password = "short".to_string();
        assert!(matches!(
            service.register(short).await,
            Err(AccountError::InvalidRegistration(_))
        ));
    }

    #[tokio::test]
    async fn login_issues_token_that_authenticates_until_expiry() {
        let service = service();
        let user = service
            .register(registration("maya", "maya@example.com"))
            .await
            .expect("registers");

        let now = Utc::now();
        let outcome = service
            .login_at(credentials("maya", "sleepless-nights"), now)
            .await
            .expect("logs in");
        assert_eq!(outcome.user.id, user.id);
        assert_eq!(outcome.session.expires_at, now + Duration::hours(2));

        let token = outcome.session.token.as_str();
        let identity = service
            .authenticate_at(token, now + Duration::minutes(30))
            .await
            .expect("authenticates");
        assert_eq!(identity.user_id, user.id);
        assert_eq!(identity.username, "maya");

        assert!(matches!(
            service
                .authenticate_at(token, now + Duration::hours(3))
                .await,
            Err(AccountError::Unauthenticated)
        ));
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_user_look_the_same() {
        let service = service();
        service
            .register(registration("maya", "maya@example.com"))
            .await
            .expect("registers");

        let wrong = service
            .login(credentials("maya", "wrong-password"))
            .await
            .expect_err("rejects");
        let unknown = service
            .login(credentials("nobody", "sleepless-nights"))
            .await
            .expect_err("rejects");
        assert!(matches!(wrong, AccountError::InvalidCredentials));
        assert!(matches!(unknown, AccountError::InvalidCredentials));
        assert_eq!(wrong.to_string(), unknown.to_string());
    }

    #[tokio::test]
    async fn unknown_user_is_checked_against_a_real_hash() {
        let service = service();
        let placeholder = service.placeholder_hash.clone();
        assert!(placeholder.starts_with("pbkdf2:sha256:8$"));

        // Whatever the password, the placeholder never admits anyone.
        for password in ["", "sleepless-nights", placeholder.as_str()] {
            assert!(matches!(
                service.login(credentials("ghost", password)).await,
                Err(AccountError::InvalidCredentials)
            ));
        }
    }

    #[tokio::test]
    async fn longest_configured_ttl_still_issues_sessions() {
        let service = service_with_ttl(i64::MAX);
        service
            .register(registration("maya", "maya@example.com"))
            .await
            .expect("registers");

        let now = Utc::now();
        let outcome = service
            .login_at(credentials("maya", "sleepless-nights"), now)
            .await
            .expect("logs in");
        assert_eq!(
            outcome.session.expires_at,
            now + Duration::hours(MAX_SESSION_TTL_HOURS)
        );
    }

    #[tokio::test]
    async fn logout_revokes_token() {
        let service = service();
        service
            .register(registration("maya", "maya@example.com"))
            .await
            .expect("registers");
        let outcome = service
            .login(credentials("maya", "sleepless-nights"))
            .await
            .expect("logs in");
        let token = outcome.session.token.as_str();

        service.logout(token).expect("logs out");
        assert!(matches!(
            service.authenticate(token).await,
            Err(AccountError::Unauthenticated)
        ));
        assert!(matches!(
            service.logout(token),
            Err(AccountError::Unauthenticated)
        ));
    }
}
