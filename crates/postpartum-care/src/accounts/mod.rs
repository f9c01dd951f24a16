//! User accounts, password hashing, and bearer-token sessions.

pub mod domain;
pub mod extract;
pub mod password;
pub mod repository;
pub mod router;
pub mod service;
pub mod sessions;

pub use domain::{
    AuthenticatedUser, Credentials, NewUser, Registration, User, UserId, UserView,
};
pub use extract::{auth_middleware, bearer_token, AuthRejection, RequireUser};
pub use password::PasswordHasher;
pub use repository::UserRepository;
pub use router::account_router;
pub use service::{AccountError, AccountService, LoginOutcome};
pub use sessions::{AuthSession, SessionStore, SessionToken};
