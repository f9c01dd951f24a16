//! Assembles the domain routers behind the bearer-token middleware.

use std::sync::Arc;

use axum::middleware::from_fn_with_state;
use axum::Router;

use crate::accounts::{account_router, auth_middleware, AccountService, UserRepository};
use crate::config::AuthConfig;
use crate::journal::{journal_router, AnalysisRepository, ClassifierStrategy, JournalService};
use crate::screening::{screening_router, ScreeningRepository, ScreeningService};
use crate::storage::{
    Database, InMemoryAnalysisRepository, InMemoryScreeningRepository, InMemoryUserRepository,
    SqliteAnalysisRepository, SqliteScreeningRepository, SqliteUserRepository,
};
use crate::support::support_router;

/// The services behind the HTTP surface, each shared with its router.
pub struct CareServices<U, A, S> {
    pub accounts: Arc<AccountService<U>>,
    pub journal: Arc<JournalService<A>>,
    pub screening: Arc<ScreeningService<S>>,
}

pub type InMemoryCareServices =
    CareServices<InMemoryUserRepository, InMemoryAnalysisRepository, InMemoryScreeningRepository>;

pub type SqliteCareServices =
    CareServices<SqliteUserRepository, SqliteAnalysisRepository, SqliteScreeningRepository>;

impl InMemoryCareServices {
    /// Nothing survives a restart; meant for tests and throwaway demos.
    pub fn in_memory(auth: &AuthConfig, strategy: ClassifierStrategy) -> Self {
        Self::new(
            InMemoryUserRepository::default(),
            InMemoryAnalysisRepository::default(),
            InMemoryScreeningRepository::default(),
            auth,
            strategy,
        )
    }
}

impl SqliteCareServices {
    pub fn with_database(
        database: &Database,
        auth: &AuthConfig,
        strategy: ClassifierStrategy,
    ) -> Self {
        Self::new(
            database.users(),
            database.analyses(),
            database.screenings(),
            auth,
            strategy,
        )
    }
}

impl<U, A, S> CareServices<U, A, S>
where
    U: UserRepository + 'static,
    A: AnalysisRepository + 'static,
    S: ScreeningRepository + 'static,
{
    pub fn new(
        users: U,
        analyses: A,
        screenings: S,
        auth: &AuthConfig,
        strategy: ClassifierStrategy,
    ) -> Self {
        Self {
            accounts: Arc::new(AccountService::new(Arc::new(users), auth)),
            journal: Arc::new(JournalService::new(Arc::new(analyses), strategy)),
            screening: Arc::new(ScreeningService::new(Arc::new(screenings))),
        }
    }

    /// Every `/api/v1` route. Tokens are resolved once here; protected handlers then
    /// demand an identity through `RequireUser`.
    pub fn router(&self) -> Router {
        Router::new()
            .merge(account_router(self.accounts.clone()))
            .merge(screening_router(self.screening.clone()))
            .merge(journal_router(self.journal.clone()))
            .merge(support_router())
            .layer(from_fn_with_state(
                self.accounts.clone(),
                auth_middleware::<U>,
            ))
    }
}
