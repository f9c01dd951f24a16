use async_trait::async_trait;

use super::domain::{NewScreeningSession, ScreeningRecord, ScreeningSession, ScreeningSessionId};
use crate::accounts::UserId;
use crate::storage::RepositoryError;

/// Storage for completed screenings.
///
/// `insert` must store the session and all of its responses as one unit.
#[async_trait]
pub trait ScreeningRepository: Send + Sync {
    async fn insert(
        &self,
        session: NewScreeningSession,
    ) -> Result<ScreeningRecord, RepositoryError>;
    async fn fetch(
        &self,
        id: ScreeningSessionId,
    ) -> Result<Option<ScreeningRecord>, RepositoryError>;
    /// Sessions owned by `user_id`, newest first.
    async fn for_user(&self, user_id: UserId) -> Result<Vec<ScreeningSession>, RepositoryError>;
}
