use async_trait::async_trait;

use super::domain::{Analysis, NewAnalysis};
use crate::accounts::UserId;
use crate::storage::RepositoryError;

/// Storage for analyzed journal entries. Rows are append-only.
#[async_trait]
pub trait AnalysisRepository: Send + Sync {
    async fn insert(&self, analysis: NewAnalysis) -> Result<Analysis, RepositoryError>;
    /// Analyses owned by `user_id`, newest first.
    async fn for_user(&self, user_id: UserId) -> Result<Vec<Analysis>, RepositoryError>;
}
