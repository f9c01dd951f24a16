use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::{lock, RepositoryError, Table};
use crate::accounts::{NewUser, User, UserId, UserRepository};
use crate::journal::{Analysis, AnalysisId, AnalysisRepository, NewAnalysis};
use crate::screening::{
    NewScreeningSession, ScreeningRecord, ScreeningRepository, ScreeningSession,
    ScreeningSessionId,
};

#[derive(Default, Clone)]
pub struct InMemoryUserRepository {
    users: Arc<Mutex<Table<User>>>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: NewUser) -> Result<User, RepositoryError> {
        let mut table = lock(&self.users, "user")?;
        let duplicate = table.rows().iter().any(|existing| {
            existing.username == user.username || existing.email.eq_ignore_ascii_case(&user.email)
        });
        if duplicate {
            return Err(RepositoryError::Conflict);
        }

        let stored = User {
            id: UserId(table.allocate_id()),
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            created_at: user.created_at,
        };
        table.push(stored.clone());
        Ok(stored)
    }

    async fn fetch(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let table = lock(&self.users, "user")?;
        Ok(table.rows().iter().find(|user| user.id == id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError> {
        let table = lock(&self.users, "user")?;
        Ok(table
            .rows()
            .iter()
            .find(|user| user.username == username)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        let table = lock(&self.users, "user")?;
        Ok(table
            .rows()
            .iter()
            .find(|user| user.email.eq_ignore_ascii_case(email))
            .cloned())
    }
}

#[derive(Default, Clone)]
pub struct InMemoryAnalysisRepository {
    analyses: Arc<Mutex<Table<Analysis>>>,
}

#[async_trait]
impl AnalysisRepository for InMemoryAnalysisRepository {
    async fn insert(&self, analysis: NewAnalysis) -> Result<Analysis, RepositoryError> {
        let mut table = lock(&self.analyses, "analysis")?;
        let stored = analysis.into_analysis(AnalysisId(table.allocate_id()));
        table.push(stored.clone());
        Ok(stored)
    }

    async fn for_user(&self, user_id: UserId) -> Result<Vec<Analysis>, RepositoryError> {
        let table = lock(&self.analyses, "analysis")?;
        let mut owned: Vec<Analysis> = table
            .rows()
            .iter()
            .filter(|analysis| analysis.user_id == user_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(owned)
    }
}

#[derive(Default, Clone)]
pub struct InMemoryScreeningRepository {
    sessions: Arc<Mutex<Table<ScreeningRecord>>>,
}

#[async_trait]
impl ScreeningRepository for InMemoryScreeningRepository {
    async fn insert(&self, session: NewScreeningSession) -> Result<ScreeningRecord, RepositoryError> {
        let mut table = lock(&self.sessions, "screening session")?;
        let record = session.into_record(ScreeningSessionId(table.allocate_id()));
        table.push(record.clone());
        Ok(record)
    }

    async fn fetch(&self, id: ScreeningSessionId) -> Result<Option<ScreeningRecord>, RepositoryError> {
        let table = lock(&self.sessions, "screening session")?;
        Ok(table
            .rows()
            .iter()
            .find(|record| record.session.id == id)
            .cloned())
    }

    async fn for_user(&self, user_id: UserId) -> Result<Vec<ScreeningSession>, RepositoryError> {
        let table = lock(&self.sessions, "screening session")?;
        let mut owned: Vec<ScreeningSession> = table
            .rows()
            .iter()
            .filter(|record| record.session.user_id == user_id)
            .map(|record| record.session.clone())
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(owned)
    }
}
