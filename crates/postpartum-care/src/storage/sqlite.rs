//! SQLite persistence for accounts, journal analyses and screenings.

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;

use super::RepositoryError;
use crate::accounts::{NewUser, User, UserId, UserRepository};
use crate::journal::{
    Analysis, AnalysisId, AnalysisRepository, NewAnalysis, Sentiment, SentimentLabel,
};
use crate::screening::{
    NewScreeningSession, ResultCategory, ScreeningRecord, ScreeningRepository, ScreeningResponse,
    ScreeningSession, ScreeningSessionId,
};

const MAX_CONNECTIONS: u32 = 5;
const MEMORY_URL: &str = "sqlite::memory:";

/// Connection pool over a migrated SQLite database.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens the database at `url`, creating the file if needed, and applies pending
    /// migrations.
    pub async fn connect(url: &str) -> Result<Self, RepositoryError> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        // Every connection to `:memory:` opens its own empty database.
        let pool_options = if is_memory(url) {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None::<Duration>)
                .max_lifetime(None::<Duration>)
        } else {
            SqlitePoolOptions::new().max_connections(MAX_CONNECTIONS)
        };

        let pool = pool_options.connect_with(options).await?;
        let database = Self { pool };
        database.migrate().await?;
        Ok(database)
    }

    /// A private database that disappears with the pool.
    pub async fn in_memory() -> Result<Self, RepositoryError> {
        Self::connect(MEMORY_URL).await
    }

    async fn migrate(&self) -> Result<(), RepositoryError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|error| RepositoryError::Unavailable(format!("migration failed: {error}")))
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }

    pub fn users(&self) -> SqliteUserRepository {
        SqliteUserRepository {
            pool: self.pool.clone(),
        }
    }

    pub fn analyses(&self) -> SqliteAnalysisRepository {
        SqliteAnalysisRepository {
            pool: self.pool.clone(),
        }
    }

    pub fn screenings(&self) -> SqliteScreeningRepository {
        SqliteScreeningRepository {
            pool: self.pool.clone(),
        }
    }
}

fn is_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

#[derive(Debug, Clone)]
pub struct SqliteUserRepository {
    pool: SqlitePool,
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn insert(&self, user: NewUser) -> Result<User, RepositoryError> {
        let created_at = normalize(user.created_at)?;
        let result = sqlx::query(
            r#"
            INSERT INTO users (username, email, password_hash, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(user.username.as_str())
        .bind(user.email.as_str())
        .bind(user.password_hash.as_str())
        .bind(created_at.timestamp_micros())
        .execute(&self.pool)
        .await
        .map_err(insert_error)?;

        Ok(User {
            id: UserId(row_id(result.last_insert_rowid())?),
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            created_at,
        })
    }

    async fn fetch(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let Some(id) = db_id(id.0) else {
            return Ok(None);
        };
        let row = sqlx::query(
            "SELECT id, username, email, password_hash, created_at FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(user_from_row).transpose()
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query(
            "SELECT id, username, email, password_hash, created_at FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(user_from_row).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        // `email` is declared COLLATE NOCASE.
        let row = sqlx::query(
            "SELECT id, username, email, password_hash, created_at FROM users WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(user_from_row).transpose()
    }
}

fn user_from_row(row: &SqliteRow) -> Result<User, RepositoryError> {
    Ok(User {
        id: UserId(row_id(row.try_get("id")?)?),
        username: row.try_get("username")?,
        email: row.try_get("email")?,
        password_hash: row.try_get("password_hash")?,
        created_at: from_micros(row.try_get("created_at")?)?,
    })
}

#[derive(Debug, Clone)]
pub struct SqliteAnalysisRepository {
    pool: SqlitePool,
}

#[async_trait]
impl AnalysisRepository for SqliteAnalysisRepository {
    async fn insert(&self, analysis: NewAnalysis) -> Result<Analysis, RepositoryError> {
        let user_id = owner_id(analysis.user_id)?;
        let created_at = normalize(analysis.created_at)?;
        let result = sqlx::query(
            r#"
            INSERT INTO analyses (user_id, text, sentiment, confidence, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(user_id)
        .bind(analysis.text.as_str())
        .bind(analysis.sentiment.label.as_str())
        .bind(analysis.sentiment.confidence)
        .bind(created_at.timestamp_micros())
        .execute(&self.pool)
        .await?;

        let id = AnalysisId(row_id(result.last_insert_rowid())?);
        Ok(NewAnalysis {
            created_at,
            ..analysis
        }
        .into_analysis(id))
    }

    async fn for_user(&self, user_id: UserId) -> Result<Vec<Analysis>, RepositoryError> {
        let Some(user_id) = db_id(user_id.0) else {
            return Ok(Vec::new());
        };
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, text, sentiment, confidence, created_at
            FROM analyses
            WHERE user_id = ?
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(analysis_from_row).collect()
    }
}

fn analysis_from_row(row: &SqliteRow) -> Result<Analysis, RepositoryError> {
    let raw_label: String = row.try_get("sentiment")?;
    let label = SentimentLabel::parse(&raw_label)
        .ok_or_else(|| RepositoryError::Invalid(format!("unknown sentiment '{raw_label}'")))?;

    Ok(Analysis {
        id: AnalysisId(row_id(row.try_get("id")?)?),
        user_id: UserId(row_id(row.try_get("user_id")?)?),
        text: row.try_get("text")?,
        sentiment: Sentiment::new(label, row.try_get("confidence")?),
        created_at: from_micros(row.try_get("created_at")?)?,
    })
}

#[derive(Debug, Clone)]
pub struct SqliteScreeningRepository {
    pool: SqlitePool,
}

#[async_trait]
impl ScreeningRepository for SqliteScreeningRepository {
    /// The session header and its responses are written in one transaction.
    async fn insert(
        &self,
        session: NewScreeningSession,
    ) -> Result<ScreeningRecord, RepositoryError> {
        let user_id = owner_id(session.user_id)?;
        let created_at = normalize(session.created_at)?;
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            INSERT INTO screening_sessions (user_id, total_score, q10_score, result_category, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(user_id)
        .bind(i64::from(session.outcome.total_score()))
        .bind(i64::from(session.outcome.q10_score()))
        .bind(session.outcome.category().as_str())
        .bind(created_at.timestamp_micros())
        .execute(&mut *tx)
        .await?;

        let session_id = result.last_insert_rowid();
        let record = NewScreeningSession {
            created_at,
            ..session
        }
        .into_record(ScreeningSessionId(row_id(session_id)?));

        for response in &record.responses {
            sqlx::query(
                r#"
                INSERT INTO screening_responses (session_id, question_number, answer_value)
                VALUES (?, ?, ?)
                "#,
            )
            .bind(session_id)
            .bind(i64::from(response.question_number))
            .bind(i64::from(response.answer_value))
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(record)
    }

    async fn fetch(
        &self,
        id: ScreeningSessionId,
    ) -> Result<Option<ScreeningRecord>, RepositoryError> {
        let Some(session_id) = db_id(id.0) else {
            return Ok(None);
        };
        let row = sqlx::query(
            r#"
            SELECT id, user_id, total_score, q10_score, result_category, created_at
            FROM screening_sessions
            WHERE id = ?
            "#,
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await?;
        let Some(row) = row else {
            return Ok(None);
        };
        let session = session_from_row(&row)?;

        let rows = sqlx::query(
            r#"
            SELECT question_number, answer_value
            FROM screening_responses
            WHERE session_id = ?
            ORDER BY question_number
            "#,
        )
        .bind(session_id)
        .fetch_all(&self.pool)
        .await?;

        let responses = rows
            .iter()
            .map(|row| {
                Ok(ScreeningResponse {
                    session_id: session.id,
                    question_number: small(row.try_get("question_number")?, "question_number")?,
                    answer_value: small(row.try_get("answer_value")?, "answer_value")?,
                })
            })
            .collect::<Result<Vec<_>, RepositoryError>>()?;

        Ok(Some(ScreeningRecord { session, responses }))
    }

    async fn for_user(&self, user_id: UserId) -> Result<Vec<ScreeningSession>, RepositoryError> {
        let Some(user_id) = db_id(user_id.0) else {
            return Ok(Vec::new());
        };
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, total_score, q10_score, result_category, created_at
            FROM screening_sessions
            WHERE user_id = ?
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(session_from_row).collect()
    }
}

fn session_from_row(row: &SqliteRow) -> Result<ScreeningSession, RepositoryError> {
    let raw_category: String = row.try_get("result_category")?;
    let result_category = ResultCategory::parse(&raw_category).ok_or_else(|| {
        RepositoryError::Invalid(format!("unknown result category '{raw_category}'"))
    })?;

    Ok(ScreeningSession {
        id: ScreeningSessionId(row_id(row.try_get("id")?)?),
        user_id: UserId(row_id(row.try_get("user_id")?)?),
        total_score: small(row.try_get("total_score")?, "total_score")?,
        q10_score: small(row.try_get("q10_score")?, "q10_score")?,
        result_category,
        created_at: from_micros(row.try_get("created_at")?)?,
    })
}

fn insert_error(error: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(database) = &error {
        if database.is_unique_violation() {
            return RepositoryError::Conflict;
        }
    }
    RepositoryError::Database(error)
}

/// SQLite rowids are signed; ids past `i64::MAX` cannot exist.
fn db_id(id: u64) -> Option<i64> {
    i64::try_from(id).ok()
}

fn owner_id(user_id: UserId) -> Result<i64, RepositoryError> {
    db_id(user_id.0)
        .ok_or_else(|| RepositoryError::Invalid(format!("user id {} out of range", user_id.0)))
}

fn row_id(raw: i64) -> Result<u64, RepositoryError> {
    u64::try_from(raw).map_err(|_| RepositoryError::Invalid(format!("negative row id {raw}")))
}

fn small(raw: i64, column: &str) -> Result<u8, RepositoryError> {
    u8::try_from(raw).map_err(|_| RepositoryError::Invalid(format!("{column} out of range: {raw}")))
}

fn from_micros(raw: i64) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::from_timestamp_micros(raw)
        .ok_or_else(|| RepositoryError::Invalid(format!("timestamp out of range: {raw}")))
}

/// Timestamps are stored at microsecond precision; returned records match what a later
/// read yields.
fn normalize(at: DateTime<Utc>) -> Result<DateTime<Utc>, RepositoryError> {
    from_micros(at.timestamp_micros())
}
