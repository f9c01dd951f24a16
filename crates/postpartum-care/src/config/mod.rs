use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

use chrono::Duration;

use crate::journal::ClassifierStrategy;

const DEFAULT_SESSION_TTL_HOURS: i64 = 720;
/// Upper bound for `APP_SESSION_TTL_HOURS` (ten years).
pub const MAX_SESSION_TTL_HOURS: i64 = 24 * 365 * 10;
const DEFAULT_PASSWORD_ITERATIONS: u32 = 600_000;
const DEFAULT_DATABASE_URL: &str = "sqlite://postpartum-care.db";
const MEMORY_DATABASE_URL: &str = "memory";

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub auth: AuthConfig,
    pub journal: JournalConfig,
    pub database: DatabaseConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let session_ttl_hours = match env::var("APP_SESSION_TTL_HOURS") {
            Ok(raw) => raw
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|hours| (1..=MAX_SESSION_TTL_HOURS).contains(hours))
                .ok_or(ConfigError::InvalidSessionTtl)?,
            Err(_) => DEFAULT_SESSION_TTL_HOURS,
        };

        let password_iterations = match env::var("APP_PASSWORD_ITERATIONS") {
            Ok(raw) => raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|iterations| *iterations > 0)
                .ok_or(ConfigError::InvalidPasswordIterations)?,
            Err(_) => DEFAULT_PASSWORD_ITERATIONS,
        };

        let sentiment_strategy = match env::var("APP_SENTIMENT_STRATEGY") {
            Ok(raw) => ClassifierStrategy::parse(&raw)
                .ok_or(ConfigError::InvalidSentimentStrategy { value: raw })?,
            Err(_) => ClassifierStrategy::Polarity,
        };

        let backend = StorageBackend::from_url(
            env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
        )?;

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            auth: AuthConfig {
                session_ttl_hours,
                password_iterations,
            },
            journal: JournalConfig { sentiment_strategy },
            database: DatabaseConfig { backend },
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Credential hashing and bearer session lifetime.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub session_ttl_hours: i64,
    pub password_iterations: u32,
}

impl AuthConfig {
    /// Token lifetime, held within one hour and [`MAX_SESSION_TTL_HOURS`].
    pub fn session_ttl(&self) -> Duration {
        Duration::hours(self.session_ttl_hours.clamp(1, MAX_SESSION_TTL_HOURS))
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_ttl_hours: DEFAULT_SESSION_TTL_HOURS,
            password_iterations: DEFAULT_PASSWORD_ITERATIONS,
        }
    }
}

/// Selects which sentiment strategy backs journal analyses.
#[derive(Debug, Clone)]
pub struct JournalConfig {
    pub sentiment_strategy: ClassifierStrategy,
}

/// Where accounts, analyses and screenings are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    /// Process-local tables; everything is lost on restart.
    Memory,
    Sqlite { url: String },
}

impl StorageBackend {
    fn from_url(raw: String) -> Result<Self, ConfigError> {
        let url = raw.trim();
        if url.eq_ignore_ascii_case(MEMORY_DATABASE_URL) {
            return Ok(Self::Memory);
        }
        if url.starts_with("sqlite:") {
            return Ok(Self::Sqlite {
                url: url.to_string(),
            });
        }
        Err(ConfigError::InvalidDatabaseUrl { value: raw })
    }
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub backend: StorageBackend,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidSessionTtl,
    InvalidPasswordIterations,
    InvalidSentimentStrategy { value: String },
    InvalidDatabaseUrl { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidSessionTtl => write!(
                f,
                "APP_SESSION_TTL_HOURS must be an integer between 1 and {MAX_SESSION_TTL_HOURS}"
            ),
            ConfigError::InvalidPasswordIterations => {
                write!(f, "APP_PASSWORD_ITERATIONS must be a positive integer")
            }
            ConfigError::InvalidSentimentStrategy { value } => write!(
                f,
                "APP_SENTIMENT_STRATEGY must be 'polarity' or 'keyword' (found '{value}')"
            ),
            ConfigError::InvalidDatabaseUrl { value } => write!(
                f,
                "DATABASE_URL must be a sqlite: URL or 'memory' (found '{value}')"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidSessionTtl
            | ConfigError::InvalidPasswordIterations
            | ConfigError::InvalidSentimentStrategy { .. }
            | ConfigError::InvalidDatabaseUrl { .. } => None,
        }
    }
}
