use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_operational_routes;
use axum::{Extension, Router};
use axum_prometheus::PrometheusMetricLayer;
use postpartum_care::app::{InMemoryCareServices, SqliteCareServices};
use postpartum_care::config::{AppConfig, StorageBackend};
use postpartum_care::error::AppError;
use postpartum_care::storage::Database;
use postpartum_care::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let api = match &config.database.backend {
        StorageBackend::Memory => {
            warn!("DATABASE_URL=memory: accounts and history are lost on restart");
            InMemoryCareServices::in_memory(&config.auth, config.journal.sentiment_strategy)
                .router()
        }
        StorageBackend::Sqlite { url } => sqlite_router(url, &config).await?,
    };

    let app = with_operational_routes(api)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        strategy = %config.journal.sentiment_strategy,
        "postpartum care service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}

async fn sqlite_router(url: &str, config: &AppConfig) -> Result<Router, AppError> {
    let database = Database::connect(url).await?;
    info!(url, "database ready");
    let services =
        SqliteCareServices::with_database(&database, &config.auth, config.journal.sentiment_strategy);
    Ok(services.router())
}
