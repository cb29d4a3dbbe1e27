//! Kardiverse server
//!
//! Composition root: loads configuration, wires adapters to ports and
//! serves the HTTP API until Ctrl-C.

use std::error::Error;
use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;

use kardiverse::adapters::http::{api_router, LegacyAppState, WakeRoomAppState};
use kardiverse::adapters::postgres::{
    PostgresExperienceRepository, PostgresLicenseReader, PostgresLicenseRepository,
    PostgresSessionReader, PostgresSessionRepository,
};
use kardiverse::adapters::{InMemoryEventBus, InMemoryLicenseStore, InMemoryWakeRoomStore};
use kardiverse::config::{AppConfig, DatabaseConfig};
use kardiverse::ports::EventPublisher;

type BoxError = Box<dyn Error + Send + Sync>;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

fn load_configuration() -> Result<AppConfig, BoxError> {
    let config = AppConfig::load()?;
    config.validate()?;
    Ok(config)
}

/// JSON logs in production, human-readable elsewhere. `RUST_LOG` wins
/// over the configured level.
fn init_logging(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    if config.is_production() {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    }
}

async fn run(config: AppConfig) -> Result<(), BoxError> {
    tracing::info!("Starting Kardiverse v{}", env!("CARGO_PKG_VERSION"));

    let event_publisher: Arc<dyn EventPublisher> = Arc::new(InMemoryEventBus::new());

    let (legacy_state, wakeroom_state) = if config.database.is_configured() {
        let pool = connect(&config.database).await?;
        (
            LegacyAppState {
                license_repository: Arc::new(PostgresLicenseRepository::new(pool.clone())),
                license_reader: Arc::new(PostgresLicenseReader::new(pool.clone())),
                event_publisher: event_publisher.clone(),
            },
            WakeRoomAppState {
                experience_repository: Arc::new(PostgresExperienceRepository::new(pool.clone())),
                experience_reader: Arc::new(PostgresExperienceRepository::new(pool.clone())),
                session_repository: Arc::new(PostgresSessionRepository::new(pool.clone())),
                session_reader: Arc::new(PostgresSessionReader::new(pool)),
                event_publisher,
            },
        )
    } else {
        tracing::warn!("No database configured, using in-memory storage");
        let licenses = Arc::new(InMemoryLicenseStore::new());
        let wakeroom = Arc::new(InMemoryWakeRoomStore::new());
        (
            LegacyAppState {
                license_repository: licenses.clone(),
                license_reader: licenses,
                event_publisher: event_publisher.clone(),
            },
            WakeRoomAppState {
                experience_repository: wakeroom.clone(),
                experience_reader: wakeroom.clone(),
                session_repository: wakeroom.clone(),
                session_reader: wakeroom,
                event_publisher,
            },
        )
    };

    let app = api_router(legacy_state, wakeroom_state, &config.server);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, environment = ?config.server.environment, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn connect(database: &DatabaseConfig) -> Result<sqlx::PgPool, BoxError> {
    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(database.max_connections)
        .min_connections(database.min_connections)
        .acquire_timeout(database.acquire_timeout())
        .connect(&database.url)
        .await?;

    if database.run_migrations {
        tracing::info!("Running database migrations...");
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Database migrations complete");
    }

    Ok(pool)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
