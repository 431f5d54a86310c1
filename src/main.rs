//! Live Quiz engine entry point.
//!
//! Wires the adapters selected by configuration, starts the session sweeper
//! and runs until Ctrl+C.

use std::error::Error;
use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use live_quiz::adapters::{
    InMemoryArchiveRepository, InMemoryEventBus, InMemoryPinStore, InMemoryQuizRepository,
    InMemorySessionStore, PostgresArchiveRepository, RedisPinStore, SessionSweeper,
};
use live_quiz::application::{GameCommandBus, GameServices};
use live_quiz::config::{AppConfig, DatabaseConfig, RedisConfig, ServerConfig};
use live_quiz::domain::foundation::EventEnvelope;
use live_quiz::ports::{ActivePinStore, SessionArchiveRepository};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config.server);
    config.validate()?;

    tracing::info!(environment = ?config.server.environment, "Starting live quiz engine");

    let pins: Arc<dyn ActivePinStore> = match &config.redis {
        Some(redis) => Arc::new(connect_redis(redis).await?),
        None => {
            tracing::info!("No Redis configured, tracking PINs in process");
            Arc::new(InMemoryPinStore::new())
        }
    };

    let archive: Arc<dyn SessionArchiveRepository> = match &config.database {
        Some(database) => Arc::new(connect_postgres(database).await?),
        None => {
            tracing::warn!("No database configured, finished games are kept in memory only");
            Arc::new(InMemoryArchiveRepository::new())
        }
    };

    let sessions = Arc::new(InMemorySessionStore::with_config(
        pins.clone(),
        config.game.store_config(),
    ));
    let events = Arc::new(InMemoryEventBus::new());
    let quizzes = Arc::new(InMemoryQuizRepository::new());
    match &config.game.quiz_dir {
        Some(dir) => {
            let loaded = quizzes.load_dir(dir).await?;
            tracing::info!(dir = %dir, quizzes = loaded, "Quiz content loaded");
        }
        None => tracing::warn!("No quiz directory configured, games cannot be created"),
    }

    // Transport adapters attach to the bus.
    let _bus = GameCommandBus::new(GameServices {
        quizzes,
        sessions: sessions.clone(),
        pins,
        archive,
        events: events.clone(),
        pin_max_attempts: config.game.pin_max_attempts,
        max_nickname_length: config.game.max_nickname_length,
    });

    let event_log = tokio::spawn(log_events(events.subscribe()));
    let sweeper = SessionSweeper::start(sessions, config.game.sweeper_config());

    tracing::info!("Live quiz engine ready");
    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown signal received");

    sweeper.stop().await;
    event_log.abort();

    tracing::info!("Live quiz engine stopped");
    Ok(())
}

fn init_tracing(server: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&server.log_level));
    let registry = tracing_subscriber::registry().with(filter);

    if server.json_logs() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn connect_redis(config: &RedisConfig) -> Result<RedisPinStore, Box<dyn Error>> {
    let client = ::redis::Client::open(config.url.as_str())?;
    let conn =
        tokio::time::timeout(config.timeout(), client.get_multiplexed_tokio_connection()).await??;
    tracing::info!(key = %config.pin_set_key, "Connected to Redis PIN registry");
    Ok(RedisPinStore::new(conn).with_key(config.pin_set_key.clone()))
}

async fn connect_postgres(
    config: &DatabaseConfig,
) -> Result<PostgresArchiveRepository, Box<dyn Error>> {
    let pool = PgPoolOptions::new()
        .min_connections(config.min_connections)
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout())
        .connect(&config.url)
        .await?;

    if config.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Archive migrations applied");
    }

    tracing::info!(max_connections = config.max_connections, "Connected to archive database");
    Ok(PostgresArchiveRepository::new(pool))
}

async fn log_events(mut events: broadcast::Receiver<EventEnvelope>) {
    loop {
        match events.recv().await {
            Ok(event) => tracing::debug!(
                event_type = %event.event_type,
                aggregate_id = %event.aggregate_id,
                "Game event"
            ),
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "Event log fell behind")
            }
            Err(RecvError::Closed) => break,
        }
    }
}
