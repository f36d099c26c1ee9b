//! contacts_service - Contact registry API
//!
//! Stores contacts, lists them through a streamed regex exclusion filter,
//! and announces each creation on a messaging channel.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{middleware, Router};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use contacts_service::api::{self, AppState};
use contacts_service::filter::PatternCompiler;
use contacts_service::notifier::{EventNotifier, HttpTransport};
use contacts_service::store::{ContactStore, InMemoryContactStore, PgContactStore};
use contacts_service::{db, Config, ContactService, StorageBackend};

/// Longest wait for queued events to go out after the server stops
const NOTIFIER_DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

/// Initialize tracing/logging
fn init_tracing(json: bool) {
    let json_layer = json.then(|| tracing_subscriber::fmt::layer().json());
    let plain_layer = (!json).then(tracing_subscriber::fmt::layer);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "contacts_service=debug,tower_http=debug".into()),
        )
        .with(json_layer)
        .with(plain_layer)
        .init();
}

/// Build the application router
fn build_router(state: AppState) -> Router {
    // Axum layers run last-added first: correlation -> logging -> handler
    let api_routes = api::create_router()
        .layer(middleware::from_fn(api::middleware::logging_middleware))
        .layer(middleware::from_fn(api::middleware::correlation_middleware));

    Router::new()
        .route("/health", axum::routing::get(health_check))
        .merge(api_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Open the configured contact store, returning the pool when there is one
async fn open_store(config: &Config) -> anyhow::Result<(Arc<dyn ContactStore>, Option<PgPool>)> {
    match &config.storage {
        StorageBackend::Postgres { database_url } => {
            tracing::info!("Connecting to database...");

            let pool = PgPoolOptions::new()
                .max_connections(config.database_max_connections)
                .connect(database_url)
                .await?;

            db::verify_connection(&pool).await?;
            if !db::check_schema(&pool).await? {
                tracing::error!("Database schema is not complete. Please run migrations.");
                return Err(anyhow::anyhow!("Database schema incomplete"));
            }

            tracing::info!("Database connected successfully");
            let store: Arc<dyn ContactStore> = Arc::new(PgContactStore::new(pool.clone()));
            Ok((store, Some(pool)))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory contact store; contacts are lost on restart");
            let store: Arc<dyn ContactStore> = Arc::new(InMemoryContactStore::new());
            Ok((store, None))
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    init_tracing(config.is_production());

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    tracing::info!("Starting contacts_service");

    let (store, pool) = open_store(&config).await?;

    let transport = Arc::new(HttpTransport::new(&config.notifier)?);
    let (notifier, worker) = EventNotifier::spawn(&config.notifier, transport);
    let stats = notifier.stats_handle();
    tracing::info!(
        channel = %config.notifier.channel,
        endpoints = ?config.notifier.endpoints,
        "Event notifier configured"
    );

    let service = ContactService::new(
        store,
        PatternCompiler::new(config.regex_size_limit),
        notifier,
    )
    .with_list_timeout(config.list_timeout);

    let app = build_router(AppState::new(service));

    tracing::info!("Listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server shutting down...");

    // The router owned the last notifier handle; the worker exits once the queue drains
    match tokio::time::timeout(NOTIFIER_DRAIN_TIMEOUT, worker).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => tracing::error!(error = %e, "Notifier worker panicked"),
        Err(_) => tracing::warn!("Notifier did not drain before shutdown"),
    }

    let totals = stats.snapshot();
    tracing::info!(
        enqueued = totals.enqueued,
        delivered = totals.delivered,
        failed = totals.failed,
        dropped = totals.dropped,
        "Event notifier totals"
    );

    if let Some(pool) = pool {
        pool.close().await;
        tracing::info!("Database connections closed");
    }

    tracing::info!("Goodbye!");
    Ok(())
}

/// Shutdown signal handler for graceful shutdown
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}
