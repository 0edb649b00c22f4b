use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;
use tower_http::services::ServeDir;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vitrin_api::config::ServerConfig;
use vitrin_api::router::build_app_router;
use vitrin_api::state::AppState;
use vitrin_db::PoolConfig;
use vitrin_storage::StorageConfig;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vitrin_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    if let Some(dir) = &config.locales_dir {
        vitrin_core::i18n::init_from_dir(dir).expect("Failed to load message catalogues");
        tracing::info!(dir = %dir.display(), "Loaded message catalogues");
    }

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let mut pool_config = PoolConfig::default();
    if let Ok(max) = std::env::var("DB_MAX_CONNECTIONS") {
        pool_config.max_connections = max
            .parse()
            .expect("DB_MAX_CONNECTIONS must be a valid u32");
    }

    let pool = vitrin_db::create_pool(&database_url, &pool_config)
        .await
        .expect("Failed to connect to database");
    tracing::info!(max_connections = pool_config.max_connections, "Database connection pool created");

    vitrin_db::health_check(&pool)
        .await
        .expect("Database health check failed");

    vitrin_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Object storage ---
    let storage_config = StorageConfig::from_env().expect("Invalid storage configuration");
    let local_root = match &storage_config {
        StorageConfig::Local { root, .. } => Some(root.clone()),
        StorageConfig::S3(_) => None,
    };
    let storage = storage_config.build().await;
    tracing::info!(backend = storage.backend(), "Object storage ready");

    // --- Router ---
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        storage,
    };
    let mut app = build_app_router(state, &config);
    if let Some(root) = local_root {
        app = app.nest_service("/uploads", ServeDir::new(root));
    }

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    let shutdown = Arc::new(Notify::new());
    let notify = Arc::clone(&shutdown);
    let mut server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                shutdown_signal().await;
                notify.notify_one();
            })
            .await
    });

    tokio::select! {
        result = &mut server => {
            result.expect("Server task panicked").expect("Server error");
        }
        () = shutdown.notified() => {
            let drain = Duration::from_secs(config.shutdown_timeout_secs);
            match tokio::time::timeout(drain, &mut server).await {
                Ok(result) => result.expect("Server task panicked").expect("Server error"),
                Err(_) => {
                    tracing::warn!(?drain, "In-flight requests did not drain, aborting");
                    server.abort();
                }
            }
        }
    }

    tracing::info!("Graceful shutdown complete");
}

/// Wait for SIGINT or (on Unix) SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
