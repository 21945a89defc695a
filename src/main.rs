//! Warden Server: authentication and abuse-mitigation service.
//!
//! Main entry point that wires all crates together and starts the server.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{EnvFilter, fmt};
use uuid::Uuid;

use warden_api::AppState;
use warden_auth::AuthService;
use warden_auth::notify::build_sender;
use warden_cache::CounterManager;
use warden_core::config::AppConfig;
use warden_core::error::AppError;
use warden_core::traits::credential::UserStore;
use warden_core::types::UserCredential;
use warden_database::{DatabasePool, MemoryUserStore, PgUserStore};

#[tokio::main]
async fn main() {
    let env = std::env::var("WARDEN_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);
    tracing::info!(env = %env, "Configuration loaded");

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting Warden v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Counter store ────────────────────────────────────
    tracing::info!(provider = %config.cache.provider, "Initializing counter store...");
    let counters = Arc::new(CounterManager::new(&config.cache).await?);

    // ── Step 2: Credential store ─────────────────────────────────
    let (users, memory_users, db_pool): (Arc<dyn UserStore>, Option<MemoryUserStore>, _) =
        match config.database.provider.as_str() {
            "postgres" => {
                tracing::info!("Connecting to database...");
                let pool = DatabasePool::connect(&config.database).await?;
                let store = PgUserStore::new(pool.clone());
                (Arc::new(store) as Arc<dyn UserStore>, None, Some(pool))
            }
            "memory" => {
                tracing::warn!("Using in-memory credential store; accounts are lost on restart");
                let store = MemoryUserStore::new();
                (Arc::new(store.clone()) as Arc<dyn UserStore>, Some(store), None)
            }
            other => {
                return Err(AppError::configuration(format!(
                    "Unknown database provider: '{other}'. Supported: memory, postgres"
                )));
            }
        };

    // ── Step 3: Notifications ────────────────────────────────────
    let notifier = build_sender(&config.notification)?;

    // ── Step 4: Auth service ─────────────────────────────────────
    let auth = AuthService::new(&config, users, counters, notifier)?;

    if let Some(store) = &memory_users {
        seed_users(&config, &auth, store)?;
    }

    // ── Step 5: HTTP server ──────────────────────────────────────
    let drain_timeout = Duration::from_secs(config.background.drain_timeout_seconds);
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::new(config, auth);
    let app = warden_api::build_router(state.clone());

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("Warden server listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received, starting graceful shutdown...");
    })
    .await
    .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    // ── Step 6: Drain detached bookkeeping ───────────────────────
    let tasks = state.auth.background_tasks();
    tracing::info!(in_flight = tasks.in_flight(), "Waiting for background tasks to complete...");
    if !tasks.drain(drain_timeout).await {
        tracing::warn!(
            in_flight = tasks.in_flight(),
            "Background tasks still running at shutdown"
        );
    }

    if let Some(pool) = db_pool {
        pool.close().await;
    }

    tracing::info!("Warden server shut down gracefully");
    Ok(())
}

/// Create the configured development accounts in the in-memory store.
fn seed_users(
    config: &AppConfig,
    auth: &AuthService,
    store: &MemoryUserStore,
) -> Result<(), AppError> {
    for seed in &config.database.seed_users {
        store.insert(UserCredential {
            id: Uuid::new_v4(),
            username: seed.username.clone(),
            email: seed.email.clone(),
            password_hash: auth.password_hasher().hash_password(&seed.password)?,
        });
        tracing::info!(username = %seed.username, "Seeded user");
    }
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
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
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
