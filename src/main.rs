//! QuillHub Server
//!
//! Main entry point that wires the stores, auth services and HTTP API
//! together and starts the server.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use quillhub_auth::account::{AccountService, AdminService, RegistrationPolicy};
use quillhub_auth::session::SessionSweeper;
use quillhub_auth::{PasswordHasher, SessionManager};
use quillhub_core::config::AppConfig;
use quillhub_core::error::AppError;
use quillhub_core::traits::{CredentialStore, SessionStore};
use quillhub_database::DatabasePool;
use quillhub_database::repositories::session::SessionRepository;
use quillhub_database::repositories::user::UserRepository;

#[tokio::main]
async fn main() {
    let env = std::env::var("QUILLHUB_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }
}

/// Initialize tracing/logging.
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

/// Main server run function.
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting QuillHub v{}", env!("CARGO_PKG_VERSION"));

    // Database connection + migrations
    let db = DatabasePool::connect(&config.database).await?;
    quillhub_database::migration::run_migrations(db.pool()).await?;

    // Stores
    let users: Arc<dyn CredentialStore> = Arc::new(UserRepository::new(db.pool().clone()));
    let sessions: Arc<dyn SessionStore> = Arc::new(SessionRepository::new(db.pool().clone()));

    // Auth services
    let session_manager = SessionManager::new(
        Arc::clone(&sessions),
        Arc::clone(&users),
        config.session.clone(),
    );
    let accounts = AccountService::new(
        Arc::clone(&users),
        session_manager.clone(),
        PasswordHasher::new(),
        RegistrationPolicy::from_config(&config.auth),
    )?;
    let admin = AdminService::new(Arc::clone(&users), session_manager.clone());

    // Expired-session sweep
    let _scheduler = if config.session.sweep_enabled {
        let sweeper = SessionSweeper::new(Arc::clone(&sessions));
        Some(sweeper.start(config.session.cleanup_interval_minutes).await?)
    } else {
        tracing::info!("Session sweep disabled");
        None
    };

    // HTTP server
    let addr = config.server.bind_addr();
    let state = quillhub_api::AppState::new(
        Arc::new(config),
        accounts,
        admin,
        session_manager,
        Some(db.clone()),
    );
    let app = quillhub_api::build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("QuillHub server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    db.close().await;
    tracing::info!("QuillHub server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if tokio::signal::ctrl_c().await.is_err() {
            tracing::error!("Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown...");
}
