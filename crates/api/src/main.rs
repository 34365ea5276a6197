use std::net::SocketAddr;
use std::sync::Arc;

use registrar_core::backend::Backend;
use registrar_db::repositories::{
    MemoryStudentRepo, MemoryUserRepo, MySqlStudentRepo, PgStudentRepo, PgUserRepo,
    StudentRepository, UserRepository,
};
use registrar_db::StudentBackends;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use registrar_api::config::{DatabaseConfig, LogFormat, ServerConfig};
use registrar_api::router::build_app_router;
use registrar_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    let log_format = LogFormat::from_env().expect("Invalid LOG_FORMAT");
    let (text, json) = match log_format {
        LogFormat::Text => (Some(tracing_subscriber::fmt::layer()), None),
        LogFormat::Json => (None, Some(tracing_subscriber::fmt::layer().json())),
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "registrar_api=debug,tower_http=debug".into()),
        )
        .with(text)
        .with(json)
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env().expect("Invalid server configuration");
    tracing::info!(
        host = %config.host,
        port = %config.port,
        auth_mode = ?config.auth.mode,
        backend_selection = ?config.backend_selection,
        "Loaded server configuration"
    );
    if config.auth.admin.is_none() {
        tracing::warn!("No ADMIN_PASSWORD or ADMIN_PASSWORD_HASH set, password sign-in disabled");
    }

    // --- Stores ---
    let (postgres, users) = connect_primary(&config.database).await;
    let mysql = connect_secondary(&config.database).await;

    // --- App state ---
    let state = AppState {
        backends: StudentBackends::new(postgres, mysql),
        users,
        config: Arc::new(config.clone()),
        http: reqwest::Client::new(),
    };

    // --- Router ---
    let app = build_app_router(state, &config).expect("Invalid CORS configuration");

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Graceful shutdown complete");
}

/// PostgreSQL holds the primary student store and the users table.
async fn connect_primary(
    db: &DatabaseConfig,
) -> (Arc<dyn StudentRepository>, Arc<dyn UserRepository>) {
    let Some(url) = &db.primary_url else {
        tracing::warn!("PRIMARY_DATABASE_URL not set, using in-memory postgres store");
        return (
            Arc::new(MemoryStudentRepo::new(Backend::Postgres)),
            Arc::new(MemoryUserRepo::new()),
        );
    };

    let pool = registrar_db::create_pg_pool(url, db.max_connections)
        .await
        .expect("Failed to connect to PostgreSQL");
    registrar_db::pg_health_check(&pool)
        .await
        .expect("PostgreSQL health check failed");
    registrar_db::run_pg_migrations(&pool)
        .await
        .expect("Failed to run PostgreSQL migrations");
    tracing::info!("PostgreSQL ready, migrations applied");

    (
        Arc::new(PgStudentRepo::new(pool.clone())),
        Arc::new(PgUserRepo::new(pool)),
    )
}

async fn connect_secondary(db: &DatabaseConfig) -> Arc<dyn StudentRepository> {
    let Some(url) = &db.secondary_url else {
        tracing::warn!("SECONDARY_DATABASE_URL not set, using in-memory mysql store");
        return Arc::new(MemoryStudentRepo::new(Backend::Mysql));
    };

    let pool = registrar_db::create_mysql_pool(url, db.max_connections)
        .await
        .expect("Failed to connect to MySQL");
    registrar_db::mysql_health_check(&pool)
        .await
        .expect("MySQL health check failed");
    registrar_db::run_mysql_migrations(&pool)
        .await
        .expect("Failed to run MySQL migrations");
    tracing::info!("MySQL ready, migrations applied");

    Arc::new(MySqlStudentRepo::new(pool))
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
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
