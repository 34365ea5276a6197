//! Persistence for student records and OAuth2-linked users.
//!
//! Student records live in two independent backends (PostgreSQL and MySQL)
//! behind the [`repositories::StudentRepository`] port. Users live in the
//! primary (PostgreSQL) backend only.

use sqlx::mysql::MySqlPoolOptions;
use sqlx::postgres::PgPoolOptions;

pub mod backends;
pub mod error;
pub mod models;
pub mod repositories;

pub use backends::StudentBackends;
pub use error::StoreError;

pub type PgPool = sqlx::PgPool;
pub type MySqlPool = sqlx::MySqlPool;

/// Create a PostgreSQL connection pool from a database URL.
pub async fn create_pg_pool(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

/// Create a MySQL connection pool from a database URL.
pub async fn create_mysql_pool(
    database_url: &str,
    max_connections: u32,
) -> Result<MySqlPool, sqlx::Error> {
    MySqlPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to confirm the PostgreSQL backend is reachable.
pub async fn pg_health_check(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Round-trip a trivial query to confirm the MySQL backend is reachable.
pub async fn mysql_health_check(pool: &MySqlPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply the PostgreSQL schema (students + users).
pub async fn run_pg_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations/postgres").run(pool).await
}

/// Apply the MySQL schema (students only).
pub async fn run_mysql_migrations(pool: &MySqlPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations/mysql").run(pool).await
}
