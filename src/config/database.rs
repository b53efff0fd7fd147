//! Database configuration and connection pool initialization.
//!
//! The pool is created once during startup and cloned into
//! [`crate::state::AppState`]; request handlers share it for the lifetime of
//! the process.

use sqlx::PgPool;
use std::env;

/// Initializes the PostgreSQL connection pool from `DATABASE_URL`.
///
/// # Panics
///
/// Panics if `DATABASE_URL` is not set or the connection fails — the
/// application cannot serve anything without its database.
pub async fn init_db_pool() -> PgPool {
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    PgPool::connect(&database_url)
        .await
        .expect("Failed to connect to database")
}
