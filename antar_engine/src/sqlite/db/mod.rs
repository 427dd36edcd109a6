//! # SQLite database methods
//!
//! "Low-level" database interactions live here as simple functions taking a `&mut SqliteConnection`, rather than
//! stateful structs. Callers obtain a connection from the pool, or open a transaction and pass `&mut *tx`, and the
//! functions compose without further ceremony.
use std::env;

use log::info;
use sqlx::{sqlite::SqlitePoolOptions, Error as SqlxError, SqlitePool};

pub mod catalog;
pub mod estimates;
pub mod orders;

const SQLITE_DB_URL: &str = "sqlite://data/antar.db";

pub fn db_url() -> String {
    let result = env::var("ANTAR_DATABASE_URL").unwrap_or_else(|_| {
        info!("ANTAR_DATABASE_URL is not set. Using the default.");
        SQLITE_DB_URL.to_string()
    });
    info!("Using database URL: {result}");
    result
}

pub async fn new_pool(url: &str, max_connections: u32) -> Result<SqlitePool, SqlxError> {
    let pool = SqlitePoolOptions::new().max_connections(max_connections).connect(url).await?;
    Ok(pool)
}
