//! SQLite backend for the Antar engine.
//!
//! Schema rules the code relies on live in the migrations under `migrations/`:
//! * Estimates and their child tables have no UPDATE or DELETE paths. A committed estimate is immutable.
//! * `orders.estimate_id` carries a UNIQUE constraint, so an estimate can be materialized at most once even under
//!   concurrent requests.
//! * CHECK constraints keep quantities >= 1 and prices >= 0 below the application layer as well.
mod sqlite_impl;

pub mod db;

pub use sqlite_impl::SqliteDatabase;
