//! Antar Delivery Engine
//!
//! The engine is the core of a multi-merchant food-delivery backend. Given a user's location and a multi-merchant
//! shopping list it decides whether the merchants are close enough to serve, resolves prices, plans the
//! cheapest-time courier route (one starting merchant, then every other merchant, then the user), and persists an
//! immutable *estimate* snapshot. A stored estimate can later be promoted, atomically and at most once, into an
//! *order* that mirrors the estimate's merchant/item tree.
//!
//! The library is split along two seams:
//! 1. Storage. Backends implement the [`traits`] module; [`SqliteDatabase`] is the shipped implementation. You
//!    should never need to touch the database directly; go through the API layer instead. The row types in
//!    [`db_types`] are public.
//! 2. Flows. [`EstimateFlowApi`], [`OrderFlowApi`] and [`BrowseApi`] in [`api`] expose the estimation, order
//!    materialization and nearby-browsing flows, each generic over the storage traits.
//!
//! Geospatial building blocks (great-circle distance, the hex-grid pre-filter, the nearest-neighbor route planner)
//! live in [`geo`] and are pure functions, usable and testable without a database.
pub mod api;
pub mod cache;
pub mod db_types;
pub mod geo;
pub mod sqlite;
pub mod test_utils;
pub mod traits;

pub use api::{BrowseApi, EstimateFlowApi, OrderFlowApi};
pub use sqlite::SqliteDatabase;
