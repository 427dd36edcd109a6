//! # Antar server
//!
//! The HTTP surface of the Antar delivery platform. It is responsible for:
//! * Validating and decoding client requests.
//! * Authenticating users via HS256 JWT access tokens issued by the identity service.
//! * Driving the engine APIs ([`antar_engine::EstimateFlowApi`], [`antar_engine::OrderFlowApi`],
//!   [`antar_engine::BrowseApi`]) under a per-request deadline.
//! * Mapping engine error kinds to HTTP status codes with stable JSON error bodies.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! * `GET /health`: health probe, unauthenticated.
//! * `POST /users/estimate`: price and time a multi-merchant shopping list, persisting the quote.
//! * `POST /users/orders`: promote a stored estimate into an order.
//! * `GET /merchants/nearby/{coords}`: merchants with their items, ordered by distance from `lat,lng`.
pub mod auth;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod helpers;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
