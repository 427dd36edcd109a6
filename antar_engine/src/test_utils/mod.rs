//! Helpers for setting up throwaway databases in tests. Used by the integration tests in `tests/` and available to
//! downstream crates for the same purpose.
pub mod prepare_env;
pub mod seed;
