use thiserror::Error;

use crate::traits::{CatalogApiError, DeliveryDbError};

/// Failures of the estimate flow. Inner layers report the kind only; mapping kinds to HTTP statuses is the server's
/// job.
#[derive(Debug, Clone, Error)]
pub enum EstimateApiError {
    #[error("{0}")]
    Validation(String),
    #[error("coordinates too far")]
    TooFar,
    #[error("price overflow")]
    PriceOverflow,
    #[error(transparent)]
    Catalog(#[from] CatalogApiError),
    #[error(transparent)]
    Database(#[from] DeliveryDbError),
}

impl EstimateApiError {
    pub fn validation<S: Into<String>>(msg: S) -> Self {
        Self::Validation(msg.into())
    }
}

/// Failures of order materialization.
#[derive(Debug, Clone, Error)]
pub enum OrderApiError {
    #[error(transparent)]
    Database(#[from] DeliveryDbError),
}

/// Failures of the nearby browser. Cache trouble never surfaces here; the cache degrades to a miss.
#[derive(Debug, Clone, Error)]
pub enum BrowseApiError {
    #[error(transparent)]
    Catalog(#[from] CatalogApiError),
}
