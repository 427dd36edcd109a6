use thiserror::Error;

use crate::{
    db_types::{Estimate, EstimateId, NewEstimate, Order, UserId},
    traits::{CatalogApiError, CatalogManagement},
};

/// The highest level of behaviour a backend must support: the immutable estimate store and the order materializer,
/// on top of catalog reads.
#[allow(async_fn_in_trait)]
pub trait DeliveryDatabase: Clone + CatalogManagement {
    /// The URL of the database.
    fn url(&self) -> &str;

    /// Atomically persists one estimate tree.
    ///
    /// A single transaction inserts the estimate row, then one `estimate_orders` row per merchant order, then one
    /// `estimate_order_items` row per line, in that parent-before-child order. On any failure the transaction rolls
    /// back; an observer can never see a partial tree. Returns the committed [`Estimate`].
    async fn create_estimate(&self, estimate: NewEstimate) -> Result<Estimate, DeliveryDbError>;

    /// Fetches a stored estimate by id, or `None`.
    async fn fetch_estimate(&self, id: &EstimateId) -> Result<Option<Estimate>, DeliveryDbError>;

    /// Transactionally promotes an estimate into an order.
    ///
    /// In one transaction: load the estimate ([`DeliveryDbError::EstimateNotFound`] if missing), reject a caller
    /// that does not own it ([`DeliveryDbError::Forbidden`]), insert the order row with `total_price` and
    /// `estimated_minutes` copied verbatim, read the estimate's denormalized lines in one query, and mirror them as
    /// `order_merchants` and `order_items` grouped by merchant.
    ///
    /// Materializing the same estimate twice is rejected with [`DeliveryDbError::OrderAlreadyExists`]; the UNIQUE
    /// constraint on `orders.estimate_id` enforces this under concurrency as well.
    async fn create_order_from_estimate(
        &self,
        user_id: &UserId,
        estimate_id: &EstimateId,
    ) -> Result<Order, DeliveryDbError>;
}

#[derive(Debug, Clone, Error)]
pub enum DeliveryDbError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("estimate not found")]
    EstimateNotFound,
    #[error("estimate belongs to another user")]
    Forbidden,
    #[error("order already exists for estimate {0}")]
    OrderAlreadyExists(EstimateId),
    #[error("{0}")]
    CatalogError(#[from] CatalogApiError),
}

impl From<sqlx::Error> for DeliveryDbError {
    fn from(e: sqlx::Error) -> Self {
        DeliveryDbError::DatabaseError(e.to_string())
    }
}
