use std::fmt::Debug;

use log::*;

use crate::{
    api::errors::OrderApiError,
    db_types::{EstimateId, Order, UserId},
    traits::DeliveryDatabase,
};

/// `OrderFlowApi` promotes a stored estimate into a committed order.
///
/// Materialization trusts the estimate snapshot completely: coordinates are not re-validated and prices are not
/// re-read. The totals on the order are the estimate's totals, byte for byte.
pub struct OrderFlowApi<B> {
    db: B,
}

impl<B> Debug for OrderFlowApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OrderFlowApi")
    }
}

impl<B> OrderFlowApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &B {
        &self.db
    }
}

impl<B> OrderFlowApi<B>
where B: DeliveryDatabase
{
    /// Creates the order for `estimate_id` on behalf of `user_id`.
    ///
    /// A second materialization of the same estimate is rejected, as is a caller that does not own the estimate.
    /// The copy of the estimate tree happens inside a single transaction in the backend.
    pub async fn create_order_from_estimate(
        &self,
        user_id: &UserId,
        estimate_id: &EstimateId,
    ) -> Result<Order, OrderApiError> {
        trace!("📦️ User {user_id} requested an order for estimate {estimate_id}");
        let order = self.db.create_order_from_estimate(user_id, estimate_id).await?;
        debug!("📦️ Estimate {estimate_id} materialized as order {}", order.id);
        Ok(order)
    }
}
