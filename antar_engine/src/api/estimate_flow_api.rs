use std::{collections::HashMap, fmt::Debug};

use antar_common::Price;
use log::*;

use crate::{
    api::{errors::EstimateApiError, objects::EstimateRequest},
    db_types::{Estimate, ItemId, ItemPrice, MerchantId, NewEstimate, NewEstimateOrder, NewEstimateOrderItem, UserId},
    geo::{
        proximity::{grid_verdict, within_exact_range, ProximityVerdict},
        route::{plan, RoutePoint},
        time_minutes, Coordinates,
    },
    traits::{CatalogApiError, DeliveryDatabase},
};

/// `EstimateFlowApi` drives the whole estimation pipeline: request validation, batched catalog resolution, pricing,
/// the two-tier proximity check, nearest-neighbor routing, the time estimate, and the durable snapshot.
pub struct EstimateFlowApi<B> {
    db: B,
}

impl<B> Debug for EstimateFlowApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EstimateFlowApi")
    }
}

impl<B> EstimateFlowApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &B {
        &self.db
    }
}

impl<B> EstimateFlowApi<B>
where B: DeliveryDatabase
{
    /// Validates the request, computes price, route and time, and persists the immutable estimate snapshot.
    ///
    /// The two batch reads (merchants by id, prices by pair) are independent, so they are issued concurrently and
    /// joined before the CPU-bound part of the pipeline starts.
    pub async fn create_estimate(
        &self,
        user_id: UserId,
        request: EstimateRequest,
    ) -> Result<Estimate, EstimateApiError> {
        validate_structure(&request)?;
        let merchant_ids = request.merchant_ids();
        let pairs = request.item_pairs();
        let (merchants, prices) =
            tokio::try_join!(self.db.fetch_merchants_by_ids(&merchant_ids), self.db.fetch_item_prices(&pairs))?;
        trace!("🧮️ Resolved {} merchants and {} price pairs", merchants.len(), prices.len());

        let total_price = total_price(&request, &prices)?;

        let locations: HashMap<MerchantId, Coordinates> = merchants.iter().map(|m| (m.id, m.location())).collect();
        let merchant_points: Vec<Coordinates> =
            request.orders.iter().map(|o| locations[&o.merchant_id]).collect();
        match grid_verdict(request.user_location, &merchant_points) {
            ProximityVerdict::TooFar => return Err(EstimateApiError::TooFar),
            ProximityVerdict::Ambiguous => {
                trace!("🧮️ Grid pre-filter inconclusive, falling back to great-circle distances");
                if !within_exact_range(request.user_location, &merchant_points) {
                    return Err(EstimateApiError::TooFar);
                }
            },
            ProximityVerdict::Ok => {},
        }

        let route_points: Vec<RoutePoint> = request
            .orders
            .iter()
            .map(|o| RoutePoint {
                merchant_id: o.merchant_id,
                location: locations[&o.merchant_id],
                is_start: o.is_starting_point,
            })
            .collect();
        let route = plan(&route_points, request.user_location)
            .map_err(|e| EstimateApiError::validation(e.to_string()))?;
        let estimated_minutes = time_minutes(route.total_meters);
        debug!(
            "🧮️ Route over {} merchants covers {:.0} m, estimated at {estimated_minutes} min",
            route.stops.len(),
            route.total_meters
        );

        let new_estimate = NewEstimate {
            user_id,
            user_location: request.user_location,
            total_price,
            estimated_minutes,
            orders: request
                .orders
                .into_iter()
                .map(|o| NewEstimateOrder {
                    merchant_id: o.merchant_id,
                    is_starting_point: o.is_starting_point,
                    items: o
                        .items
                        .into_iter()
                        .map(|line| NewEstimateOrderItem { item_id: line.item_id, quantity: line.quantity })
                        .collect(),
                })
                .collect(),
        };
        let estimate = self.db.create_estimate(new_estimate).await?;
        debug!("🧮️ Estimate {} persisted for user {user_id}: {total_price}, {estimated_minutes} min", estimate.id);
        Ok(estimate)
    }
}

fn validate_structure(request: &EstimateRequest) -> Result<(), EstimateApiError> {
    if request.orders.is_empty() {
        return Err(EstimateApiError::validation("orders cannot be empty"));
    }
    let start_count = request.orders.iter().filter(|o| o.is_starting_point).count();
    if start_count != 1 {
        return Err(EstimateApiError::validation("exactly one order must have isStartingPoint=true"));
    }
    for order in &request.orders {
        if order.items.is_empty() {
            return Err(EstimateApiError::validation("items cannot be empty"));
        }
        if order.items.iter().any(|line| line.quantity < 1) {
            return Err(EstimateApiError::validation("quantity must be at least 1"));
        }
    }
    Ok(())
}

/// Sum of unit price times quantity over the request, using the prices the batched fetch returned. Overflow on the
/// 64-bit total is a hard error.
fn total_price(request: &EstimateRequest, prices: &[ItemPrice]) -> Result<Price, EstimateApiError> {
    let by_pair: HashMap<(ItemId, MerchantId), Price> =
        prices.iter().map(|p| ((p.item_id, p.merchant_id), p.price)).collect();
    let mut total = Price::from(0);
    for order in &request.orders {
        for line in &order.items {
            let unit = by_pair
                .get(&(line.item_id, order.merchant_id))
                .copied()
                .ok_or(CatalogApiError::ItemNotFound)?;
            let line_total = unit.checked_mul(line.quantity).ok_or(EstimateApiError::PriceOverflow)?;
            total = total.checked_add(line_total).ok_or(EstimateApiError::PriceOverflow)?;
        }
    }
    Ok(total)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::api::objects::{MerchantOrder, OrderLine};

    fn request(orders: Vec<MerchantOrder>) -> EstimateRequest {
        EstimateRequest { user_location: Coordinates::new_unchecked(-6.2, 106.8166), orders }
    }

    fn order(is_start: bool, quantity: i64) -> MerchantOrder {
        MerchantOrder {
            merchant_id: MerchantId::new(),
            is_starting_point: is_start,
            items: vec![OrderLine { item_id: ItemId::new(), quantity }],
        }
    }

    #[test]
    fn empty_orders_are_rejected() {
        let err = validate_structure(&request(vec![])).unwrap_err();
        assert!(matches!(err, EstimateApiError::Validation(m) if m == "orders cannot be empty"));
    }

    #[test]
    fn exactly_one_starting_point_is_required() {
        let err = validate_structure(&request(vec![order(false, 1), order(false, 1)])).unwrap_err();
        assert!(matches!(err, EstimateApiError::Validation(m) if m.contains("isStartingPoint")));
        let err = validate_structure(&request(vec![order(true, 1), order(true, 1)])).unwrap_err();
        assert!(matches!(err, EstimateApiError::Validation(m) if m.contains("isStartingPoint")));
        assert!(validate_structure(&request(vec![order(true, 1), order(false, 1)])).is_ok());
    }

    #[test]
    fn empty_items_and_zero_quantities_are_rejected() {
        let mut bad = order(true, 1);
        bad.items.clear();
        let err = validate_structure(&request(vec![bad])).unwrap_err();
        assert!(matches!(err, EstimateApiError::Validation(m) if m == "items cannot be empty"));
        let err = validate_structure(&request(vec![order(true, 0)])).unwrap_err();
        assert!(matches!(err, EstimateApiError::Validation(m) if m == "quantity must be at least 1"));
    }

    #[test]
    fn total_price_multiplies_and_sums() {
        let o1 = order(true, 2);
        let o2 = order(false, 1);
        let prices = vec![
            ItemPrice { item_id: o1.items[0].item_id, merchant_id: o1.merchant_id, price: Price::from(10_000) },
            ItemPrice { item_id: o2.items[0].item_id, merchant_id: o2.merchant_id, price: Price::from(5_000) },
        ];
        let req = request(vec![o1, o2]);
        assert_eq!(total_price(&req, &prices).unwrap(), Price::from(25_000));
    }

    #[test]
    fn total_price_rejects_missing_pairs() {
        let req = request(vec![order(true, 1)]);
        let err = total_price(&req, &[]).unwrap_err();
        assert!(matches!(err, EstimateApiError::Catalog(CatalogApiError::ItemNotFound)));
    }

    #[test]
    fn total_price_reports_overflow() {
        let o = order(true, 2);
        let prices =
            vec![ItemPrice { item_id: o.items[0].item_id, merchant_id: o.merchant_id, price: Price::from(i64::MAX) }];
        let req = request(vec![o]);
        assert!(matches!(total_price(&req, &prices), Err(EstimateApiError::PriceOverflow)));
    }
}
