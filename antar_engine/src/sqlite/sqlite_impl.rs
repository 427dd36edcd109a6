//! `SqliteDatabase` is the concrete SQLite-backed implementation of the engine's storage traits.
use std::{
    collections::HashMap,
    fmt::{Debug, Formatter},
};

use log::*;
use sqlx::SqlitePool;

use super::db::{self, catalog, estimates, orders};
use crate::{
    api::objects::NearbyRow,
    db_types::{Estimate, EstimateId, ItemId, ItemPrice, Merchant, MerchantId, NewEstimate, Order, TreeLine, UserId},
    geo::{self, Coordinates},
    traits::{CatalogApiError, CatalogManagement, DeliveryDatabase, DeliveryDbError},
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl SqliteDatabase {
    /// Connects using the URL from the environment (`ANTAR_DATABASE_URL`), or the default.
    pub async fn new(max_connections: u32) -> Result<Self, sqlx::Error> {
        let url = db::db_url();
        Self::new_with_url(&url, max_connections).await
    }

    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let pool = db::new_pool(url, max_connections).await?;
        Ok(Self { url: url.to_string(), pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

impl CatalogManagement for SqliteDatabase {
    async fn fetch_merchants_by_ids(&self, ids: &[MerchantId]) -> Result<Vec<Merchant>, CatalogApiError> {
        let mut conn = self.pool.acquire().await?;
        catalog::fetch_merchants_by_ids(ids, &mut conn).await
    }

    async fn fetch_item_prices(&self, pairs: &[(ItemId, MerchantId)]) -> Result<Vec<ItemPrice>, CatalogApiError> {
        let mut conn = self.pool.acquire().await?;
        catalog::fetch_item_prices(pairs, &mut conn).await
    }

    async fn fetch_merchants_with_items_near(&self, location: Coordinates) -> Result<Vec<NearbyRow>, CatalogApiError> {
        let mut conn = self.pool.acquire().await?;
        let rows = catalog::fetch_merchants_with_items(&mut conn).await?;
        Ok(sort_by_grid_distance(location, rows))
    }
}

impl DeliveryDatabase for SqliteDatabase {
    fn url(&self) -> &str {
        self.url.as_str()
    }

    async fn create_estimate(&self, estimate: NewEstimate) -> Result<Estimate, DeliveryDbError> {
        let mut tx = self.pool.begin().await?;
        let stored = estimates::insert_estimate(&estimate, &mut tx).await?;
        for order in &estimate.orders {
            let estimate_order = estimates::insert_estimate_order(&stored.id, order, &mut tx).await?;
            for line in &order.items {
                estimates::insert_estimate_order_item(&estimate_order.id, line, &mut tx).await?;
            }
        }
        tx.commit().await?;
        debug!("🗃️ Estimate {} committed with {} merchant orders", stored.id, estimate.orders.len());
        Ok(stored)
    }

    async fn fetch_estimate(&self, id: &EstimateId) -> Result<Option<Estimate>, DeliveryDbError> {
        let mut conn = self.pool.acquire().await?;
        let estimate = estimates::fetch_estimate(id, &mut conn).await?;
        Ok(estimate)
    }

    async fn create_order_from_estimate(
        &self,
        user_id: &UserId,
        estimate_id: &EstimateId,
    ) -> Result<Order, DeliveryDbError> {
        let mut tx = self.pool.begin().await?;
        let estimate =
            estimates::fetch_estimate(estimate_id, &mut tx).await?.ok_or(DeliveryDbError::EstimateNotFound)?;
        if estimate.user_id != *user_id {
            debug!("🗃️ User {user_id} attempted to materialize estimate {estimate_id} owned by {}", estimate.user_id);
            return Err(DeliveryDbError::Forbidden);
        }
        if orders::fetch_order_by_estimate_id(estimate_id, &mut tx).await?.is_some() {
            return Err(DeliveryDbError::OrderAlreadyExists(*estimate_id));
        }
        let order = match orders::insert_order(&estimate, &mut tx).await {
            Ok(order) => order,
            // Lost a race with a concurrent materialization of the same estimate.
            Err(e) if is_unique_violation(&e) => return Err(DeliveryDbError::OrderAlreadyExists(*estimate_id)),
            Err(e) => return Err(e.into()),
        };
        let lines = estimates::fetch_estimate_lines(estimate_id, &mut tx).await?;
        for group in group_by_merchant(&lines) {
            let order_merchant =
                orders::insert_order_merchant(&order.id, &group.merchant_id, group.is_starting_point, &mut tx).await?;
            for (item_id, quantity) in &group.items {
                orders::insert_order_item(&order_merchant.id, item_id, *quantity, &mut tx).await?;
            }
        }
        tx.commit().await?;
        debug!("🗃️ Order {} committed for estimate {estimate_id}", order.id);
        Ok(order)
    }
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    e.as_database_error().map_or(false, |db_err| db_err.is_unique_violation())
}

struct MerchantGroup {
    merchant_id: MerchantId,
    is_starting_point: bool,
    items: Vec<(ItemId, i64)>,
}

/// Groups denormalized tree lines by merchant, preserving the order of each merchant's first occurrence.
fn group_by_merchant(lines: &[TreeLine]) -> Vec<MerchantGroup> {
    let mut groups: Vec<MerchantGroup> = Vec::new();
    let mut index: HashMap<MerchantId, usize> = HashMap::new();
    for line in lines {
        let idx = match index.get(&line.merchant_id) {
            Some(idx) => *idx,
            None => {
                index.insert(line.merchant_id, groups.len());
                groups.push(MerchantGroup {
                    merchant_id: line.merchant_id,
                    is_starting_point: false,
                    items: Vec::new(),
                });
                groups.len() - 1
            },
        };
        groups[idx].is_starting_point |= line.is_starting_point;
        groups[idx].items.push((line.item_id, line.quantity));
    }
    groups
}

/// Orders rows by each merchant's hex-grid distance from the user, keeping every merchant's rows contiguous and in
/// their original item order. Merchants whose grid distance is undefined sort last.
fn sort_by_grid_distance(user: Coordinates, rows: Vec<NearbyRow>) -> Vec<NearbyRow> {
    let user_cell = match geo::to_cell(user) {
        Ok(cell) => cell,
        Err(_) => return rows,
    };
    let mut rank: HashMap<MerchantId, (i64, usize)> = HashMap::new();
    for (first_seen, row) in rows.iter().enumerate() {
        rank.entry(row.merchant_id).or_insert_with(|| {
            let distance = geo::to_cell(Coordinates::new_unchecked(row.lat, row.lng))
                .ok()
                .and_then(|cell| geo::grid_distance(user_cell, cell))
                .map_or(i64::MAX, i64::from);
            (distance, first_seen)
        });
    }
    let mut rows = rows;
    rows.sort_by_key(|row| rank[&row.merchant_id]);
    rows
}
