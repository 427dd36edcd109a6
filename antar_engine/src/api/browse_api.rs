use std::collections::HashMap;

use log::*;

use crate::{
    api::{
        errors::BrowseApiError,
        objects::{MerchantWithItems, Meta, NearbyMerchants, NearbyQuery, NearbyRow, SortOrder},
    },
    cache::SideCache,
    db_types::MerchantId,
    geo::{self, Coordinates},
    traits::CatalogManagement,
};

const NEARBY_KEY_PREFIX: &str = "merchants:nearby";

/// `BrowseApi` serves the geo-sorted merchant browser.
///
/// Results go through the side cache when one is wired in. The cache is never authoritative: a failed or missing
/// entry simply means recomputing from the catalog.
pub struct BrowseApi<B, C> {
    db: B,
    cache: C,
}

impl<B, C> BrowseApi<B, C> {
    pub fn new(db: B, cache: C) -> Self {
        Self { db, cache }
    }
}

impl<B, C> BrowseApi<B, C>
where
    B: CatalogManagement,
    C: SideCache,
{
    /// Returns merchants with their items, ordered by ascending hex-grid distance from `location`.
    ///
    /// Paging is applied in memory after grouping; `meta.total` counts all merchants in the result, not just the
    /// returned page. The engine does not page at the database level.
    pub async fn merchants_nearby(
        &self,
        location: Coordinates,
        query: NearbyQuery,
    ) -> Result<NearbyMerchants, BrowseApiError> {
        let key = cache_key(location, &query);
        if let Some(cached) = self.cache.get(&key).await {
            match serde_json::from_str::<NearbyMerchants>(&cached) {
                Ok(result) => return Ok(result),
                Err(e) => {
                    warn!("🔎️ Discarding malformed cache entry for {key}: {e}");
                    self.cache.delete(&key).await;
                },
            }
        }

        let rows = self.db.fetch_merchants_with_items_near(location).await?;
        let result = fold_rows(rows, &query);
        trace!("🔎️ Nearby query at ({:.4}, {:.4}) grouped {} merchants", location.lat(), location.lng(), result.meta.total);
        if let Ok(body) = serde_json::to_string(&result) {
            self.cache.set(&key, body).await;
        }
        Ok(result)
    }

    /// Drops every cached nearby result. Called by the (external) merchant and item admin flows after a write.
    pub async fn invalidate_nearby(&self) {
        self.cache.scan_delete(&format!("{NEARBY_KEY_PREFIX}:*")).await;
    }
}

fn cache_key(location: Coordinates, query: &NearbyQuery) -> String {
    // Keying on the hex cell rather than raw floats lets users in the same ~100 m tile share an entry.
    let cell = match geo::to_cell(location) {
        Ok(cell) => cell.to_string(),
        Err(_) => format!("{:.6},{:.6}", location.lat(), location.lng()),
    };
    format!("{NEARBY_KEY_PREFIX}:{cell}:{}:{}:{}", query.limit(), query.offset(), query.created_at_sort)
}

/// Folds the sorted catalog rows into per-merchant groups, preserving the sorted order of each merchant's first
/// occurrence, then applies item sorting and in-memory paging.
fn fold_rows(rows: Vec<NearbyRow>, query: &NearbyQuery) -> NearbyMerchants {
    let mut groups: Vec<MerchantWithItems> = Vec::new();
    let mut seen: HashMap<MerchantId, usize> = HashMap::new();
    for row in rows {
        let idx = match seen.get(&row.merchant_id) {
            Some(idx) => *idx,
            None => {
                seen.insert(row.merchant_id, groups.len());
                groups.push(MerchantWithItems { merchant: row.merchant(), items: Vec::new() });
                groups.len() - 1
            },
        };
        if let Some(item) = row.item() {
            groups[idx].items.push(item);
        }
    }

    match query.created_at_sort {
        SortOrder::Ascending => groups.iter_mut().for_each(|g| g.items.sort_by_key(|i| i.created_at)),
        SortOrder::Descending => {
            groups.iter_mut().for_each(|g| g.items.sort_by_key(|i| std::cmp::Reverse(i.created_at)))
        },
        SortOrder::Unspecified => {},
    }

    let total = groups.len() as i64;
    let limit = query.limit();
    let offset = query.offset();
    let data = groups.into_iter().skip(offset as usize).take(limit as usize).collect();
    NearbyMerchants { data, meta: Meta { limit, offset, total } }
}
