use std::collections::HashSet;

use log::trace;
use sqlx::{QueryBuilder, SqliteConnection};

use crate::{
    api::objects::NearbyRow,
    db_types::{ItemId, ItemPrice, Merchant, MerchantId},
    traits::CatalogApiError,
};

/// Fetches the merchants for the given id set in one round trip.
///
/// The result is compared against the number of *distinct* requested ids; any shortfall means at least one merchant
/// does not exist.
pub async fn fetch_merchants_by_ids(
    ids: &[MerchantId],
    conn: &mut SqliteConnection,
) -> Result<Vec<Merchant>, CatalogApiError> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let mut builder = QueryBuilder::new("SELECT id, name, category, image_url, lat, lng, created_at FROM merchants WHERE id IN (");
    let mut in_list = builder.separated(", ");
    for id in ids {
        in_list.push_bind(id.0);
    }
    builder.push(")");
    trace!("🏪️ Executing query: {}", builder.sql());
    let merchants: Vec<Merchant> = builder.build_query_as().fetch_all(conn).await?;

    let distinct: HashSet<MerchantId> = ids.iter().copied().collect();
    if merchants.len() != distinct.len() {
        return Err(CatalogApiError::MerchantNotFound);
    }
    Ok(merchants)
}

/// Fetches the unit price for every `(item, merchant)` pair in one round trip.
///
/// A pair whose item exists under a different merchant counts as absent, which is exactly the "item does not belong
/// to that merchant" case.
pub async fn fetch_item_prices(
    pairs: &[(ItemId, MerchantId)],
    conn: &mut SqliteConnection,
) -> Result<Vec<ItemPrice>, CatalogApiError> {
    if pairs.is_empty() {
        return Ok(Vec::new());
    }
    let mut builder = QueryBuilder::new("SELECT id AS item_id, merchant_id, price FROM items WHERE ");
    let mut where_clause = builder.separated(" OR ");
    for (item_id, merchant_id) in pairs {
        where_clause.push("(id = ");
        where_clause.push_bind_unseparated(item_id.0);
        where_clause.push_unseparated(" AND merchant_id = ");
        where_clause.push_bind_unseparated(merchant_id.0);
        where_clause.push_unseparated(")");
    }
    trace!("🏪️ Executing query: {}", builder.sql());
    let prices: Vec<ItemPrice> = builder.build_query_as().fetch_all(conn).await?;

    let distinct: HashSet<(ItemId, MerchantId)> = pairs.iter().copied().collect();
    if prices.len() != distinct.len() {
        return Err(CatalogApiError::ItemNotFound);
    }
    Ok(prices)
}

/// Fetches every merchant joined against its items in one round trip. Merchants without items come back as a single
/// row with NULL item columns. Ordering by distance is layered on top by the caller; here the only guarantee is that
/// each merchant's rows are contiguous with items in insertion order.
pub async fn fetch_merchants_with_items(conn: &mut SqliteConnection) -> Result<Vec<NearbyRow>, sqlx::Error> {
    let rows = sqlx::query_as(
        r#"
        SELECT
            m.id AS merchant_id,
            m.name AS merchant_name,
            m.category,
            m.image_url AS merchant_image_url,
            m.lat,
            m.lng,
            m.created_at AS merchant_created_at,
            i.id AS item_id,
            i.name AS item_name,
            i.product_category,
            i.price,
            i.image_url AS item_image_url,
            i.created_at AS item_created_at
        FROM merchants m LEFT JOIN items i ON i.merchant_id = m.id
        ORDER BY m.rowid, i.rowid"#,
    )
    .fetch_all(conn)
    .await?;
    Ok(rows)
}
