use sqlx::SqliteConnection;
use uuid::Uuid;

use crate::db_types::{Estimate, EstimateId, ItemId, MerchantId, Order, OrderId, OrderMerchant, TreeLine};

/// Inserts the order row for an estimate, copying `total_price` and `estimated_minutes` verbatim from the snapshot.
///
/// A second insert for the same estimate trips the UNIQUE constraint on `estimate_id`; the caller maps that to its
/// already-exists error.
pub async fn insert_order(estimate: &Estimate, conn: &mut SqliteConnection) -> Result<Order, sqlx::Error> {
    let id = OrderId::new();
    sqlx::query_as(
        r#"
            INSERT INTO orders (id, estimate_id, user_id, total_price, estimated_minutes)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, estimate_id, user_id, total_price, estimated_minutes, created_at"#,
    )
    .bind(id)
    .bind(estimate.id)
    .bind(estimate.user_id)
    .bind(estimate.total_price)
    .bind(estimate.estimated_minutes)
    .fetch_one(conn)
    .await
}

pub async fn fetch_order_by_estimate_id(
    estimate_id: &EstimateId,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM orders WHERE estimate_id = $1").bind(estimate_id).fetch_optional(conn).await
}

pub async fn insert_order_merchant(
    order_id: &OrderId,
    merchant_id: &MerchantId,
    is_starting_point: bool,
    conn: &mut SqliteConnection,
) -> Result<OrderMerchant, sqlx::Error> {
    let id = Uuid::new_v4();
    sqlx::query_as(
        r#"
            INSERT INTO order_merchants (id, order_id, merchant_id, is_starting_point)
            VALUES ($1, $2, $3, $4)
            RETURNING id, order_id, merchant_id, is_starting_point"#,
    )
    .bind(id)
    .bind(order_id)
    .bind(merchant_id)
    .bind(is_starting_point)
    .fetch_one(conn)
    .await
}

pub async fn insert_order_item(
    order_merchant_id: &Uuid,
    item_id: &ItemId,
    quantity: i64,
    conn: &mut SqliteConnection,
) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO order_items (order_merchant_id, item_id, quantity) VALUES ($1, $2, $3)")
        .bind(order_merchant_id)
        .bind(item_id)
        .bind(quantity)
        .execute(conn)
        .await?;
    Ok(())
}

/// Reads an order's full tree as denormalized lines, mirroring [`super::estimates::fetch_estimate_lines`].
pub async fn fetch_order_lines(order_id: &OrderId, conn: &mut SqliteConnection) -> Result<Vec<TreeLine>, sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT om.merchant_id, om.is_starting_point, oi.item_id, oi.quantity
        FROM order_merchants om JOIN order_items oi ON oi.order_merchant_id = om.id
        WHERE om.order_id = $1
        ORDER BY om.rowid, oi.id"#,
    )
    .bind(order_id)
    .fetch_all(conn)
    .await
}
