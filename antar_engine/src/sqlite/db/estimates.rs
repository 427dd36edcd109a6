use sqlx::SqliteConnection;
use uuid::Uuid;

use crate::db_types::{
    Estimate, EstimateId, EstimateOrder, NewEstimate, NewEstimateOrder, NewEstimateOrderItem, TreeLine,
};

/// Inserts the estimate row. Not atomic on its own; the caller wraps this and the child inserts in one transaction
/// and passes `&mut *tx`.
pub async fn insert_estimate(estimate: &NewEstimate, conn: &mut SqliteConnection) -> Result<Estimate, sqlx::Error> {
    let id = EstimateId::new();
    sqlx::query_as(
        r#"
            INSERT INTO estimates (id, user_id, user_lat, user_lng, total_price, estimated_minutes)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id, user_lat, user_lng, total_price, estimated_minutes, created_at"#,
    )
    .bind(id)
    .bind(estimate.user_id)
    .bind(estimate.user_location.lat())
    .bind(estimate.user_location.lng())
    .bind(estimate.total_price)
    .bind(estimate.estimated_minutes)
    .fetch_one(conn)
    .await
}

pub async fn insert_estimate_order(
    estimate_id: &EstimateId,
    order: &NewEstimateOrder,
    conn: &mut SqliteConnection,
) -> Result<EstimateOrder, sqlx::Error> {
    let id = Uuid::new_v4();
    sqlx::query_as(
        r#"
            INSERT INTO estimate_orders (id, estimate_id, merchant_id, is_starting_point)
            VALUES ($1, $2, $3, $4)
            RETURNING id, estimate_id, merchant_id, is_starting_point"#,
    )
    .bind(id)
    .bind(estimate_id)
    .bind(order.merchant_id)
    .bind(order.is_starting_point)
    .fetch_one(conn)
    .await
}

pub async fn insert_estimate_order_item(
    estimate_order_id: &Uuid,
    line: &NewEstimateOrderItem,
    conn: &mut SqliteConnection,
) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO estimate_order_items (estimate_order_id, item_id, quantity) VALUES ($1, $2, $3)")
        .bind(estimate_order_id)
        .bind(line.item_id)
        .bind(line.quantity)
        .execute(conn)
        .await?;
    Ok(())
}

pub async fn fetch_estimate(
    id: &EstimateId,
    conn: &mut SqliteConnection,
) -> Result<Option<Estimate>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM estimates WHERE id = $1").bind(id).fetch_optional(conn).await
}

pub async fn fetch_estimate_orders(
    estimate_id: &EstimateId,
    conn: &mut SqliteConnection,
) -> Result<Vec<EstimateOrder>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM estimate_orders WHERE estimate_id = $1 ORDER BY rowid")
        .bind(estimate_id)
        .fetch_all(conn)
        .await
}

/// Reads the estimate's full tree as denormalized lines in a single query, in insertion order.
pub async fn fetch_estimate_lines(
    estimate_id: &EstimateId,
    conn: &mut SqliteConnection,
) -> Result<Vec<TreeLine>, sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT eo.merchant_id, eo.is_starting_point, eoi.item_id, eoi.quantity
        FROM estimate_orders eo JOIN estimate_order_items eoi ON eoi.estimate_order_id = eo.id
        WHERE eo.estimate_id = $1
        ORDER BY eo.rowid, eoi.id"#,
    )
    .bind(estimate_id)
    .fetch_all(conn)
    .await
}
