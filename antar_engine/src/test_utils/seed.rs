//! Direct-insert helpers that stand in for the external identity and catalog admin flows.
use antar_common::Price;
use sqlx::SqlitePool;

use crate::db_types::{ItemId, MerchantCategory, MerchantId, ProductCategory, UserId};

pub async fn seed_user(pool: &SqlitePool, username: &str) -> UserId {
    let id = UserId::new();
    sqlx::query("INSERT INTO users (id, username) VALUES ($1, $2)")
        .bind(id)
        .bind(username)
        .execute(pool)
        .await
        .expect("Error seeding user");
    id
}

pub async fn seed_merchant(
    pool: &SqlitePool,
    name: &str,
    category: MerchantCategory,
    lat: f64,
    lng: f64,
) -> MerchantId {
    let id = MerchantId::new();
    sqlx::query("INSERT INTO merchants (id, name, category, image_url, lat, lng) VALUES ($1, $2, $3, $4, $5, $6)")
        .bind(id)
        .bind(name)
        .bind(category)
        .bind(format!("http://images.test/{name}.jpg"))
        .bind(lat)
        .bind(lng)
        .execute(pool)
        .await
        .expect("Error seeding merchant");
    id
}

pub async fn seed_item(
    pool: &SqlitePool,
    merchant_id: MerchantId,
    name: &str,
    category: ProductCategory,
    price: i64,
) -> ItemId {
    let id = ItemId::new();
    sqlx::query(
        "INSERT INTO items (id, merchant_id, name, product_category, price, image_url) VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(id)
    .bind(merchant_id)
    .bind(name)
    .bind(category)
    .bind(Price::from(price))
    .bind(format!("http://images.test/{name}.jpg"))
    .execute(pool)
    .await
    .expect("Error seeding item");
    id
}
