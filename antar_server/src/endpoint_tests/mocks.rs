use antar_engine::{
    api::objects::NearbyRow,
    db_types::{
        Estimate, EstimateId, ItemId, ItemPrice, Merchant, MerchantCategory, MerchantId, NewEstimate, Order, UserId,
    },
    geo::Coordinates,
    traits::{CatalogApiError, CatalogManagement, DeliveryDatabase, DeliveryDbError},
};
use chrono::{TimeZone, Utc};
use mockall::mock;

mock! {
    pub Db {}

    impl Clone for Db {
        fn clone(&self) -> Self;
    }

    impl CatalogManagement for Db {
        async fn fetch_merchants_by_ids(&self, ids: &[MerchantId]) -> Result<Vec<Merchant>, CatalogApiError>;
        async fn fetch_item_prices(&self, pairs: &[(ItemId, MerchantId)]) -> Result<Vec<ItemPrice>, CatalogApiError>;
        async fn fetch_merchants_with_items_near(&self, location: Coordinates) -> Result<Vec<NearbyRow>, CatalogApiError>;
    }

    impl DeliveryDatabase for Db {
        fn url(&self) -> &str;
        async fn create_estimate(&self, estimate: NewEstimate) -> Result<Estimate, DeliveryDbError>;
        async fn fetch_estimate(&self, id: &EstimateId) -> Result<Option<Estimate>, DeliveryDbError>;
        async fn create_order_from_estimate(&self, user_id: &UserId, estimate_id: &EstimateId) -> Result<Order, DeliveryDbError>;
    }
}

// Fixed ids so that plain-fn `configure` callbacks and test bodies agree on the fixture.
pub const USER_ID: &str = "0a0a0a0a-0a0a-0a0a-0a0a-0a0a0a0a0a0a";
pub const M1_ID: &str = "11111111-1111-1111-1111-111111111111";
pub const M2_ID: &str = "22222222-2222-2222-2222-222222222222";
pub const I1_ID: &str = "aaaaaaaa-aaaa-aaaa-aaaa-aaaaaaaaaaaa";
pub const I2_ID: &str = "bbbbbbbb-bbbb-bbbb-bbbb-bbbbbbbbbbbb";
pub const ESTIMATE_ID: &str = "e5e5e5e5-e5e5-e5e5-e5e5-e5e5e5e5e5e5";
pub const ORDER_ID: &str = "0d0d0d0d-0d0d-0d0d-0d0d-0d0d0d0d0d0d";

pub fn user_id() -> UserId {
    USER_ID.parse().unwrap()
}

pub fn merchant(id: &str, name: &str, lat: f64, lng: f64) -> Merchant {
    Merchant {
        id: id.parse().unwrap(),
        name: name.to_string(),
        category: MerchantCategory::SmallRestaurant,
        image_url: format!("http://images.test/{name}.jpg"),
        lat,
        lng,
        created_at: Utc.with_ymd_and_hms(2024, 2, 29, 13, 30, 0).unwrap(),
    }
}

/// Scenario fixture: M1 (starting point) at ~120 m from the user, M2 at ~650 m.
pub fn scenario_merchants() -> Vec<Merchant> {
    vec![merchant(M1_ID, "Warung Satu", -6.2010, 106.8170), merchant(M2_ID, "Warung Dua", -6.2050, 106.8200)]
}

pub fn scenario_prices() -> Vec<ItemPrice> {
    vec![
        ItemPrice { item_id: I1_ID.parse().unwrap(), merchant_id: M1_ID.parse().unwrap(), price: 10_000.into() },
        ItemPrice { item_id: I2_ID.parse().unwrap(), merchant_id: M2_ID.parse().unwrap(), price: 5_000.into() },
    ]
}

/// Echoes a `NewEstimate` back as the committed row, the way the real backend does.
pub fn committed_estimate(new: NewEstimate) -> Estimate {
    Estimate {
        id: ESTIMATE_ID.parse().unwrap(),
        user_id: new.user_id,
        user_lat: new.user_location.lat(),
        user_lng: new.user_location.lng(),
        total_price: new.total_price,
        estimated_minutes: new.estimated_minutes,
        created_at: Utc.with_ymd_and_hms(2024, 2, 29, 13, 30, 0).unwrap(),
    }
}

pub fn committed_order(user_id: UserId, estimate_id: EstimateId) -> Order {
    Order {
        id: ORDER_ID.parse().unwrap(),
        estimate_id,
        user_id,
        total_price: 25_000.into(),
        estimated_minutes: 2,
        created_at: Utc.with_ymd_and_hms(2024, 2, 29, 13, 35, 0).unwrap(),
    }
}
