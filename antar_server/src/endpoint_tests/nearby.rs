use actix_web::{http::StatusCode, web, web::ServiceConfig};
use antar_engine::{api::objects::NearbyRow, cache::NoCache, db_types::ProductCategory, BrowseApi};
use chrono::{TimeZone, Utc};

use super::{
    helpers::{get_request, issue_token},
    mocks::{merchant, user_id, MockDb, I1_ID, M1_ID, M2_ID},
};
use crate::{auth::JwtClaims, routes::MerchantsNearbyRoute};

fn nearby_rows() -> Vec<NearbyRow> {
    let m1 = merchant(M1_ID, "Warung Satu", -6.2010, 106.8170);
    let m2 = merchant(M2_ID, "Warung Dua", -6.2050, 106.8200);
    vec![
        NearbyRow {
            merchant_id: m1.id,
            merchant_name: m1.name.clone(),
            category: m1.category,
            merchant_image_url: m1.image_url.clone(),
            lat: m1.lat,
            lng: m1.lng,
            merchant_created_at: m1.created_at,
            item_id: Some(I1_ID.parse().unwrap()),
            item_name: Some("Nasi Goreng".to_string()),
            product_category: Some(ProductCategory::Food),
            price: Some(10_000.into()),
            item_image_url: Some("http://images.test/nasi.jpg".to_string()),
            item_created_at: Some(Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()),
        },
        NearbyRow {
            merchant_id: m2.id,
            merchant_name: m2.name.clone(),
            category: m2.category,
            merchant_image_url: m2.image_url.clone(),
            lat: m2.lat,
            lng: m2.lng,
            merchant_created_at: m2.created_at,
            item_id: None,
            item_name: None,
            product_category: None,
            price: None,
            item_image_url: None,
            item_created_at: None,
        },
    ]
}

fn configure(cfg: &mut ServiceConfig) {
    let mut db = MockDb::new();
    db.expect_fetch_merchants_with_items_near().returning(|_| Ok(nearby_rows()));
    cfg.service(MerchantsNearbyRoute::<MockDb, NoCache>::new())
        .app_data(web::Data::new(BrowseApi::new(db, NoCache)));
}

#[actix_web::test]
async fn nearby_without_token_is_unauthorized() {
    let _ = env_logger::try_init().ok();
    let (status, body) = get_request("", "/merchants/nearby/-6.2,106.8166", configure).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, r#"{"error":"unauthorized"}"#);
}

#[actix_web::test]
async fn nearby_groups_merchants_with_their_items() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(JwtClaims::user(user_id()));
    let (status, body) = get_request(&token, "/merchants/nearby/-6.2,106.8166", configure).await;
    assert_eq!(status, StatusCode::OK);

    let response: serde_json::Value = serde_json::from_str(&body).unwrap();
    let data = response["data"].as_array().unwrap();
    assert_eq!(data.len(), 2);
    assert_eq!(data[0]["merchant"]["merchantId"], M1_ID);
    assert_eq!(data[0]["merchant"]["merchantCategory"], "SmallRestaurant");
    assert_eq!(data[0]["items"][0]["price"], 10_000);
    assert_eq!(data[1]["merchant"]["merchantId"], M2_ID);
    assert_eq!(data[1]["items"].as_array().unwrap().len(), 0);
    assert_eq!(response["meta"]["total"], 2);
    assert_eq!(response["meta"]["limit"], 5);
    assert_eq!(response["meta"]["offset"], 0);
}

#[actix_web::test]
async fn nearby_honours_paging_parameters() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(JwtClaims::user(user_id()));
    let (status, body) = get_request(&token, "/merchants/nearby/-6.2,106.8166?limit=1&offset=1", configure).await;
    assert_eq!(status, StatusCode::OK);

    let response: serde_json::Value = serde_json::from_str(&body).unwrap();
    let data = response["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["merchant"]["merchantId"], M2_ID);
    assert_eq!(response["meta"]["total"], 2);
    assert_eq!(response["meta"]["limit"], 1);
    assert_eq!(response["meta"]["offset"], 1);
}

#[actix_web::test]
async fn malformed_coordinates_are_a_bad_request() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(JwtClaims::user(user_id()));
    let (status, body) = get_request(&token, "/merchants/nearby/106.8166", configure).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, r#"{"error":"invalid coordinates format. Use lat,lng"}"#);

    let (status, body) = get_request(&token, "/merchants/nearby/95.0,106.8166", configure).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, r#"{"error":"latitude must be [-90,90], longitude [-180,180]"}"#);
}

#[actix_web::test]
async fn unknown_sort_order_is_rejected_at_the_boundary() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(JwtClaims::user(user_id()));
    let (status, body) =
        get_request(&token, "/merchants/nearby/-6.2,106.8166?createdAtSort=sideways", configure).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, r#"{"error":"invalid sort order"}"#);
}
