use actix_web::{http::StatusCode, web, web::ServiceConfig};
use antar_engine::{
    geo::{haversine, time_minutes, Coordinates},
    EstimateFlowApi,
};
use serde_json::json;

use super::{
    helpers::{issue_token, post_request},
    mocks::{committed_estimate, scenario_merchants, scenario_prices, user_id, MockDb, ESTIMATE_ID, I1_ID, I2_ID, M1_ID, M2_ID},
};
use crate::{auth::JwtClaims, routes::EstimateRoute};

fn scenario_body() -> serde_json::Value {
    json!({
        "userLocation": {"lat": -6.2000, "long": 106.8166},
        "orders": [
            {"merchantId": M1_ID, "isStartingPoint": true, "items": [{"itemId": I1_ID, "quantity": 2}]},
            {"merchantId": M2_ID, "isStartingPoint": false, "items": [{"itemId": I2_ID, "quantity": 1}]}
        ]
    })
}

fn configure(cfg: &mut ServiceConfig) {
    let mut db = MockDb::new();
    db.expect_fetch_merchants_by_ids().returning(|_| Ok(scenario_merchants()));
    db.expect_fetch_item_prices().returning(|_| Ok(scenario_prices()));
    db.expect_create_estimate().returning(|new| Ok(committed_estimate(new)));
    cfg.service(EstimateRoute::<MockDb>::new()).app_data(web::Data::new(EstimateFlowApi::new(db)));
}

#[actix_web::test]
async fn estimate_without_token_is_unauthorized() {
    let _ = env_logger::try_init().ok();
    let (status, body) = post_request("", "/users/estimate", scenario_body(), configure).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, r#"{"error":"unauthorized"}"#);
}

#[actix_web::test]
async fn estimate_with_garbage_token_is_unauthorized() {
    let _ = env_logger::try_init().ok();
    let (status, body) = post_request("not.a.jwt", "/users/estimate", scenario_body(), configure).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, r#"{"error":"unauthorized"}"#);
}

#[actix_web::test]
async fn happy_estimate_returns_price_minutes_and_id() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(JwtClaims::user(user_id()));
    let (status, body) = post_request(&token, "/users/estimate", scenario_body(), configure).await;
    assert_eq!(status, StatusCode::OK);

    let response: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(response["totalPrice"], 25_000);
    assert_eq!(response["calculatedEstimateId"], ESTIMATE_ID);
    let m1 = Coordinates::new_unchecked(-6.2010, 106.8170);
    let m2 = Coordinates::new_unchecked(-6.2050, 106.8200);
    let user = Coordinates::new_unchecked(-6.2000, 106.8166);
    let expected_minutes = time_minutes(haversine(m1, m2) + haversine(m2, user));
    assert_eq!(response["estimatedDeliveryTimeInMinutes"], expected_minutes);
}

#[actix_web::test]
async fn no_starting_point_is_a_bad_request() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(JwtClaims::user(user_id()));
    let body = json!({
        "userLocation": {"lat": -6.2000, "long": 106.8166},
        "orders": [
            {"merchantId": M1_ID, "isStartingPoint": false, "items": [{"itemId": I1_ID, "quantity": 1}]},
            {"merchantId": M2_ID, "isStartingPoint": false, "items": [{"itemId": I2_ID, "quantity": 1}]}
        ]
    });
    let (status, body) = post_request(&token, "/users/estimate", body, configure).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, r#"{"error":"exactly one order must have isStartingPoint=true"}"#);
}

#[actix_web::test]
async fn malformed_merchant_id_is_a_bad_request() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(JwtClaims::user(user_id()));
    let body = json!({
        "userLocation": {"lat": -6.2000, "long": 106.8166},
        "orders": [{"merchantId": "not-a-uuid", "isStartingPoint": true, "items": [{"itemId": I1_ID, "quantity": 1}]}]
    });
    let (status, body) = post_request(&token, "/users/estimate", body, configure).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, r#"{"error":"invalid merchantId"}"#);
}

fn configure_far_merchant(cfg: &mut ServiceConfig) {
    let mut db = MockDb::new();
    db.expect_fetch_merchants_by_ids()
        .returning(|_| Ok(vec![super::mocks::merchant(M1_ID, "Jauh", -6.5000, 106.8166)]));
    db.expect_fetch_item_prices().returning(|_| {
        Ok(vec![antar_engine::db_types::ItemPrice {
            item_id: I1_ID.parse().unwrap(),
            merchant_id: M1_ID.parse().unwrap(),
            price: 10_000.into(),
        }])
    });
    cfg.service(EstimateRoute::<MockDb>::new()).app_data(web::Data::new(EstimateFlowApi::new(db)));
}

#[actix_web::test]
async fn out_of_range_merchant_is_rejected_with_a_stable_message() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(JwtClaims::user(user_id()));
    let body = json!({
        "userLocation": {"lat": -6.2000, "long": 106.8166},
        "orders": [{"merchantId": M1_ID, "isStartingPoint": true, "items": [{"itemId": I1_ID, "quantity": 1}]}]
    });
    let (status, body) = post_request(&token, "/users/estimate", body, configure_far_merchant).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, r#"{"error":"coordinates too far"}"#);
}

#[actix_web::test]
async fn invalid_json_is_a_bad_request() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(JwtClaims::user(user_id()));
    // Wrong shape entirely: orders as a string.
    let (status, body) = post_request(&token, "/users/estimate", json!({"orders": "zero"}), configure).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, r#"{"error":"invalid JSON"}"#);
}
