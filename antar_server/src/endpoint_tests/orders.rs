use actix_web::{http::StatusCode, web, web::ServiceConfig};
use antar_engine::{traits::DeliveryDbError, OrderFlowApi};
use serde_json::json;

use super::{
    helpers::{issue_token, post_request},
    mocks::{committed_order, user_id, MockDb, ESTIMATE_ID, ORDER_ID},
};
use crate::{auth::JwtClaims, routes::CreateOrderRoute};

fn order_body() -> serde_json::Value {
    json!({"calculatedEstimateId": ESTIMATE_ID})
}

fn configure_happy(cfg: &mut ServiceConfig) {
    let mut db = MockDb::new();
    db.expect_create_order_from_estimate().returning(|user_id, estimate_id| Ok(committed_order(*user_id, *estimate_id)));
    cfg.service(CreateOrderRoute::<MockDb>::new()).app_data(web::Data::new(OrderFlowApi::new(db)));
}

fn configure_not_found(cfg: &mut ServiceConfig) {
    let mut db = MockDb::new();
    db.expect_create_order_from_estimate().returning(|_, _| Err(DeliveryDbError::EstimateNotFound));
    cfg.service(CreateOrderRoute::<MockDb>::new()).app_data(web::Data::new(OrderFlowApi::new(db)));
}

fn configure_forbidden(cfg: &mut ServiceConfig) {
    let mut db = MockDb::new();
    db.expect_create_order_from_estimate().returning(|_, _| Err(DeliveryDbError::Forbidden));
    cfg.service(CreateOrderRoute::<MockDb>::new()).app_data(web::Data::new(OrderFlowApi::new(db)));
}

fn configure_duplicate(cfg: &mut ServiceConfig) {
    let mut db = MockDb::new();
    db.expect_create_order_from_estimate()
        .returning(|_, estimate_id| Err(DeliveryDbError::OrderAlreadyExists(*estimate_id)));
    cfg.service(CreateOrderRoute::<MockDb>::new()).app_data(web::Data::new(OrderFlowApi::new(db)));
}

#[actix_web::test]
async fn order_without_token_is_unauthorized() {
    let _ = env_logger::try_init().ok();
    let (status, body) = post_request("", "/users/orders", order_body(), configure_happy).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, r#"{"error":"unauthorized"}"#);
}

#[actix_web::test]
async fn happy_order_returns_the_order_id() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(JwtClaims::user(user_id()));
    let (status, body) = post_request(&token, "/users/orders", order_body(), configure_happy).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, format!(r#"{{"orderId":"{ORDER_ID}"}}"#));
}

#[actix_web::test]
async fn unknown_estimate_is_not_found() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(JwtClaims::user(user_id()));
    let (status, body) = post_request(&token, "/users/orders", order_body(), configure_not_found).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, r#"{"error":"estimate not found"}"#);
}

#[actix_web::test]
async fn another_users_estimate_is_forbidden() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(JwtClaims::user(user_id()));
    let (status, body) = post_request(&token, "/users/orders", order_body(), configure_forbidden).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, r#"{"error":"forbidden"}"#);
}

#[actix_web::test]
async fn double_materialization_is_a_stable_bad_request() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(JwtClaims::user(user_id()));
    let (status, body) = post_request(&token, "/users/orders", order_body(), configure_duplicate).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, r#"{"error":"order already exists"}"#);
}

#[actix_web::test]
async fn malformed_estimate_id_is_a_bad_request() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(JwtClaims::user(user_id()));
    let body = json!({"calculatedEstimateId": "not-a-uuid"});
    let (status, body) = post_request(&token, "/users/orders", body, configure_happy).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, r#"{"error":"invalid estimate ID"}"#);
}
