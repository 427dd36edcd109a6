use std::time::Duration;

use actix_web::{
    http::{header, StatusCode},
    test,
    test::TestRequest,
    web,
    web::ServiceConfig,
    App,
};
use antar_common::Secret;

use crate::{
    auth::{JwtClaims, TokenIssuer, TokenVerifier},
    config::{AuthConfig, RequestDeadline},
    errors::ServerError,
};

// Creates a test `AuthConfig` for issuing tokens. DO NOT re-use this secret anywhere.
pub fn get_auth_config() -> AuthConfig {
    AuthConfig { jwt_secret: Secret::new("endpoint-test-secret-0451") }
}

pub fn issue_token(claims: JwtClaims) -> String {
    TokenIssuer::new(&get_auth_config()).issue_token(claims, None).expect("Failed to sign token")
}

pub async fn get_request(auth: &str, path: &str, configure: fn(&mut ServiceConfig)) -> (StatusCode, String) {
    let mut req = TestRequest::get().uri(path);
    if !auth.is_empty() {
        req = req.insert_header((header::AUTHORIZATION, format!("Bearer {auth}")));
    }
    send(req, configure).await
}

pub async fn post_request(
    auth: &str,
    path: &str,
    body: serde_json::Value,
    configure: fn(&mut ServiceConfig),
) -> (StatusCode, String) {
    let mut req = TestRequest::post().uri(path).set_json(&body);
    if !auth.is_empty() {
        req = req.insert_header((header::AUTHORIZATION, format!("Bearer {auth}")));
    }
    send(req, configure).await
}

async fn send(req: TestRequest, configure: fn(&mut ServiceConfig)) -> (StatusCode, String) {
    let app = App::new()
        .app_data(web::Data::new(TokenVerifier::new(&get_auth_config())))
        .app_data(web::Data::new(RequestDeadline(Duration::from_secs(5))))
        .app_data(web::JsonConfig::default().error_handler(|_, _| ServerError::InvalidRequestBody.into()))
        .configure(configure);
    let service = test::init_service(app).await;
    let res = test::call_service(&service, req.to_request()).await;
    let status = res.status();
    let body = test::read_body(res).await;
    (status, String::from_utf8_lossy(&body).into_owned())
}
