use std::time::Duration;

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use antar_engine::{cache::MemoryCache, BrowseApi, EstimateFlowApi, OrderFlowApi, SqliteDatabase};

use crate::{
    auth::TokenVerifier,
    config::{RequestDeadline, ServerConfig},
    errors::ServerError,
    routes::{health, CreateOrderRoute, EstimateRoute, MerchantsNearbyRoute},
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, config.max_db_connections)
        .await
        .map_err(|e| ServerError::ConfigurationError(e.to_string()))?;
    let cache = MemoryCache::new();
    let srv = create_server_instance(config, db, cache)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance(
    config: ServerConfig,
    db: SqliteDatabase,
    cache: MemoryCache,
) -> Result<Server, ServerError> {
    let host = config.host.clone();
    let port = config.port;
    let srv = HttpServer::new(move || {
        let estimate_api = EstimateFlowApi::new(db.clone());
        let order_api = OrderFlowApi::new(db.clone());
        let browse_api = BrowseApi::new(db.clone(), cache.clone());
        let verifier = TokenVerifier::new(&config.auth);
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U"))
            .app_data(web::Data::new(estimate_api))
            .app_data(web::Data::new(order_api))
            .app_data(web::Data::new(browse_api))
            .app_data(web::Data::new(verifier))
            .app_data(web::Data::new(RequestDeadline(config.request_deadline)))
            .app_data(web::JsonConfig::default().error_handler(|_, _| ServerError::InvalidRequestBody.into()))
            .service(health)
            .service(EstimateRoute::<SqliteDatabase>::new())
            .service(CreateOrderRoute::<SqliteDatabase>::new())
            .service(MerchantsNearbyRoute::<SqliteDatabase, MemoryCache>::new())
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((host.as_str(), port))?
    .run();
    Ok(srv)
}
