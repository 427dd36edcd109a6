//! Request handler definitions
//!
//! Define each route and its handler here. Handlers stay thin: decode the DTO, call the engine API under the request
//! deadline, encode the response. Anything meatier belongs in the engine.
use actix_web::{get, web, HttpResponse, Responder};
use antar_engine::{
    api::objects::NearbyQuery, cache::SideCache, traits::DeliveryDatabase, BrowseApi, EstimateFlowApi, OrderFlowApi,
};
use log::*;

use crate::{
    auth::JwtClaims,
    config::RequestDeadline,
    data_objects::{
        CreateOrderRequestDto, CreateOrderResponseDto, EstimateRequestDto, EstimateResponseDto,
        GetMerchantsNearbyResponse, NearbyParamsDto,
    },
    errors::ServerError,
    helpers::parse_coords,
};

// Actix cannot register generic handlers directly, so each route gets a tiny service factory built by this macro.
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

/// Runs an engine call under the request deadline. Dropping the future mid-transaction rolls the transaction back,
/// so an expired deadline can never leave a partial tree behind.
async fn with_deadline<F, T, E>(deadline: &RequestDeadline, fut: F) -> Result<T, ServerError>
where
    F: std::future::Future<Output = Result<T, E>>,
    ServerError: From<E>,
{
    match tokio::time::timeout(deadline.0, fut).await {
        Ok(result) => result.map_err(ServerError::from),
        Err(_) => Err(ServerError::Internal("request deadline exceeded".to_string())),
    }
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Estimate  ----------------------------------------------------
route!(estimate => Post "/users/estimate" impl DeliveryDatabase);
/// Route handler for the estimate endpoint.
///
/// Validates the multi-merchant shopping list, prices it, checks that every merchant is within delivery range of
/// the user, plans the courier route, and stores the resulting quote. The response carries the total price, the
/// estimated delivery time and the estimate id to pass to `/users/orders`.
pub async fn estimate<B>(
    claims: JwtClaims,
    api: web::Data<EstimateFlowApi<B>>,
    deadline: web::Data<RequestDeadline>,
    body: web::Json<EstimateRequestDto>,
) -> Result<HttpResponse, ServerError>
where
    B: DeliveryDatabase,
{
    trace!("💻️ Received estimate request from {}", claims.sub);
    let request = body.into_inner().try_into()?;
    let estimate = with_deadline(&deadline, api.create_estimate(claims.sub, request)).await?;
    Ok(HttpResponse::Ok().json(EstimateResponseDto::from(estimate)))
}

//----------------------------------------------   Orders  ----------------------------------------------------
route!(create_order => Post "/users/orders" impl DeliveryDatabase);
/// Route handler for order creation.
///
/// Promotes a stored estimate into an order. The estimate must belong to the authenticated user and must not have
/// been materialized before.
pub async fn create_order<B>(
    claims: JwtClaims,
    api: web::Data<OrderFlowApi<B>>,
    deadline: web::Data<RequestDeadline>,
    body: web::Json<CreateOrderRequestDto>,
) -> Result<HttpResponse, ServerError>
where
    B: DeliveryDatabase,
{
    trace!("💻️ Received order request from {}", claims.sub);
    let estimate_id = body
        .into_inner()
        .calculated_estimate_id
        .parse()
        .map_err(|_| ServerError::bad_request("invalid estimate ID"))?;
    let order = with_deadline(&deadline, api.create_order_from_estimate(&claims.sub, &estimate_id)).await?;
    Ok(HttpResponse::Ok().json(CreateOrderResponseDto::from(order)))
}

//----------------------------------------------   Nearby  ----------------------------------------------------
route!(merchants_nearby => Get "/merchants/nearby/{coords}" impl DeliveryDatabase, SideCache);
/// Route handler for the nearby-merchants browser.
///
/// The path carries `lat,lng`; paging and the optional `createdAtSort` parameter come in the query string.
pub async fn merchants_nearby<B, C>(
    claims: JwtClaims,
    api: web::Data<BrowseApi<B, C>>,
    deadline: web::Data<RequestDeadline>,
    path: web::Path<String>,
    params: web::Query<NearbyParamsDto>,
) -> Result<HttpResponse, ServerError>
where
    B: DeliveryDatabase,
    C: SideCache,
{
    trace!("💻️ Received nearby merchants request from {}", claims.sub);
    let location = parse_coords(&path.into_inner())?;
    let query: NearbyQuery = params.into_inner().try_into()?;
    let result = with_deadline(&deadline, api.merchants_nearby(location, query)).await?;
    Ok(HttpResponse::Ok().json(GetMerchantsNearbyResponse::from(result)))
}
