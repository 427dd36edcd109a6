use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use antar_engine::{
    api::errors::{BrowseApiError, EstimateApiError, OrderApiError},
    traits::{CatalogApiError, DeliveryDbError},
};
use log::error;
use serde::Serialize;
use thiserror::Error;

/// Error kinds at the HTTP surface. Inner layers report kinds without any HTTP semantics; the mapping to status
/// codes happens exactly once, here. Messages are stable per kind so clients can switch on them.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid JSON")]
    InvalidRequestBody,
    #[error("{0}")]
    BadRequest(String),
    #[error("unauthorized")]
    Unauthorized,
    #[error("forbidden")]
    Forbidden,
    #[error("{0}")]
    NotFound(String),
    #[error("internal server error")]
    Internal(String),
    #[error("Invalid server configuration. {0}")]
    ConfigurationError(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
}

impl ServerError {
    pub fn bad_request<S: Into<String>>(msg: S) -> Self {
        Self::BadRequest(msg.into())
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequestBody | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let Self::Internal(detail) = self {
            error!("💥️ Internal error: {detail}");
        }
        HttpResponse::build(self.status_code()).json(ErrorBody { error: self.to_string() })
    }
}

impl From<EstimateApiError> for ServerError {
    fn from(e: EstimateApiError) -> Self {
        match e {
            EstimateApiError::Validation(msg) => Self::BadRequest(msg),
            EstimateApiError::TooFar => Self::BadRequest("coordinates too far".to_string()),
            EstimateApiError::PriceOverflow => Self::BadRequest("price overflow".to_string()),
            EstimateApiError::Catalog(e) => e.into(),
            EstimateApiError::Database(e) => e.into(),
        }
    }
}

impl From<CatalogApiError> for ServerError {
    fn from(e: CatalogApiError) -> Self {
        match e {
            CatalogApiError::MerchantNotFound | CatalogApiError::ItemNotFound => {
                Self::NotFound("not found".to_string())
            },
            CatalogApiError::DatabaseError(detail) => Self::Internal(detail),
        }
    }
}

impl From<DeliveryDbError> for ServerError {
    fn from(e: DeliveryDbError) -> Self {
        match e {
            DeliveryDbError::EstimateNotFound => Self::NotFound("estimate not found".to_string()),
            DeliveryDbError::Forbidden => Self::Forbidden,
            DeliveryDbError::OrderAlreadyExists(_) => Self::BadRequest("order already exists".to_string()),
            DeliveryDbError::DatabaseError(detail) => Self::Internal(detail),
            DeliveryDbError::CatalogError(e) => e.into(),
        }
    }
}

impl From<OrderApiError> for ServerError {
    fn from(e: OrderApiError) -> Self {
        match e {
            OrderApiError::Database(e) => e.into(),
        }
    }
}

impl From<BrowseApiError> for ServerError {
    fn from(e: BrowseApiError) -> Self {
        match e {
            BrowseApiError::Catalog(e) => e.into(),
        }
    }
}
