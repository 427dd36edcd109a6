//! Wire-format DTOs and their conversions to and from engine types.
use antar_engine::{
    api::objects::{
        EstimateRequest, MerchantOrder, NearbyMerchants, NearbyQuery, OrderLine, SortOrder,
    },
    db_types::{Estimate, Item, Merchant, Order},
    geo::Coordinates,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::ServerError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LocationDto {
    pub lat: f64,
    pub long: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemDto {
    pub item_id: String,
    pub quantity: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDto {
    pub merchant_id: String,
    #[serde(default)]
    pub is_starting_point: bool,
    #[serde(default)]
    pub items: Vec<OrderItemDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateRequestDto {
    pub user_location: LocationDto,
    pub orders: Vec<OrderDto>,
}

impl TryFrom<EstimateRequestDto> for EstimateRequest {
    type Error = ServerError;

    fn try_from(dto: EstimateRequestDto) -> Result<Self, Self::Error> {
        let user_location = Coordinates::new(dto.user_location.lat, dto.user_location.long)
            .map_err(|e| ServerError::BadRequest(e.to_string()))?;
        let orders = dto
            .orders
            .into_iter()
            .map(|order| {
                let merchant_id =
                    order.merchant_id.parse().map_err(|_| ServerError::bad_request("invalid merchantId"))?;
                let items = order
                    .items
                    .into_iter()
                    .map(|line| {
                        let item_id = line.item_id.parse().map_err(|_| ServerError::bad_request("invalid itemId"))?;
                        Ok(OrderLine { item_id, quantity: line.quantity })
                    })
                    .collect::<Result<Vec<_>, ServerError>>()?;
                Ok(MerchantOrder { merchant_id, is_starting_point: order.is_starting_point, items })
            })
            .collect::<Result<Vec<_>, ServerError>>()?;
        Ok(EstimateRequest { user_location, orders })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateResponseDto {
    pub total_price: i64,
    pub estimated_delivery_time_in_minutes: i64,
    pub calculated_estimate_id: String,
}

impl From<Estimate> for EstimateResponseDto {
    fn from(estimate: Estimate) -> Self {
        Self {
            total_price: estimate.total_price.value(),
            estimated_delivery_time_in_minutes: estimate.estimated_minutes,
            calculated_estimate_id: estimate.id.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequestDto {
    pub calculated_estimate_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderResponseDto {
    pub order_id: String,
}

impl From<Order> for CreateOrderResponseDto {
    fn from(order: Order) -> Self {
        Self { order_id: order.id.to_string() }
    }
}

//--------------------------------------      Nearby       -----------------------------------------------------------
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct NearbyParamsDto {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub created_at_sort: Option<String>,
}

impl TryFrom<NearbyParamsDto> for NearbyQuery {
    type Error = ServerError;

    fn try_from(dto: NearbyParamsDto) -> Result<Self, Self::Error> {
        let created_at_sort = match dto.created_at_sort.as_deref() {
            None => SortOrder::Unspecified,
            Some(s) => s.parse().map_err(|_| ServerError::bad_request("invalid sort order"))?,
        };
        Ok(NearbyQuery { limit: dto.limit, offset: dto.offset, created_at_sort })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MerchantDto {
    pub merchant_id: String,
    pub name: String,
    pub merchant_category: String,
    pub image_url: String,
    pub location: LocationDto,
    pub created_at: DateTime<Utc>,
}

impl From<Merchant> for MerchantDto {
    fn from(m: Merchant) -> Self {
        Self {
            merchant_id: m.id.to_string(),
            name: m.name,
            merchant_category: m.category.to_string(),
            image_url: m.image_url,
            location: LocationDto { lat: m.lat, long: m.lng },
            created_at: m.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDto {
    pub item_id: String,
    pub name: String,
    pub product_category: String,
    pub price: i64,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
}

impl From<Item> for ItemDto {
    fn from(i: Item) -> Self {
        Self {
            item_id: i.id.to_string(),
            name: i.name,
            product_category: i.product_category.to_string(),
            price: i.price.value(),
            image_url: i.image_url,
            created_at: i.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NearbyMerchantDto {
    pub merchant: MerchantDto,
    pub items: Vec<ItemDto>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MetaDto {
    pub limit: i64,
    pub offset: i64,
    pub total: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetMerchantsNearbyResponse {
    pub data: Vec<NearbyMerchantDto>,
    pub meta: MetaDto,
}

impl From<NearbyMerchants> for GetMerchantsNearbyResponse {
    fn from(result: NearbyMerchants) -> Self {
        Self {
            data: result
                .data
                .into_iter()
                .map(|group| NearbyMerchantDto {
                    merchant: group.merchant.into(),
                    items: group.items.into_iter().map(ItemDto::from).collect(),
                })
                .collect(),
            meta: MetaDto { limit: result.meta.limit, offset: result.meta.offset, total: result.meta.total },
        }
    }
}
