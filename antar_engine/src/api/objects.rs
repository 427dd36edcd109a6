//! Request, row and response objects used by the engine API layer.
use std::{fmt::Display, str::FromStr};

use antar_common::Price;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::{
    db_types::{ConversionError, Item, ItemId, Merchant, MerchantCategory, MerchantId, ProductCategory},
    geo::Coordinates,
};

//--------------------------------------  EstimateRequest  -----------------------------------------------------------
/// A fully parsed estimate request: coordinates validated, ids parsed. Structural validation (starting point count,
/// empty lists, quantities) happens in the estimate flow so it can be reported with the right error kind.
#[derive(Debug, Clone)]
pub struct EstimateRequest {
    pub user_location: Coordinates,
    pub orders: Vec<MerchantOrder>,
}

#[derive(Debug, Clone)]
pub struct MerchantOrder {
    pub merchant_id: MerchantId,
    pub is_starting_point: bool,
    pub items: Vec<OrderLine>,
}

#[derive(Debug, Clone)]
pub struct OrderLine {
    pub item_id: ItemId,
    pub quantity: i64,
}

impl EstimateRequest {
    /// All `(item, merchant)` pairs in request order. The two sides stay parallel for the batched price lookup.
    pub fn item_pairs(&self) -> Vec<(ItemId, MerchantId)> {
        self.orders
            .iter()
            .flat_map(|o| o.items.iter().map(move |line| (line.item_id, o.merchant_id)))
            .collect()
    }

    pub fn merchant_ids(&self) -> Vec<MerchantId> {
        self.orders.iter().map(|o| o.merchant_id).collect()
    }
}

//--------------------------------------     SortOrder     -----------------------------------------------------------
/// An optional sort direction. The wire value is either absent or one of `asc`/`desc`; anything else is rejected at
/// the boundary rather than silently treated as a default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
    #[default]
    Unspecified,
}

impl FromStr for SortOrder {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(Self::Ascending),
            "desc" => Ok(Self::Descending),
            s => Err(ConversionError(format!("Invalid sort order: {s}"))),
        }
    }
}

impl Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortOrder::Ascending => write!(f, "asc"),
            SortOrder::Descending => write!(f, "desc"),
            SortOrder::Unspecified => write!(f, "unspecified"),
        }
    }
}

//--------------------------------------    NearbyQuery    -----------------------------------------------------------
/// Paging and sorting knobs for the nearby browser. Paging is applied in memory over the grouped result; the engine
/// does not page at the database level.
#[derive(Debug, Clone, Copy, Default)]
pub struct NearbyQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub created_at_sort: SortOrder,
}

pub const DEFAULT_NEARBY_LIMIT: i64 = 5;

impl NearbyQuery {
    pub fn limit(&self) -> i64 {
        match self.limit {
            Some(l) if l > 0 => l,
            _ => DEFAULT_NEARBY_LIMIT,
        }
    }

    pub fn offset(&self) -> i64 {
        self.offset.filter(|o| *o >= 0).unwrap_or(0)
    }
}

//--------------------------------------     NearbyRow     -----------------------------------------------------------
/// One row of the nearby catalog read: a merchant joined against one of its items, or against nothing when the
/// merchant has no items yet.
#[derive(Debug, Clone, FromRow)]
pub struct NearbyRow {
    pub merchant_id: MerchantId,
    pub merchant_name: String,
    pub category: MerchantCategory,
    pub merchant_image_url: String,
    pub lat: f64,
    pub lng: f64,
    pub merchant_created_at: DateTime<Utc>,
    pub item_id: Option<ItemId>,
    pub item_name: Option<String>,
    pub product_category: Option<ProductCategory>,
    pub price: Option<Price>,
    pub item_image_url: Option<String>,
    pub item_created_at: Option<DateTime<Utc>>,
}

impl NearbyRow {
    pub fn merchant(&self) -> Merchant {
        Merchant {
            id: self.merchant_id,
            name: self.merchant_name.clone(),
            category: self.category,
            image_url: self.merchant_image_url.clone(),
            lat: self.lat,
            lng: self.lng,
            created_at: self.merchant_created_at,
        }
    }

    /// The item half of the row, when the LEFT JOIN matched one.
    pub fn item(&self) -> Option<Item> {
        let id = self.item_id?;
        Some(Item {
            id,
            merchant_id: self.merchant_id,
            name: self.item_name.clone()?,
            product_category: self.product_category?,
            price: self.price?,
            image_url: self.item_image_url.clone()?,
            created_at: self.item_created_at?,
        })
    }
}

//--------------------------------------  NearbyMerchants  -----------------------------------------------------------
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MerchantWithItems {
    pub merchant: Merchant,
    pub items: Vec<Item>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Meta {
    pub limit: i64,
    pub offset: i64,
    pub total: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NearbyMerchants {
    pub data: Vec<MerchantWithItems>,
    pub meta: Meta,
}
