//! Database-facing types shared by every backend.
//!
//! These types map 1:1 onto table rows. They are deliberately free of any HTTP or wire-format concerns; the server
//! crate defines its own DTOs and converts at the boundary.
use std::{fmt::Display, str::FromStr};

use antar_common::Price;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use thiserror::Error;
use uuid::Uuid;

use crate::geo::Coordinates;

#[derive(Debug, Clone, Error)]
#[error("Invalid value: {0}")]
pub struct ConversionError(pub String);

macro_rules! uuid_id {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
        #[sqlx(transparent)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl FromStr for $name {
            type Err = ConversionError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self).map_err(|_| ConversionError(format!("{s} is not a valid identifier")))
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

uuid_id!(UserId);
uuid_id!(MerchantId);
uuid_id!(ItemId);
uuid_id!(EstimateId);
uuid_id!(OrderId);

//--------------------------------------  MerchantCategory  ----------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
pub enum MerchantCategory {
    SmallRestaurant,
    MediumRestaurant,
    LargeRestaurant,
    MerchandiseRestaurant,
    BoothKiosk,
    ConvenienceStore,
}

impl Display for MerchantCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            MerchantCategory::SmallRestaurant => "SmallRestaurant",
            MerchantCategory::MediumRestaurant => "MediumRestaurant",
            MerchantCategory::LargeRestaurant => "LargeRestaurant",
            MerchantCategory::MerchandiseRestaurant => "MerchandiseRestaurant",
            MerchantCategory::BoothKiosk => "BoothKiosk",
            MerchantCategory::ConvenienceStore => "ConvenienceStore",
        };
        write!(f, "{s}")
    }
}

impl FromStr for MerchantCategory {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SmallRestaurant" => Ok(Self::SmallRestaurant),
            "MediumRestaurant" => Ok(Self::MediumRestaurant),
            "LargeRestaurant" => Ok(Self::LargeRestaurant),
            "MerchandiseRestaurant" => Ok(Self::MerchandiseRestaurant),
            "BoothKiosk" => Ok(Self::BoothKiosk),
            "ConvenienceStore" => Ok(Self::ConvenienceStore),
            s => Err(ConversionError(format!("Invalid merchant category: {s}"))),
        }
    }
}

//--------------------------------------  ProductCategory  -----------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
pub enum ProductCategory {
    Beverage,
    Food,
    Snack,
    Condiments,
    Additions,
}

impl Display for ProductCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ProductCategory::Beverage => "Beverage",
            ProductCategory::Food => "Food",
            ProductCategory::Snack => "Snack",
            ProductCategory::Condiments => "Condiments",
            ProductCategory::Additions => "Additions",
        };
        write!(f, "{s}")
    }
}

impl FromStr for ProductCategory {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Beverage" => Ok(Self::Beverage),
            "Food" => Ok(Self::Food),
            "Snack" => Ok(Self::Snack),
            "Condiments" => Ok(Self::Condiments),
            "Additions" => Ok(Self::Additions),
            s => Err(ConversionError(format!("Invalid product category: {s}"))),
        }
    }
}

//--------------------------------------     Merchant      -----------------------------------------------------------
/// A merchant row. Merchants are created by the (external) admin flow and are read-only inputs to the engine.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Merchant {
    pub id: MerchantId,
    pub name: String,
    pub category: MerchantCategory,
    pub image_url: String,
    pub lat: f64,
    pub lng: f64,
    pub created_at: DateTime<Utc>,
}

impl Merchant {
    pub fn location(&self) -> Coordinates {
        Coordinates::new_unchecked(self.lat, self.lng)
    }
}

//--------------------------------------       Item        -----------------------------------------------------------
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub merchant_id: MerchantId,
    pub name: String,
    pub product_category: ProductCategory,
    pub price: Price,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
}

//--------------------------------------     ItemPrice     -----------------------------------------------------------
/// The slice of an item the pricing step needs: the (item, merchant) pair it was looked up by, and its unit price.
#[derive(Debug, Clone, Copy, FromRow)]
pub struct ItemPrice {
    pub item_id: ItemId,
    pub merchant_id: MerchantId,
    pub price: Price,
}

//--------------------------------------     Estimate      -----------------------------------------------------------
/// An immutable pricing/timing quote. Once the row is committed it is never updated; materializing an order copies
/// from it rather than mutating it.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Estimate {
    pub id: EstimateId,
    pub user_id: UserId,
    pub user_lat: f64,
    pub user_lng: f64,
    pub total_price: Price,
    pub estimated_minutes: i64,
    pub created_at: DateTime<Utc>,
}

//--------------------------------------    NewEstimate    -----------------------------------------------------------
/// Everything the estimate store needs to persist one estimate tree in a single transaction.
#[derive(Debug, Clone)]
pub struct NewEstimate {
    pub user_id: UserId,
    pub user_location: Coordinates,
    pub total_price: Price,
    pub estimated_minutes: i64,
    pub orders: Vec<NewEstimateOrder>,
}

#[derive(Debug, Clone)]
pub struct NewEstimateOrder {
    pub merchant_id: MerchantId,
    pub is_starting_point: bool,
    pub items: Vec<NewEstimateOrderItem>,
}

#[derive(Debug, Clone)]
pub struct NewEstimateOrderItem {
    pub item_id: ItemId,
    pub quantity: i64,
}

//--------------------------------------   EstimateOrder   -----------------------------------------------------------
#[derive(Debug, Clone, FromRow)]
pub struct EstimateOrder {
    pub id: Uuid,
    pub estimate_id: EstimateId,
    pub merchant_id: MerchantId,
    pub is_starting_point: bool,
}

//--------------------------------------      TreeLine     -----------------------------------------------------------
/// One denormalized line of an estimate or order tree: the merchant, its starting-point flag, and one item. The
/// materializer reads an estimate's lines in a single query and mirrors them under the new order; tests read both
/// sides to compare trees.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct TreeLine {
    pub merchant_id: MerchantId,
    pub is_starting_point: bool,
    pub item_id: ItemId,
    pub quantity: i64,
}

//--------------------------------------       Order       -----------------------------------------------------------
/// A committed promotion of an estimate. `total_price` and `estimated_minutes` are copied from the estimate
/// byte-identically; prices are never re-read at materialization time.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub estimate_id: EstimateId,
    pub user_id: UserId,
    pub total_price: Price,
    pub estimated_minutes: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct OrderMerchant {
    pub id: Uuid,
    pub order_id: OrderId,
    pub merchant_id: MerchantId,
    pub is_starting_point: bool,
}
