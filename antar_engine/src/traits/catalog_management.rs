use thiserror::Error;

use crate::{
    api::objects::NearbyRow,
    db_types::{ItemId, ItemPrice, Merchant, MerchantId},
    geo::Coordinates,
};

/// Read access to the merchant/item catalog. The catalog is populated by external admin flows; the engine only ever
/// reads it.
///
/// Every method here is a batch operation and must be served by a single database round trip.
#[allow(async_fn_in_trait)]
pub trait CatalogManagement {
    /// Fetches the merchants for the given id set.
    ///
    /// Fails with [`CatalogApiError::MerchantNotFound`] if any requested id is missing from the result set.
    /// Duplicate ids in the input are allowed and collapse to one row.
    async fn fetch_merchants_by_ids(&self, ids: &[MerchantId]) -> Result<Vec<Merchant>, CatalogApiError>;

    /// Fetches the unit price for every `(item, merchant)` pair.
    ///
    /// Fails with [`CatalogApiError::ItemNotFound`] when any pair does not exist, including the case where the item
    /// exists but belongs to a different merchant.
    async fn fetch_item_prices(&self, pairs: &[(ItemId, MerchantId)]) -> Result<Vec<ItemPrice>, CatalogApiError>;

    /// Returns merchant+item rows near a point, grouped per merchant and ordered by ascending hex-grid distance
    /// from `location`. Merchants whose grid distance is undefined sort last. Merchants without items produce a
    /// single row with empty item columns.
    async fn fetch_merchants_with_items_near(&self, location: Coordinates) -> Result<Vec<NearbyRow>, CatalogApiError>;
}

#[derive(Debug, Clone, Error)]
pub enum CatalogApiError {
    #[error("merchant not found")]
    MerchantNotFound,
    #[error("item not found")]
    ItemNotFound,
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<sqlx::Error> for CatalogApiError {
    fn from(e: sqlx::Error) -> Self {
        CatalogApiError::DatabaseError(e.to_string())
    }
}
