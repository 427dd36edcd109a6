mod price;
mod secret;

pub use price::{Price, PriceConversionError};
pub use secret::Secret;
