use std::{
    fmt::Display,
    iter::Sum,
    ops::{Add, Sub},
};

use serde::{Deserialize, Serialize};
use sqlx::Type;
use thiserror::Error;

//--------------------------------------      Price       ------------------------------------------------------------
/// An amount of money in the smallest currency unit. Never negative in practice, but signed so that it round-trips
/// through the database without casts.
#[derive(Debug, Clone, Copy, Default, Type, Ord, PartialOrd, Serialize, Deserialize)]
#[sqlx(transparent)]
pub struct Price(i64);

#[derive(Debug, Clone, Error)]
#[error("Value cannot be represented as a price: {0}")]
pub struct PriceConversionError(String);

impl From<i64> for Price {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl TryFrom<u64> for Price {
    type Error = PriceConversionError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        if value > i64::MAX as u64 {
            Err(PriceConversionError(format!("Value {value} is too large to convert to a price")))
        } else {
            #[allow(clippy::cast_possible_wrap)]
            Ok(Self(value as i64))
        }
    }
}

impl PartialEq for Price {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for Price {}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Price {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

impl Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Rp{}", self.0)
    }
}

impl Price {
    pub fn value(&self) -> i64 {
        self.0
    }

    /// Multiply a unit price by a quantity, failing on 64-bit signed overflow.
    pub fn checked_mul(self, quantity: i64) -> Option<Price> {
        self.0.checked_mul(quantity).map(Price)
    }

    /// Add two prices, failing on 64-bit signed overflow.
    pub fn checked_add(self, rhs: Price) -> Option<Price> {
        self.0.checked_add(rhs.0).map(Price)
    }
}
