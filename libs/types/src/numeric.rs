//! Fixed-point price and quantity types
//!
//! Prices are stored as signed 64-bit tick counts in hundredths of the
//! quote currency (1 tick = 0.01). Quantities are unsigned 64-bit counts
//! of discrete units. Currency-valued results (order value, P&L) use
//! `rust_decimal` so the accounting paths never touch floating point.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub, SubAssign};

/// Number of ticks per unit of the quote currency.
pub const PRICE_SCALE: i64 = 100;

/// Fixed-point price in hundredths of the quote currency.
///
/// External double prices are multiplied by 100 and truncated on entry;
/// the wire codec is the only place that conversion happens.
/// Serialized as a JSON number at full precision (two decimals).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Price(i64);

impl Price {
    pub const ZERO: Price = Price(0);

    pub fn from_ticks(ticks: i64) -> Self {
        Self(ticks)
    }

    /// Convert an external double price, truncating to the tick grid.
    pub fn from_f64(value: f64) -> Self {
        Self((value * PRICE_SCALE as f64) as i64)
    }

    pub fn ticks(&self) -> i64 {
        self.0
    }

    pub fn to_f64(&self) -> f64 {
        self.0 as f64 / PRICE_SCALE as f64
    }

    /// Exact decimal representation (scale 2).
    pub fn as_decimal(&self) -> Decimal {
        Decimal::new(self.0, 2)
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

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

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_decimal())
    }
}

impl Serialize for Price {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_f64(self.to_f64())
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = f64::deserialize(deserializer)?;
        Ok(Self::from_f64(value))
    }
}

/// Quantity of discrete units.
///
/// Subtraction below zero is a fatal invariant violation (a remaining
/// quantity can never go negative) and panics.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Quantity(u64);

impl Quantity {
    pub const ZERO: Quantity = Quantity(0);

    pub fn new(units: u64) -> Self {
        Self(units)
    }

    pub fn value(&self) -> u64 {
        self.0
    }

    pub fn as_decimal(&self) -> Decimal {
        Decimal::from(self.0)
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Add for Quantity {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Quantity {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Quantity {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        assert!(self.0 >= rhs.0, "quantity underflow");
        Self(self.0 - rhs.0)
    }
}

impl SubAssign for Quantity {
    fn sub_assign(&mut self, rhs: Self) {
        assert!(self.0 >= rhs.0, "quantity underflow");
        self.0 -= rhs.0;
    }
}

impl Sum for Quantity {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Quantity::ZERO, |acc, q| acc + q)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Quantity {
    fn from(units: u64) -> Self {
        Self(units)
    }
}
