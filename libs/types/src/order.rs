//! Order lifecycle types
//!
//! An order is immutable except for its remaining quantity and status.
//! Status transitions are driven solely by fills and cancellation:
//! New → PartiallyFilled → Filled, or New/PartiallyFilled → Cancelled.

use crate::clock::Timestamp;
use crate::ids::{OrderId, Symbol};
use crate::numeric::{Price, Quantity};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Order side (buyer or seller).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// Get the opposite side.
    pub fn opposite(&self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
        }
    }
}

/// Order type.
///
/// Stop and stop-limit orders are carried as tags only; the engine gives
/// them no activation semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderType {
    Market,
    Limit,
    Stop,
    StopLimit,
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderType::Market => write!(f, "MARKET"),
            OrderType::Limit => write!(f, "LIMIT"),
            OrderType::Stop => write!(f, "STOP"),
            OrderType::StopLimit => write!(f, "STOP_LIMIT"),
        }
    }
}

/// Order status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    New,
    PartiallyFilled,
    Filled,
    Cancelled,
    Rejected,
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderStatus::New => write!(f, "NEW"),
            OrderStatus::PartiallyFilled => write!(f, "PARTIALLY_FILLED"),
            OrderStatus::Filled => write!(f, "FILLED"),
            OrderStatus::Cancelled => write!(f, "CANCELLED"),
            OrderStatus::Rejected => write!(f, "REJECTED"),
        }
    }
}

/// A single order.
///
/// Invariants: remaining ≤ original quantity; `Filled` exactly when
/// remaining reaches zero through fills; `Cancelled` implies remaining
/// was zeroed on cancellation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    id: OrderId,
    symbol: Symbol,
    side: Side,
    order_type: OrderType,
    price: Price,
    quantity: Quantity,
    remaining: Quantity,
    status: OrderStatus,
    timestamp: Timestamp,
}

impl Order {
    /// Create a new order.
    pub fn new(
        id: OrderId,
        symbol: Symbol,
        side: Side,
        order_type: OrderType,
        price: Price,
        quantity: Quantity,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            id,
            symbol,
            side,
            order_type,
            price,
            quantity,
            remaining: quantity,
            status: OrderStatus::New,
            timestamp,
        }
    }

    /// Convenience constructor for a limit order.
    pub fn limit(
        id: OrderId,
        symbol: Symbol,
        side: Side,
        price: Price,
        quantity: Quantity,
        timestamp: Timestamp,
    ) -> Self {
        Self::new(id, symbol, side, OrderType::Limit, price, quantity, timestamp)
    }

    /// Convenience constructor for a market order (price 0).
    pub fn market(
        id: OrderId,
        symbol: Symbol,
        side: Side,
        quantity: Quantity,
        timestamp: Timestamp,
    ) -> Self {
        Self::new(
            id,
            symbol,
            side,
            OrderType::Market,
            Price::ZERO,
            quantity,
            timestamp,
        )
    }

    pub fn id(&self) -> OrderId {
        self.id
    }

    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn order_type(&self) -> OrderType {
        self.order_type
    }

    pub fn price(&self) -> Price {
        self.price
    }

    pub fn quantity(&self) -> Quantity {
        self.quantity
    }

    pub fn remaining(&self) -> Quantity {
        self.remaining
    }

    /// Quantity executed so far.
    pub fn filled_quantity(&self) -> Quantity {
        self.quantity - self.remaining
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    /// An order is active while it can still trade.
    pub fn is_active(&self) -> bool {
        matches!(self.status, OrderStatus::New | OrderStatus::PartiallyFilled)
    }

    pub fn is_filled(&self) -> bool {
        self.status == OrderStatus::Filled
    }

    /// Apply a fill, reducing the remaining quantity.
    ///
    /// # Panics
    /// Panics if the fill exceeds the remaining quantity; a negative
    /// remaining is a bug in the matching path, not a caller error.
    pub fn fill(&mut self, qty: Quantity) {
        assert!(
            qty <= self.remaining,
            "fill exceeds remaining quantity: {} > {}",
            qty,
            self.remaining
        );
        self.remaining -= qty;

        self.status = if self.remaining.is_zero() {
            OrderStatus::Filled
        } else {
            OrderStatus::PartiallyFilled
        };
    }

    /// Cancel the order, zeroing its remaining quantity.
    pub fn cancel(&mut self) {
        self.status = OrderStatus::Cancelled;
        self.remaining = Quantity::ZERO;
    }

    /// Mark the order rejected. No quantity ever executes.
    pub fn reject(&mut self) {
        self.status = OrderStatus::Rejected;
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Order[id={}, symbol={}, side={}, type={}, price={}, qty={}, remaining={}, status={}]",
            self.id,
            self.symbol,
            self.side,
            self.order_type,
            self.price,
            self.quantity,
            self.remaining,
            self.status
        )
    }
}
