//! Executed trade record
//!
//! A trade is immutable once produced by the matching engine. The
//! buy/sell roles come from the sides of the matched orders, never from
//! which one was the aggressor.

use crate::clock::Timestamp;
use crate::ids::{OrderId, Symbol};
use crate::numeric::{Price, Quantity};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An executed trade between a buy and a sell order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    buy_order_id: OrderId,
    sell_order_id: OrderId,
    symbol: Symbol,
    price: Price,
    quantity: Quantity,
    timestamp: Timestamp,
}

impl Trade {
    pub fn new(
        buy_order_id: OrderId,
        sell_order_id: OrderId,
        symbol: Symbol,
        price: Price,
        quantity: Quantity,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            buy_order_id,
            sell_order_id,
            symbol,
            price,
            quantity,
            timestamp,
        }
    }

    pub fn buy_order_id(&self) -> OrderId {
        self.buy_order_id
    }

    pub fn sell_order_id(&self) -> OrderId {
        self.sell_order_id
    }

    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    pub fn price(&self) -> Price {
        self.price
    }

    pub fn quantity(&self) -> Quantity {
        self.quantity
    }

    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    /// Trade value in quote currency: price × quantity.
    pub fn value(&self) -> Decimal {
        self.price.as_decimal() * self.quantity.as_decimal()
    }

    /// Whether the given order participated in this trade.
    pub fn involves_order(&self, order_id: OrderId) -> bool {
        self.buy_order_id == order_id || self.sell_order_id == order_id
    }

    /// CSV line: timestamp,buyOrderId,sellOrderId,symbol,price,quantity,value
    pub fn to_csv(&self) -> String {
        format!(
            "{},{},{},{},{},{},{}",
            self.timestamp,
            self.buy_order_id,
            self.sell_order_id,
            self.symbol,
            self.price,
            self.quantity,
            self.value().round_dp(2)
        )
    }
}

impl fmt::Display for Trade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Trade[buy={}, sell={}, symbol={}, price={}, qty={}, value={}]",
            self.buy_order_id,
            self.sell_order_id,
            self.symbol,
            self.price,
            self.quantity,
            self.value().round_dp(2)
        )
    }
}
