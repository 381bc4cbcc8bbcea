//! Per-symbol position tracking
//!
//! A position carries a signed quantity (positive long, negative short),
//! the volume-weighted average price of the open quantity, realized and
//! unrealized P&L, and gross bought/sold totals.

use rust_decimal::Decimal;
use types::{Price, Quantity, Symbol};

/// Open position in one symbol.
///
/// When the quantity is zero the average price is meaningless and the
/// unrealized P&L is zero. Realized P&L changes only when a trade closes
/// or reduces the position.
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub symbol: Symbol,
    /// Signed quantity: positive long, negative short.
    pub quantity: i64,
    /// Volume-weighted average entry price of the open quantity.
    pub average_price: Decimal,
    pub realized_pnl: Decimal,
    pub unrealized_pnl: Decimal,
    pub total_bought: Quantity,
    pub total_sold: Quantity,
}

impl Position {
    pub fn new(symbol: Symbol) -> Self {
        Self {
            symbol,
            quantity: 0,
            average_price: Decimal::ZERO,
            realized_pnl: Decimal::ZERO,
            unrealized_pnl: Decimal::ZERO,
            total_bought: Quantity::ZERO,
            total_sold: Quantity::ZERO,
        }
    }

    pub fn is_flat(&self) -> bool {
        self.quantity == 0
    }

    pub fn is_long(&self) -> bool {
        self.quantity > 0
    }

    pub fn is_short(&self) -> bool {
        self.quantity < 0
    }

    /// Absolute market value of the open quantity at the given price.
    pub fn market_value(&self, mark: Price) -> Decimal {
        Decimal::from(self.quantity.unsigned_abs()) * mark.as_decimal()
    }

    /// Re-mark the unrealized P&L against a new reference price.
    pub fn update_unrealized(&mut self, mark: Price) {
        if self.quantity == 0 {
            self.unrealized_pnl = Decimal::ZERO;
        } else {
            self.unrealized_pnl =
                Decimal::from(self.quantity) * (mark.as_decimal() - self.average_price);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_position_is_flat() {
        let position = Position::new(Symbol::new("AAPL"));
        assert!(position.is_flat());
        assert!(!position.is_long());
        assert!(!position.is_short());
        assert_eq!(position.unrealized_pnl, Decimal::ZERO);
    }

    #[test]
    fn test_unrealized_long() {
        let mut position = Position::new(Symbol::new("AAPL"));
        position.quantity = 100;
        position.average_price = Decimal::new(15000, 2); // 150.00

        position.update_unrealized(Price::from_ticks(15100)); // 151.00
        assert_eq!(position.unrealized_pnl, Decimal::from(100));
    }

    #[test]
    fn test_unrealized_short() {
        let mut position = Position::new(Symbol::new("AAPL"));
        position.quantity = -100;
        position.average_price = Decimal::new(15000, 2);

        position.update_unrealized(Price::from_ticks(14900)); // fell 1.00
        assert_eq!(position.unrealized_pnl, Decimal::from(100));
    }

    #[test]
    fn test_unrealized_zero_when_flat() {
        let mut position = Position::new(Symbol::new("AAPL"));
        position.unrealized_pnl = Decimal::from(42);
        position.update_unrealized(Price::from_ticks(15000));
        assert_eq!(position.unrealized_pnl, Decimal::ZERO);
    }

    #[test]
    fn test_market_value_uses_absolute_quantity() {
        let mut position = Position::new(Symbol::new("AAPL"));
        position.quantity = -200;
        assert_eq!(
            position.market_value(Price::from_ticks(15000)),
            Decimal::from(30_000)
        );
    }
}
