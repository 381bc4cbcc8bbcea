//! Trading limits

use rust_decimal::Decimal;
use types::Quantity;

/// Configured trading constraints.
///
/// Position size is checked as an absolute value, so the same limit
/// bounds both long and short exposure. `max_daily_loss` is a positive
/// number denoting the loss threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct RiskLimits {
    /// Max single order quantity.
    pub max_order_size: Quantity,
    /// Max single order value in quote currency.
    pub max_order_value: Decimal,
    /// Max position, long or short.
    pub max_position_size: i64,
    /// Max position value in quote currency.
    pub max_position_value: Decimal,
    /// Max loss per day in quote currency.
    pub max_daily_loss: Decimal,
    /// Max drawdown from peak equity.
    pub max_drawdown: Decimal,
    /// Order rate cap per second.
    pub max_orders_per_second: u32,
}

impl Default for RiskLimits {
    fn default() -> Self {
        Self {
            max_order_size: Quantity::new(10_000),
            max_order_value: Decimal::from(1_000_000),
            max_position_size: 50_000,
            max_position_value: Decimal::from(5_000_000),
            max_daily_loss: Decimal::from(100_000),
            max_drawdown: Decimal::from(200_000),
            max_orders_per_second: 100,
        }
    }
}
