//! Cross detection
//!
//! Decides whether an incoming order can trade against the best resting
//! price on the opposite side.

use types::{Order, OrderType, Price, Side};

/// True when the incoming order crosses the given opposite-side price.
///
/// Market orders always cross. A limit buy crosses when the best ask is
/// at or below its limit; a limit sell when the best bid is at or above.
pub fn crosses(incoming: &Order, best_opposite: Price) -> bool {
    match incoming.order_type() {
        OrderType::Market => true,
        _ => match incoming.side() {
            Side::Buy => best_opposite <= incoming.price(),
            Side::Sell => best_opposite >= incoming.price(),
        },
    }
}
