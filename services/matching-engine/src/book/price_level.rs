//! Price level with FIFO queue
//!
//! A price level owns all resting orders at one price point. Orders are
//! kept in strict arrival order to enforce time priority; the aggregate
//! remaining quantity is cached so depth queries never walk the queue.

use std::collections::VecDeque;
use types::{Order, OrderId, Price, Quantity};

/// All resting orders at a single price, in arrival order.
///
/// The cached total always equals the sum of the contained orders'
/// remaining quantities.
#[derive(Debug, Clone)]
pub struct PriceLevel {
    price: Price,
    /// FIFO queue of resting orders (front has time priority).
    orders: VecDeque<Order>,
    /// Cached Σ remaining over the queue.
    total_quantity: Quantity,
}

impl PriceLevel {
    /// Create an empty level at the given price.
    pub fn new(price: Price) -> Self {
        Self {
            price,
            orders: VecDeque::new(),
            total_quantity: Quantity::ZERO,
        }
    }

    /// Append an order at the tail of the queue.
    ///
    /// # Panics
    /// Panics if the order's price differs from the level price or the
    /// order is not active — either indicates a bug in the book, not a
    /// caller-visible failure.
    pub fn add(&mut self, order: Order) {
        assert!(
            order.price() == self.price,
            "order price does not match price level"
        );
        assert!(order.is_active(), "inactive order added to price level");

        self.total_quantity += order.remaining();
        self.orders.push_back(order);
    }

    /// Remove an order by id, returning it if present.
    ///
    /// Linear scan; only the cancel path removes from the middle of the
    /// queue, matching always consumes the front.
    pub fn remove(&mut self, order_id: OrderId) -> Option<Order> {
        let position = self.orders.iter().position(|o| o.id() == order_id)?;
        let order = self.orders.remove(position)?;
        self.total_quantity -= order.remaining();
        Some(order)
    }

    /// Peek at the order with time priority at this price.
    pub fn front(&self) -> Option<&Order> {
        self.orders.front()
    }

    /// Mutable access to the front order, for the matching path.
    pub(crate) fn front_mut(&mut self) -> Option<&mut Order> {
        self.orders.front_mut()
    }

    /// Account for a fill against the given order.
    ///
    /// Subtracts the filled quantity from the cached total and drops the
    /// order from the queue once its remaining quantity reaches zero.
    /// The order itself must already have been filled by the caller.
    pub fn apply_fill(&mut self, order_id: OrderId, filled: Quantity) {
        self.total_quantity -= filled;

        if let Some(position) = self.orders.iter().position(|o| o.id() == order_id) {
            if self.orders[position].remaining().is_zero() {
                self.orders.remove(position);
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn total_quantity(&self) -> Quantity {
        self.total_quantity
    }

    pub fn order_count(&self) -> usize {
        self.orders.len()
    }

    pub fn price(&self) -> Price {
        self.price
    }

    /// Iterate the resting orders in time priority order.
    pub fn orders(&self) -> impl Iterator<Item = &Order> {
        self.orders.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::{Side, Symbol};

    fn sell_at(id: u64, price: i64, qty: u64) -> Order {
        Order::limit(
            OrderId::new(id),
            Symbol::new("AAPL"),
            Side::Sell,
            Price::from_ticks(price),
            Quantity::new(qty),
            id,
        )
    }

    #[test]
    fn test_add_accumulates_quantity() {
        let mut level = PriceLevel::new(Price::from_ticks(15000));
        level.add(sell_at(1, 15000, 100));
        level.add(sell_at(2, 15000, 50));

        assert_eq!(level.order_count(), 2);
        assert_eq!(level.total_quantity(), Quantity::new(150));
        assert!(!level.is_empty());
    }

    #[test]
    #[should_panic(expected = "order price does not match price level")]
    fn test_add_price_mismatch_panics() {
        let mut level = PriceLevel::new(Price::from_ticks(15000));
        level.add(sell_at(1, 15100, 100));
    }

    #[test]
    fn test_fifo_front() {
        let mut level = PriceLevel::new(Price::from_ticks(15000));
        level.add(sell_at(1, 15000, 100));
        level.add(sell_at(2, 15000, 200));

        assert_eq!(level.front().unwrap().id(), OrderId::new(1));
    }

    #[test]
    fn test_remove_middle_order() {
        let mut level = PriceLevel::new(Price::from_ticks(15000));
        level.add(sell_at(1, 15000, 100));
        level.add(sell_at(2, 15000, 200));
        level.add(sell_at(3, 15000, 300));

        let removed = level.remove(OrderId::new(2)).unwrap();
        assert_eq!(removed.id(), OrderId::new(2));
        assert_eq!(level.order_count(), 2);
        assert_eq!(level.total_quantity(), Quantity::new(400));

        assert!(level.remove(OrderId::new(2)).is_none());
    }

    #[test]
    fn test_apply_fill_partial_keeps_order() {
        let mut level = PriceLevel::new(Price::from_ticks(15000));
        level.add(sell_at(1, 15000, 100));

        level.front_mut().unwrap().fill(Quantity::new(40));
        level.apply_fill(OrderId::new(1), Quantity::new(40));

        assert_eq!(level.order_count(), 1);
        assert_eq!(level.total_quantity(), Quantity::new(60));
    }

    #[test]
    fn test_apply_fill_full_removes_order() {
        let mut level = PriceLevel::new(Price::from_ticks(15000));
        level.add(sell_at(1, 15000, 100));

        level.front_mut().unwrap().fill(Quantity::new(100));
        level.apply_fill(OrderId::new(1), Quantity::new(100));

        assert!(level.is_empty());
        assert_eq!(level.total_quantity(), Quantity::ZERO);
    }

    #[test]
    fn test_total_quantity_matches_sum() {
        let mut level = PriceLevel::new(Price::from_ticks(15000));
        level.add(sell_at(1, 15000, 10));
        level.add(sell_at(2, 15000, 20));
        level.add(sell_at(3, 15000, 30));

        let sum: Quantity = level.orders().map(|o| o.remaining()).sum();
        assert_eq!(level.total_quantity(), sum);
    }
}
