//! Combined two-sided order book with id index
//!
//! Owns every resting order (each lives inside exactly one price level)
//! and keeps a secondary index from order id to (side, price) so cancel
//! and modify never search the ladder.

use std::collections::HashMap;
use tracing::debug;
use types::{Order, OrderId, Price, Quantity, Side, Symbol};

use super::ask_book::AskBook;
use super::bid_book::BidBook;
use super::price_level::PriceLevel;

/// One row of a depth snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepthLevel {
    pub price: Price,
    pub quantity: Quantity,
    pub orders: usize,
}

/// Aggregate book statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookStats {
    pub total_orders: usize,
    pub bid_levels: usize,
    pub ask_levels: usize,
    pub total_bid_quantity: Quantity,
    pub total_ask_quantity: Quantity,
}

/// Two-sided book for a single symbol.
///
/// Empty levels are removed immediately, and after matching completes
/// the best bid is always strictly below the best ask when both exist.
#[derive(Debug, Clone)]
pub struct OrderBook {
    symbol: Symbol,
    bids: BidBook,
    asks: AskBook,
    /// Resting order locator: id → (side, price).
    index: HashMap<OrderId, (Side, Price)>,
}

impl OrderBook {
    pub fn new(symbol: Symbol) -> Self {
        Self {
            symbol,
            bids: BidBook::new(),
            asks: AskBook::new(),
            index: HashMap::new(),
        }
    }

    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    /// Rest an order on its side of the book.
    ///
    /// Returns false on a symbol mismatch or duplicate id; the book is
    /// untouched in either case. On success the order sits at the tail
    /// of its price level, strictly after everything already there.
    pub fn add_order(&mut self, order: Order) -> bool {
        if order.symbol() != &self.symbol {
            return false;
        }
        if self.index.contains_key(&order.id()) {
            return false;
        }

        self.index.insert(order.id(), (order.side(), order.price()));
        match order.side() {
            Side::Buy => self.bids.insert(order),
            Side::Sell => self.asks.insert(order),
        }
        true
    }

    /// Cancel a resting order.
    ///
    /// Returns the cancelled order (status set, remaining zeroed) or
    /// `None` if the id is unknown.
    pub fn cancel_order(&mut self, order_id: OrderId) -> Option<Order> {
        let (side, price) = self.index.remove(&order_id)?;
        let mut order = match side {
            Side::Buy => self.bids.remove(order_id, price),
            Side::Sell => self.asks.remove(order_id, price),
        }
        .expect("indexed order missing from its price level");

        order.cancel();
        debug!(order_id = order_id.value(), "order cancelled");
        Some(order)
    }

    /// Cancel-and-re-add with the same id, symbol, side, and type.
    ///
    /// The replaced order forfeits its queue position: amending price or
    /// quantity moves it to the tail of the (possibly new) level.
    pub fn modify_order(&mut self, order_id: OrderId, new_price: Price, new_qty: Quantity) -> bool {
        let Some(old) = self.cancel_order(order_id) else {
            return false;
        };

        let replacement = Order::new(
            order_id,
            old.symbol().clone(),
            old.side(),
            old.order_type(),
            new_price,
            new_qty,
            old.timestamp(),
        );
        self.add_order(replacement)
    }

    /// Highest resting buy price.
    pub fn best_bid(&self) -> Option<Price> {
        self.bids.best_price()
    }

    /// Lowest resting sell price.
    pub fn best_ask(&self) -> Option<Price> {
        self.asks.best_price()
    }

    /// Best ask minus best bid; defined only when both sides exist.
    pub fn spread(&self) -> Option<Price> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => Some(ask - bid),
            _ => None,
        }
    }

    /// Midpoint of best bid and ask; defined only when both sides exist.
    pub fn mid_price(&self) -> Option<f64> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => Some((bid.to_f64() + ask.to_f64()) / 2.0),
            _ => None,
        }
    }

    /// Resting order with time priority at the given side and price.
    pub fn front_order(&self, side: Side, price: Price) -> Option<&Order> {
        self.level(side, price)?.front()
    }

    /// Look up a resting order by id.
    pub fn order(&self, order_id: OrderId) -> Option<&Order> {
        let (side, price) = *self.index.get(&order_id)?;
        self.level(side, price)?
            .orders()
            .find(|o| o.id() == order_id)
    }

    pub fn contains(&self, order_id: OrderId) -> bool {
        self.index.contains_key(&order_id)
    }

    /// Top `n` levels of one side, in priority order.
    pub fn depth(&self, side: Side, n: usize) -> Vec<DepthLevel> {
        match side {
            Side::Buy => self.bids.depth(n),
            Side::Sell => self.asks.depth(n),
        }
    }

    pub fn total_bid_quantity(&self) -> Quantity {
        self.bids.total_quantity()
    }

    pub fn total_ask_quantity(&self) -> Quantity {
        self.asks.total_quantity()
    }

    pub fn stats(&self) -> BookStats {
        BookStats {
            total_orders: self.index.len(),
            bid_levels: self.bids.level_count(),
            ask_levels: self.asks.level_count(),
            total_bid_quantity: self.total_bid_quantity(),
            total_ask_quantity: self.total_ask_quantity(),
        }
    }

    /// Number of resting orders.
    pub fn order_count(&self) -> usize {
        self.index.len()
    }

    pub fn level(&self, side: Side, price: Price) -> Option<&PriceLevel> {
        match side {
            Side::Buy => self.bids.level(price),
            Side::Sell => self.asks.level(price),
        }
    }

    /// Fill the front order at (side, price) and return its post-fill
    /// state. A fully filled order leaves both its level and the id
    /// index, and an emptied level is removed.
    pub(crate) fn fill_front(&mut self, side: Side, price: Price, qty: Quantity) -> Option<Order> {
        let (snapshot, level_empty) = {
            let level = match side {
                Side::Buy => self.bids.level_mut(price),
                Side::Sell => self.asks.level_mut(price),
            }?;
            let resting = level.front_mut()?;
            resting.fill(qty);
            let snapshot = resting.clone();
            level.apply_fill(snapshot.id(), qty);
            (snapshot, level.is_empty())
        };

        if snapshot.remaining().is_zero() {
            self.index.remove(&snapshot.id());
        }
        if level_empty {
            match side {
                Side::Buy => self.bids.remove_level(price),
                Side::Sell => self.asks.remove_level(price),
            }
        }
        Some(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::OrderStatus;

    fn book() -> OrderBook {
        OrderBook::new(Symbol::new("AAPL"))
    }

    fn order(id: u64, side: Side, price: i64, qty: u64) -> Order {
        Order::limit(
            OrderId::new(id),
            Symbol::new("AAPL"),
            side,
            Price::from_ticks(price),
            Quantity::new(qty),
            id,
        )
    }

    #[test]
    fn test_add_order_indexes() {
        let mut book = book();
        assert!(book.add_order(order(1, Side::Buy, 15000, 100)));

        assert!(book.contains(OrderId::new(1)));
        assert_eq!(book.best_bid(), Some(Price::from_ticks(15000)));
        assert_eq!(book.order(OrderId::new(1)).unwrap().id(), OrderId::new(1));
    }

    #[test]
    fn test_add_order_rejects_duplicate_id() {
        let mut book = book();
        assert!(book.add_order(order(1, Side::Buy, 15000, 100)));
        assert!(!book.add_order(order(1, Side::Buy, 15100, 50)));

        assert_eq!(book.order_count(), 1);
        assert_eq!(book.best_bid(), Some(Price::from_ticks(15000)));
    }

    #[test]
    fn test_add_order_rejects_symbol_mismatch() {
        let mut book = book();
        let foreign = Order::limit(
            OrderId::new(1),
            Symbol::new("MSFT"),
            Side::Buy,
            Price::from_ticks(15000),
            Quantity::new(100),
            1,
        );
        assert!(!book.add_order(foreign));
        assert_eq!(book.order_count(), 0);
    }

    #[test]
    fn test_cancel_order() {
        let mut book = book();
        book.add_order(order(7, Side::Buy, 15000, 100));

        let cancelled = book.cancel_order(OrderId::new(7)).unwrap();
        assert_eq!(cancelled.status(), OrderStatus::Cancelled);
        assert!(cancelled.remaining().is_zero());
        assert_eq!(book.best_bid(), None);

        assert!(book.cancel_order(OrderId::new(7)).is_none());
    }

    #[test]
    fn test_modify_loses_queue_position() {
        let mut book = book();
        book.add_order(order(1, Side::Sell, 15000, 100));
        book.add_order(order(2, Side::Sell, 15000, 100));

        // Amending order 1 moves it behind order 2.
        assert!(book.modify_order(
            OrderId::new(1),
            Price::from_ticks(15000),
            Quantity::new(80)
        ));

        let front = book
            .front_order(Side::Sell, Price::from_ticks(15000))
            .unwrap();
        assert_eq!(front.id(), OrderId::new(2));

        let modified = book.order(OrderId::new(1)).unwrap();
        assert_eq!(modified.quantity(), Quantity::new(80));
    }

    #[test]
    fn test_modify_unknown_id() {
        let mut book = book();
        assert!(!book.modify_order(
            OrderId::new(99),
            Price::from_ticks(15000),
            Quantity::new(10)
        ));
    }

    #[test]
    fn test_spread_and_mid() {
        let mut book = book();
        assert_eq!(book.spread(), None);
        assert_eq!(book.mid_price(), None);

        book.add_order(order(1, Side::Buy, 15000, 100));
        book.add_order(order(2, Side::Sell, 15100, 100));

        assert_eq!(book.spread(), Some(Price::from_ticks(100)));
        assert_eq!(book.mid_price(), Some(150.5));
    }

    #[test]
    fn test_stats() {
        let mut book = book();
        book.add_order(order(1, Side::Buy, 15000, 100));
        book.add_order(order(2, Side::Buy, 14900, 50));
        book.add_order(order(3, Side::Sell, 15100, 200));

        let stats = book.stats();
        assert_eq!(stats.total_orders, 3);
        assert_eq!(stats.bid_levels, 2);
        assert_eq!(stats.ask_levels, 1);
        assert_eq!(stats.total_bid_quantity, Quantity::new(150));
        assert_eq!(stats.total_ask_quantity, Quantity::new(200));
    }

    #[test]
    fn test_fill_front_removes_filled_order() {
        let mut book = book();
        book.add_order(order(1, Side::Sell, 15000, 100));
        book.add_order(order(2, Side::Sell, 15000, 50));

        let snapshot = book
            .fill_front(Side::Sell, Price::from_ticks(15000), Quantity::new(100))
            .unwrap();
        assert_eq!(snapshot.id(), OrderId::new(1));
        assert_eq!(snapshot.status(), OrderStatus::Filled);

        assert!(!book.contains(OrderId::new(1)));
        let front = book
            .front_order(Side::Sell, Price::from_ticks(15000))
            .unwrap();
        assert_eq!(front.id(), OrderId::new(2));
    }
}
