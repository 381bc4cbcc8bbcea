//! Matching engine core
//!
//! Drives the execution protocol: an incoming order walks the opposite
//! side of the book in priority order, trades are emitted best price
//! first and FIFO within a price, and any residual limit quantity rests.
//! Market residual is reported to observers and discarded.

use std::cmp;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::warn;
use types::{Clock, MonotonicClock, Order, OrderId, OrderType, Price, Quantity, Side, Symbol, Trade};

use crate::book::OrderBook;
use crate::events::EngineObserver;
use crate::matching::crossing;

/// Cumulative matching counters.
///
/// Written only from the engine thread; readable from anywhere with
/// relaxed loads. All counters are monotonically non-decreasing.
#[derive(Debug, Default)]
pub struct EngineStats {
    total_trades: AtomicU64,
    total_volume: AtomicU64,
    /// Matched value in price ticks × units (0.01 currency units).
    total_value_ticks: AtomicU64,
    market_orders_matched: AtomicU64,
    limit_orders_matched: AtomicU64,
}

impl EngineStats {
    fn record_trade(&self, price: Price, quantity: Quantity) {
        self.total_trades.fetch_add(1, Ordering::Relaxed);
        self.total_volume.fetch_add(quantity.value(), Ordering::Relaxed);
        self.total_value_ticks
            .fetch_add(price.ticks() as u64 * quantity.value(), Ordering::Relaxed);
    }

    fn record_market_order(&self) {
        self.market_orders_matched.fetch_add(1, Ordering::Relaxed);
    }

    fn record_limit_order(&self) {
        self.limit_orders_matched.fetch_add(1, Ordering::Relaxed);
    }

    /// Consistent-enough point-in-time view for reporting.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            total_trades: self.total_trades.load(Ordering::Relaxed),
            total_volume: self.total_volume.load(Ordering::Relaxed),
            total_value: self.total_value_ticks.load(Ordering::Relaxed) as f64 / 100.0,
            market_orders_matched: self.market_orders_matched.load(Ordering::Relaxed),
            limit_orders_matched: self.limit_orders_matched.load(Ordering::Relaxed),
        }
    }
}

/// Plain-value view of [`EngineStats`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatsSnapshot {
    pub total_trades: u64,
    pub total_volume: u64,
    pub total_value: f64,
    pub market_orders_matched: u64,
    pub limit_orders_matched: u64,
}

/// Single-symbol matching engine.
///
/// All mutation happens on one logical executor; observers fire
/// synchronously on that executor and must not re-enter the engine.
pub struct MatchingEngine {
    symbol: Symbol,
    book: OrderBook,
    stats: Arc<EngineStats>,
    clock: Box<dyn Clock>,
    observers: Vec<Box<dyn EngineObserver>>,
}

impl MatchingEngine {
    pub fn new(symbol: Symbol) -> Self {
        Self::with_clock(symbol, Box::new(MonotonicClock::new()))
    }

    pub fn with_clock(symbol: Symbol, clock: Box<dyn Clock>) -> Self {
        Self {
            book: OrderBook::new(symbol.clone()),
            symbol,
            stats: Arc::new(EngineStats::default()),
            clock,
            observers: Vec::new(),
        }
    }

    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    pub fn book(&self) -> &OrderBook {
        &self.book
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Shareable handle for reading counters from other threads.
    pub fn stats_handle(&self) -> Arc<EngineStats> {
        Arc::clone(&self.stats)
    }

    /// Register an observer for trades and order updates.
    pub fn add_observer(&mut self, observer: Box<dyn EngineObserver>) {
        self.observers.push(observer);
    }

    /// Submit an order, returning the trades it generated in emission
    /// order (best price first, FIFO within a price).
    ///
    /// Symbol mismatch returns an empty vec with no mutation and no
    /// callbacks. A duplicate id rejects the order without touching the
    /// book. Residual limit quantity rests; residual market quantity is
    /// discarded after observers have seen its final state.
    pub fn submit(&mut self, mut order: Order) -> Vec<Trade> {
        if order.symbol() != &self.symbol {
            warn!(
                order_id = order.id().value(),
                symbol = %order.symbol(),
                engine_symbol = %self.symbol,
                "order symbol mismatch"
            );
            return Vec::new();
        }

        if self.book.contains(order.id()) {
            warn!(order_id = order.id().value(), "duplicate order id rejected");
            order.reject();
            self.notify_order_update(&order);
            return Vec::new();
        }

        let opposite = order.side().opposite();
        let mut trades = Vec::new();
        let mut touched: Vec<Order> = Vec::new();

        while !order.remaining().is_zero() {
            let Some(best) = self.best_price(opposite) else {
                break;
            };
            if !crossing::crosses(&order, best) {
                break;
            }

            let Some(resting_remaining) =
                self.book.front_order(opposite, best).map(|o| o.remaining())
            else {
                break;
            };

            let fill = cmp::min(order.remaining(), resting_remaining);
            let resting = self
                .book
                .fill_front(opposite, best, fill)
                .expect("front order disappeared mid-match");
            order.fill(fill);

            let (buy_id, sell_id) = match order.side() {
                Side::Buy => (order.id(), resting.id()),
                Side::Sell => (resting.id(), order.id()),
            };
            let trade = Trade::new(
                buy_id,
                sell_id,
                self.symbol.clone(),
                best,
                fill,
                self.clock.now(),
            );

            self.stats.record_trade(best, fill);
            trades.push(trade);
            touched.push(resting);
        }

        match order.order_type() {
            OrderType::Market => {
                self.stats.record_market_order();
                if !order.remaining().is_zero() {
                    warn!(
                        order_id = order.id().value(),
                        remaining = order.remaining().value(),
                        "market order residual discarded"
                    );
                }
            }
            _ => {
                self.stats.record_limit_order();
                if !order.remaining().is_zero() {
                    let rested = self.book.add_order(order.clone());
                    debug_assert!(rested, "residual limit order failed to rest");
                }
            }
        }

        for trade in &trades {
            for observer in self.observers.iter_mut() {
                observer.on_trade(trade);
            }
        }
        self.notify_order_update(&order);
        for resting in &touched {
            self.notify_order_update(resting);
        }

        trades
    }

    /// Cancel a resting order. Unknown ids return false without mutation.
    pub fn cancel(&mut self, order_id: OrderId) -> bool {
        match self.book.cancel_order(order_id) {
            Some(cancelled) => {
                self.notify_order_update(&cancelled);
                true
            }
            None => false,
        }
    }

    /// Atomic cancel-and-resubmit with the same id, symbol, side, and
    /// type. The replacement goes through the full matching path, so it
    /// can trade immediately. Observers see exactly the cancel's update
    /// followed by the resubmission's events, with nothing in between.
    pub fn modify(&mut self, order_id: OrderId, new_price: Price, new_qty: Quantity) -> bool {
        let Some(old) = self.book.order(order_id).cloned() else {
            return false;
        };
        self.cancel(order_id);

        let replacement = Order::new(
            order_id,
            old.symbol().clone(),
            old.side(),
            old.order_type(),
            new_price,
            new_qty,
            self.clock.now(),
        );
        self.submit(replacement);
        true
    }

    fn best_price(&self, side: Side) -> Option<Price> {
        match side {
            Side::Buy => self.book.best_bid(),
            Side::Sell => self.book.best_ask(),
        }
    }

    fn notify_order_update(&mut self, order: &Order) {
        for observer in self.observers.iter_mut() {
            observer.on_order_update(order);
        }
    }
}
