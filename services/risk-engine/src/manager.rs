//! Pre-trade validation and post-trade accounting
//!
//! `validate` runs the limit checks in a fixed order so callers can rely
//! on the reported reason; the first failing check wins.
//! `update_position` applies executed trades to the per-symbol position
//! book using the aggressor side supplied by the caller.

use rust_decimal::Decimal;
use std::collections::{HashMap, VecDeque};
use std::fmt;
use tracing::debug;
use types::{Order, OrderType, Price, Side, Symbol, Timestamp, Trade};

use crate::limits::RiskLimits;
use crate::position::Position;

const NANOS_PER_SECOND: u64 = 1_000_000_000;

/// Outcome of pre-trade validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskCheckResult {
    Accepted,
    OrderSizeExceeded,
    OrderValueExceeded,
    PositionLimitExceeded,
    PositionValueExceeded,
    DailyLossExceeded,
    DrawdownExceeded,
    RateLimited,
}

impl RiskCheckResult {
    pub fn is_accepted(&self) -> bool {
        matches!(self, RiskCheckResult::Accepted)
    }
}

impl fmt::Display for RiskCheckResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            RiskCheckResult::Accepted => "ACCEPTED",
            RiskCheckResult::OrderSizeExceeded => "REJECTED: Order size too large",
            RiskCheckResult::OrderValueExceeded => "REJECTED: Order value too large",
            RiskCheckResult::PositionLimitExceeded => "REJECTED: Position limit exceeded",
            RiskCheckResult::PositionValueExceeded => "REJECTED: Position value too large",
            RiskCheckResult::DailyLossExceeded => "REJECTED: Daily loss limit exceeded",
            RiskCheckResult::DrawdownExceeded => "REJECTED: Drawdown limit exceeded",
            RiskCheckResult::RateLimited => "REJECTED: Rate limit exceeded",
        };
        write!(f, "{}", text)
    }
}

/// Enforces trading limits and tracks positions, P&L, and equity.
pub struct RiskManager {
    limits: RiskLimits,
    positions: HashMap<Symbol, Position>,
    daily_pnl: Decimal,
    peak_equity: Decimal,
    current_equity: Decimal,
    /// Accepted-order timestamps inside the trailing one-second window.
    submissions: VecDeque<Timestamp>,
}

impl RiskManager {
    pub fn new(limits: RiskLimits) -> Self {
        Self {
            limits,
            positions: HashMap::new(),
            daily_pnl: Decimal::ZERO,
            peak_equity: Decimal::ZERO,
            current_equity: Decimal::ZERO,
            submissions: VecDeque::new(),
        }
    }

    /// Validate an order before submission.
    ///
    /// `reference_price` is the limit price for limit orders and the
    /// caller-supplied last/mark price for market orders. The position
    /// checks use the would-be position after the order executes in
    /// full.
    pub fn validate(&mut self, order: &Order, reference_price: Price) -> RiskCheckResult {
        if order.quantity() > self.limits.max_order_size {
            return RiskCheckResult::OrderSizeExceeded;
        }

        let order_price = if order.order_type() == OrderType::Market {
            reference_price
        } else {
            order.price()
        };
        let order_value = order.quantity().as_decimal() * order_price.as_decimal();
        if order_value > self.limits.max_order_value {
            return RiskCheckResult::OrderValueExceeded;
        }

        let current = self
            .positions
            .get(order.symbol())
            .map(|p| p.quantity)
            .unwrap_or(0);
        let signed_qty = order.quantity().value() as i64;
        let would_be = match order.side() {
            Side::Buy => current + signed_qty,
            Side::Sell => current - signed_qty,
        };
        if would_be.unsigned_abs() > self.limits.max_position_size.unsigned_abs() {
            return RiskCheckResult::PositionLimitExceeded;
        }

        let would_be_value = Decimal::from(would_be.unsigned_abs()) * order_price.as_decimal();
        if would_be_value > self.limits.max_position_value {
            return RiskCheckResult::PositionValueExceeded;
        }

        if self.daily_pnl < -self.limits.max_daily_loss {
            return RiskCheckResult::DailyLossExceeded;
        }

        if self.peak_equity - self.current_equity > self.limits.max_drawdown {
            return RiskCheckResult::DrawdownExceeded;
        }

        if self.limits.max_orders_per_second > 0 {
            let now = order.timestamp();
            let window_start = now.saturating_sub(NANOS_PER_SECOND);
            while self
                .submissions
                .front()
                .is_some_and(|&ts| ts < window_start)
            {
                self.submissions.pop_front();
            }
            if self.submissions.len() >= self.limits.max_orders_per_second as usize {
                return RiskCheckResult::RateLimited;
            }
            self.submissions.push_back(now);
        }

        RiskCheckResult::Accepted
    }

    /// Apply an executed trade to the position book.
    ///
    /// The trade's direction for position tracking comes from
    /// `aggressor_side`: Buy means this book is buying the trade, Sell
    /// means selling. Realized P&L accrues only on the closing slice.
    pub fn update_position(&mut self, trade: &Trade, aggressor_side: Side) {
        let position = self
            .positions
            .entry(trade.symbol().clone())
            .or_insert_with(|| Position::new(trade.symbol().clone()));

        let price = trade.price().as_decimal();
        let qty = trade.quantity().value() as i64;

        match aggressor_side {
            Side::Buy => {
                position.total_bought += trade.quantity();

                if position.quantity >= 0 {
                    // Opening or adding to a long.
                    let denom = Decimal::from(position.quantity + qty);
                    position.average_price = (Decimal::from(position.quantity)
                        * position.average_price
                        + Decimal::from(qty) * price)
                        / denom;
                    position.quantity += qty;
                } else {
                    // Covering a short.
                    let close = qty.min(-position.quantity);
                    let pnl = Decimal::from(close) * (position.average_price - price);
                    position.realized_pnl += pnl;
                    self.daily_pnl += pnl;

                    position.quantity += qty;
                    if position.quantity > 0 {
                        // Flipped long; the excess opens at the trade price.
                        position.average_price = price;
                    }
                }
            }
            Side::Sell => {
                position.total_sold += trade.quantity();

                if position.quantity <= 0 {
                    // Opening or adding to a short.
                    let denom = Decimal::from(-position.quantity + qty);
                    position.average_price = (Decimal::from(-position.quantity)
                        * position.average_price
                        + Decimal::from(qty) * price)
                        / denom;
                    position.quantity -= qty;
                } else {
                    // Closing a long.
                    let close = qty.min(position.quantity);
                    let pnl = Decimal::from(close) * (price - position.average_price);
                    position.realized_pnl += pnl;
                    self.daily_pnl += pnl;

                    position.quantity -= qty;
                    if position.quantity < 0 {
                        position.average_price = price;
                    }
                }
            }
        }

        debug!(
            symbol = %trade.symbol(),
            quantity = self.positions[trade.symbol()].quantity,
            "position updated"
        );
        self.refresh_equity();
    }

    /// Re-mark one symbol's unrealized P&L against a new price.
    pub fn update_unrealized(&mut self, symbol: &Symbol, mark: Price) {
        if let Some(position) = self.positions.get_mut(symbol) {
            position.update_unrealized(mark);
        }
        self.refresh_equity();
    }

    pub fn position(&self, symbol: &Symbol) -> Option<&Position> {
        self.positions.get(symbol)
    }

    pub fn positions(&self) -> impl Iterator<Item = &Position> {
        self.positions.values()
    }

    pub fn daily_pnl(&self) -> Decimal {
        self.daily_pnl
    }

    /// Daily P&L plus unrealized P&L over every position.
    pub fn total_pnl(&self) -> Decimal {
        self.daily_pnl + self.positions.values().map(|p| p.unrealized_pnl).sum::<Decimal>()
    }

    pub fn current_drawdown(&self) -> Decimal {
        self.peak_equity - self.current_equity
    }

    pub fn limits(&self) -> &RiskLimits {
        &self.limits
    }

    pub fn set_limits(&mut self, limits: RiskLimits) {
        self.limits = limits;
    }

    /// Zero the daily P&L and every position's realized P&L.
    /// Quantities and average prices are untouched.
    pub fn reset_daily(&mut self) {
        self.daily_pnl = Decimal::ZERO;
        for position in self.positions.values_mut() {
            position.realized_pnl = Decimal::ZERO;
        }
    }

    fn refresh_equity(&mut self) {
        let unrealized: Decimal = self.positions.values().map(|p| p.unrealized_pnl).sum();
        self.current_equity = self.daily_pnl + unrealized;
        if self.current_equity > self.peak_equity {
            self.peak_equity = self.current_equity;
        }
    }
}

impl Default for RiskManager {
    fn default() -> Self {
        Self::new(RiskLimits::default())
    }
}
