//! Dashboard message shapes
//!
//! One JSON object per broadcast, pretty-printed, with prices on the
//! 0.01 grid. Optional best-price fields are omitted entirely when the
//! corresponding side of the book is empty.

use matching_engine::OrderBook;
use serde::Serialize;
use types::{OrderId, Price, Quantity, Symbol, Timestamp, Trade};

/// Levels included per side in a snapshot broadcast.
const SNAPSHOT_DEPTH: usize = 10;

/// One price level in a snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct BookLevelMsg {
    pub price: Price,
    pub quantity: Quantity,
    pub orders: usize,
}

/// `orderbook_snapshot` broadcast.
#[derive(Debug, Clone, Serialize)]
pub struct OrderBookSnapshotMsg {
    #[serde(rename = "type")]
    pub msg_type: &'static str,
    pub timestamp: Timestamp,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_bid: Option<Price>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_ask: Option<Price>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spread: Option<Price>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mid_price: Option<f64>,
    pub bids: Vec<BookLevelMsg>,
    pub asks: Vec<BookLevelMsg>,
}

/// `trade` broadcast.
#[derive(Debug, Clone, Serialize)]
pub struct TradeMsg {
    #[serde(rename = "type")]
    pub msg_type: &'static str,
    pub timestamp: Timestamp,
    pub symbol: Symbol,
    pub buy_order_id: OrderId,
    pub sell_order_id: OrderId,
    pub price: Price,
    pub quantity: Quantity,
    pub value: f64,
}

/// `statistics` broadcast.
#[derive(Debug, Clone, Serialize)]
pub struct StatisticsMsg {
    #[serde(rename = "type")]
    pub msg_type: &'static str,
    pub timestamp: Timestamp,
    pub total_orders: usize,
    pub bid_levels: usize,
    pub ask_levels: usize,
    pub total_bid_quantity: Quantity,
    pub total_ask_quantity: Quantity,
}

/// Build an order book snapshot, up to 10 levels per side.
pub fn orderbook_snapshot(book: &OrderBook, timestamp: Timestamp) -> OrderBookSnapshotMsg {
    let to_msg = |levels: Vec<matching_engine::DepthLevel>| -> Vec<BookLevelMsg> {
        levels
            .into_iter()
            .map(|l| BookLevelMsg {
                price: l.price,
                quantity: l.quantity,
                orders: l.orders,
            })
            .collect()
    };

    OrderBookSnapshotMsg {
        msg_type: "orderbook_snapshot",
        timestamp,
        best_bid: book.best_bid(),
        best_ask: book.best_ask(),
        spread: book.spread(),
        mid_price: book.mid_price(),
        bids: to_msg(book.depth(types::Side::Buy, SNAPSHOT_DEPTH)),
        asks: to_msg(book.depth(types::Side::Sell, SNAPSHOT_DEPTH)),
    }
}

/// Build a trade broadcast.
pub fn trade_message(trade: &Trade) -> TradeMsg {
    TradeMsg {
        msg_type: "trade",
        timestamp: trade.timestamp(),
        symbol: trade.symbol().clone(),
        buy_order_id: trade.buy_order_id(),
        sell_order_id: trade.sell_order_id(),
        price: trade.price(),
        quantity: trade.quantity(),
        value: trade.price().to_f64() * trade.quantity().value() as f64,
    }
}

/// Build a statistics broadcast from current book aggregates.
pub fn statistics(book: &OrderBook, timestamp: Timestamp) -> StatisticsMsg {
    let stats = book.stats();
    StatisticsMsg {
        msg_type: "statistics",
        timestamp,
        total_orders: stats.total_orders,
        bid_levels: stats.bid_levels,
        ask_levels: stats.ask_levels,
        total_bid_quantity: stats.total_bid_quantity,
        total_ask_quantity: stats.total_ask_quantity,
    }
}

/// Pretty-print any broadcast message as its wire JSON.
pub fn to_json<T: Serialize>(message: &T) -> serde_json::Result<String> {
    serde_json::to_string_pretty(message)
}
