//! Market data projection
//!
//! Lowers engine state into the outbound dashboard shapes: order book
//! snapshots, trade broadcasts, and book statistics as JSON, a CSV trade
//! log, and the WebSocket handshake/framing helpers the dashboard
//! transport needs. Listeners themselves live outside this crate; it
//! deals only in bytes and strings.

pub mod snapshot;
pub mod trades;
pub mod websocket;

pub use snapshot::{orderbook_snapshot, statistics, trade_message};
pub use trades::TradeLog;
