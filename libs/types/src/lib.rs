//! Shared domain types for the trading engine
//!
//! Scalar newtypes, the order and trade lifecycle, and the monotonic
//! clock abstraction used by every service crate.

pub mod clock;
pub mod ids;
pub mod numeric;
pub mod order;
pub mod trade;

pub use clock::{Clock, ManualClock, MonotonicClock, Timestamp};
pub use ids::{OrderId, Symbol};
pub use numeric::{Price, Quantity};
pub use order::{Order, OrderStatus, OrderType, Side};
pub use trade::Trade;
