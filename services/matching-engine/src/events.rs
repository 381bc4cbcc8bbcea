//! Engine observer interface
//!
//! Observers fire synchronously on the engine thread during `submit`,
//! `cancel`, and `modify`. They are part of the matching critical path:
//! they must not block, and they must not re-enter the engine — anything
//! that needs another engine operation enqueues a new command instead.

use types::{Order, Trade};

/// Callbacks invoked by the matching engine.
///
/// For one submit call the engine delivers every emitted trade in
/// emission order, then one update for the incoming order, then one
/// update per resting order mutated by the match.
pub trait EngineObserver {
    /// A trade was executed.
    fn on_trade(&mut self, _trade: &Trade) {}

    /// An order changed state (fill, cancel, reject, or market residual).
    fn on_order_update(&mut self, _order: &Order) {}
}
