//! Gateway counters
//!
//! Simple atomic counters owned by the orchestrator. Updated from the
//! engine thread, readable from anywhere with relaxed loads.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Order-flow counters for the gateway.
#[derive(Debug, Default)]
pub struct GatewayMetrics {
    pub orders_received: AtomicU64,
    pub orders_accepted: AtomicU64,
    pub orders_rejected: AtomicU64,
    pub trades_executed: AtomicU64,
    pub reports_emitted: AtomicU64,
}

impl GatewayMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_order_received(&self) {
        self.orders_received.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_order_accepted(&self) {
        self.orders_accepted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_order_rejected(&self) {
        self.orders_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_trade(&self) {
        self.trades_executed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_reports(&self, count: u64) {
        self.reports_emitted.fetch_add(count, Ordering::Relaxed);
    }

    /// Export as name → value for exposition.
    pub fn export(&self) -> BTreeMap<String, u64> {
        let mut map = BTreeMap::new();
        map.insert(
            "orders_received".to_string(),
            self.orders_received.load(Ordering::Relaxed),
        );
        map.insert(
            "orders_accepted".to_string(),
            self.orders_accepted.load(Ordering::Relaxed),
        );
        map.insert(
            "orders_rejected".to_string(),
            self.orders_rejected.load(Ordering::Relaxed),
        );
        map.insert(
            "trades_executed".to_string(),
            self.trades_executed.load(Ordering::Relaxed),
        );
        map.insert(
            "reports_emitted".to_string(),
            self.reports_emitted.load(Ordering::Relaxed),
        );
        map
    }
}
