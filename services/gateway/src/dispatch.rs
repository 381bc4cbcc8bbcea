//! Command dispatch
//!
//! The glue between ingress and the engine core, running entirely on
//! the engine thread: commands pass the pre-trade risk gate, execute on
//! the matching engine, and the resulting trades and order updates are
//! lowered into execution reports, position updates, the trade log, and
//! the gateway counters.

use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use market_data::TradeLog;
use matching_engine::{EngineObserver, MatchingEngine};
use risk_engine::{RiskLimits, RiskManager};
use types::{Clock, MonotonicClock, Order, OrderId, OrderStatus, Price, Quantity, Side, Symbol, Trade};

use crate::commands::{to_command, EngineCommand};
use crate::fix::{exec_type, FixMessage};
use crate::metrics::GatewayMetrics;
use crate::queue::CommandQueue;

/// Buffered engine callback, drained after every command.
enum EngineEvent {
    Trade(Trade),
    OrderUpdate(Order),
}

/// Observer that records engine events without re-entering the engine.
struct BufferObserver {
    events: Rc<RefCell<Vec<EngineEvent>>>,
}

impl EngineObserver for BufferObserver {
    fn on_trade(&mut self, trade: &Trade) {
        self.events
            .borrow_mut()
            .push(EngineEvent::Trade(trade.clone()));
    }

    fn on_order_update(&mut self, order: &Order) {
        self.events
            .borrow_mut()
            .push(EngineEvent::OrderUpdate(order.clone()));
    }
}

/// Serially-owned orchestrator: risk gate, engine, outbound sinks.
pub struct Dispatcher {
    engine: MatchingEngine,
    risk: RiskManager,
    metrics: Arc<GatewayMetrics>,
    events: Rc<RefCell<Vec<EngineEvent>>>,
    clock: Box<dyn Clock>,
    trade_log: Option<TradeLog<Box<dyn Write>>>,
    /// Reference price for market-order risk checks.
    last_trade_price: Option<Price>,
}

impl Dispatcher {
    pub fn new(symbol: Symbol, limits: RiskLimits) -> Self {
        Self::with_clock(symbol, limits, Box::new(MonotonicClock::new()))
    }

    pub fn with_clock(symbol: Symbol, limits: RiskLimits, clock: Box<dyn Clock>) -> Self {
        let events = Rc::new(RefCell::new(Vec::new()));
        let mut engine = MatchingEngine::new(symbol);
        engine.add_observer(Box::new(BufferObserver {
            events: Rc::clone(&events),
        }));

        Self {
            engine,
            risk: RiskManager::new(limits),
            metrics: Arc::new(GatewayMetrics::new()),
            events,
            clock,
            trade_log: None,
            last_trade_price: None,
        }
    }

    /// Attach a CSV sink for executed trades.
    pub fn set_trade_log(&mut self, writer: Box<dyn Write>) {
        self.trade_log = Some(TradeLog::new(writer));
    }

    pub fn engine(&self) -> &MatchingEngine {
        &self.engine
    }

    pub fn risk(&self) -> &RiskManager {
        &self.risk
    }

    pub fn metrics(&self) -> Arc<GatewayMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Parse and execute one raw wire message.
    pub fn handle_raw(&mut self, raw: &[u8]) -> Vec<FixMessage> {
        self.handle_message(&FixMessage::parse(raw))
    }

    /// Execute one parsed message, returning the execution reports it
    /// produced. Session-level messages produce nothing; malformed
    /// order messages are dropped with a warning and no mutation.
    pub fn handle_message(&mut self, msg: &FixMessage) -> Vec<FixMessage> {
        match to_command(msg, self.clock.now()) {
            Ok(Some(command)) => self.handle_command(command),
            Ok(None) => Vec::new(),
            Err(err) => {
                warn!(%err, "dropping malformed order message");
                self.metrics.record_order_rejected();
                Vec::new()
            }
        }
    }

    /// Execute one engine command.
    pub fn handle_command(&mut self, command: EngineCommand) -> Vec<FixMessage> {
        match command {
            EngineCommand::Submit(order) => self.submit(order),
            EngineCommand::Cancel { order_id } => self.cancel(order_id),
            EngineCommand::Modify {
                order_id,
                price,
                quantity,
            } => self.modify(order_id, price, quantity),
        }
    }

    /// Drain the ingress queue. This pop order is the serialization
    /// point across producers.
    pub fn drain_queue(&mut self, queue: &CommandQueue) -> Vec<FixMessage> {
        let mut reports = Vec::new();
        while let Some(command) = queue.pop() {
            reports.extend(self.handle_command(command));
        }
        reports
    }

    fn submit(&mut self, order: Order) -> Vec<FixMessage> {
        self.metrics.record_order_received();

        let reference = self.last_trade_price.unwrap_or(Price::ZERO);
        let verdict = self.risk.validate(&order, reference);
        if !verdict.is_accepted() {
            self.metrics.record_order_rejected();
            warn!(order_id = order.id().value(), %verdict, "order rejected pre-trade");

            let mut rejected = order;
            rejected.reject();
            self.metrics.record_reports(1);
            return vec![FixMessage::execution_report(
                &rejected,
                &next_exec_id(),
                exec_type::REJECTED,
                None,
            )];
        }

        self.metrics.record_order_accepted();
        let aggressor = order.side();
        self.engine.submit(order);
        self.collect_reports(Some(aggressor))
    }

    fn cancel(&mut self, order_id: OrderId) -> Vec<FixMessage> {
        if self.engine.cancel(order_id) {
            info!(order_id = order_id.value(), "order cancelled");
            self.collect_reports(None)
        } else {
            warn!(order_id = order_id.value(), "cancel for unknown order");
            Vec::new()
        }
    }

    fn modify(&mut self, order_id: OrderId, price: Price, quantity: Quantity) -> Vec<FixMessage> {
        if !self.engine.modify(order_id, price, quantity) {
            warn!(order_id = order_id.value(), "modify for unknown order");
            return Vec::new();
        }

        // The engine reports the cancellation of the original and then
        // the replacement's submit events. A modify preserves the side,
        // so the first update with this id (the cancelled original)
        // already carries the aggressor side for any resulting trades.
        let aggressor = self
            .events
            .borrow()
            .iter()
            .find_map(|event| match event {
                EngineEvent::OrderUpdate(order) if order.id() == order_id => Some(order.side()),
                _ => None,
            })
            .expect("engine emitted no update for modified order");
        self.collect_reports(Some(aggressor))
    }

    /// Drain buffered engine events into risk updates, the trade log,
    /// counters, and execution reports.
    fn collect_reports(&mut self, aggressor: Option<Side>) -> Vec<FixMessage> {
        let mut trades = Vec::new();
        let mut updates = Vec::new();
        for event in self.events.borrow_mut().drain(..) {
            match event {
                EngineEvent::Trade(trade) => trades.push(trade),
                EngineEvent::OrderUpdate(order) => updates.push(order),
            }
        }

        if let Some(aggressor) = aggressor {
            for trade in &trades {
                self.risk.update_position(trade, aggressor);
                self.metrics.record_trade();
                self.last_trade_price = Some(trade.price());
                if let Some(log) = self.trade_log.as_mut() {
                    log.log_best_effort(trade);
                }
            }
            if let Some(last) = trades.last() {
                let symbol = last.symbol().clone();
                self.risk.update_unrealized(&symbol, last.price());
            }
        } else {
            debug_assert!(trades.is_empty(), "trades emitted without an aggressor");
        }

        let reports: Vec<FixMessage> = updates
            .iter()
            .map(|order| {
                let last_fill = trades
                    .iter()
                    .rev()
                    .find(|t| t.involves_order(order.id()))
                    .map(|t| (t.quantity(), t.price()));
                let code = match order.status() {
                    OrderStatus::Filled => exec_type::FILL,
                    OrderStatus::PartiallyFilled => exec_type::PARTIAL_FILL,
                    OrderStatus::New => exec_type::NEW,
                    OrderStatus::Cancelled => exec_type::CANCELED,
                    OrderStatus::Rejected => exec_type::REJECTED,
                };
                FixMessage::execution_report(order, &next_exec_id(), code, last_fill)
            })
            .collect();

        self.metrics.record_reports(reports.len() as u64);
        reports
    }
}

fn next_exec_id() -> String {
    Uuid::new_v4().to_string()
}
