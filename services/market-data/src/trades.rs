//! Trade CSV log
//!
//! One line per executed trade:
//! `timestamp,buyOrderId,sellOrderId,symbol,price,quantity,value`

use std::io::{self, Write};
use tracing::error;
use types::Trade;

/// Appends executed trades to any writable sink.
pub struct TradeLog<W: Write> {
    writer: W,
}

impl<W: Write> TradeLog<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Write one trade line. Failures are reported to the caller; the
    /// log never buffers internally.
    pub fn log(&mut self, trade: &Trade) -> io::Result<()> {
        writeln!(self.writer, "{}", trade.to_csv())
    }

    /// Log a trade, swallowing and reporting write failures.
    ///
    /// Used on the hot path where a broken log sink must not stall the
    /// engine.
    pub fn log_best_effort(&mut self, trade: &Trade) {
        if let Err(err) = self.log(trade) {
            error!(%err, "trade log write failed");
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}
