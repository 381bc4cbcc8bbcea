//! Gateway binary
//!
//! Loads configuration, initializes logging, and drives the dispatcher
//! from a byte stream: FIX messages in on stdin (one per line, `|`
//! accepted in place of SOH), execution reports out on stdout. Network
//! listeners live outside this process boundary.
//!
//! Exit codes: 0 on clean shutdown, 1 on startup failure.

use std::fs::File;
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use gateway::{Config, Dispatcher, FixMessage};
use types::Symbol;

fn main() {
    std::process::exit(run());
}

fn run() -> i32 {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "trading.conf".to_string());

    let config = match Config::load(&config_path) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("startup failure: {err}");
            return 1;
        }
    };

    if let Err(err) = init_logging(&config) {
        eprintln!("startup failure: {err}");
        return 1;
    }

    let symbol = Symbol::new(config.get_string("server.symbol", "AAPL"));
    let limits = config.risk_limits();
    info!(%symbol, "gateway starting");

    let mut dispatcher = Dispatcher::new(symbol, limits);
    if let Some(path) = config.get("logging.trade_file") {
        match File::create(path) {
            Ok(file) => dispatcher.set_trade_log(Box::new(file)),
            Err(err) => {
                eprintln!("startup failure: cannot open trade log {path}: {err}");
                return 1;
            }
        }
    }

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                error!(%err, "stdin read failed");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        // Accept '|' as a human-typable stand-in for SOH.
        let raw: Vec<u8> = line
            .bytes()
            .map(|b| if b == b'|' { gateway::fix::SOH } else { b })
            .collect();

        for report in dispatcher.handle_raw(&raw) {
            if write_report(&mut stdout, &report).is_err() {
                error!("stdout write failed");
                return 0;
            }
        }
    }

    let stats = dispatcher.engine().stats();
    info!(
        trades = stats.total_trades,
        volume = stats.total_volume,
        "gateway shutting down"
    );
    0
}

fn write_report(out: &mut impl Write, report: &FixMessage) -> io::Result<()> {
    let printable: String = report
        .serialize()
        .iter()
        .map(|&b| if b == gateway::fix::SOH { '|' } else { b as char })
        .collect();
    writeln!(out, "{printable}")
}

fn init_logging(config: &Config) -> io::Result<()> {
    let level = config.get_string("logging.level", "INFO").to_lowercase();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    match config.get("logging.file") {
        Some(path) => {
            let file = File::create(path)?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(Arc::new(file))
                .with_ansi(false)
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(io::stderr)
                .init();
        }
    }
    Ok(())
}
