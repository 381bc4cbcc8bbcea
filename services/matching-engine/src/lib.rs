//! Matching engine
//!
//! Single-symbol continuous limit order book with strict price-time
//! priority. The whole crate is single-threaded by contract: every
//! mutation happens on one logical executor, and nothing in the matching
//! path suspends.
//!
//! **Key invariants:**
//! - Price-time priority strictly enforced
//! - Deterministic matching (same inputs → same trade sequence)
//! - Conservation of quantity across every submit
//! - The book never rests a crossed market

pub mod book;
pub mod engine;
pub mod events;
pub mod matching;

pub use book::{BookStats, DepthLevel, OrderBook};
pub use engine::{EngineStats, MatchingEngine, StatsSnapshot};
pub use events::EngineObserver;
