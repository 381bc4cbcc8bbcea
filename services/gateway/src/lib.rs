//! Order entry gateway
//!
//! The ingress edge of the engine: a FIX-style wire codec, the
//! single-consumer command queue that serializes producers onto the
//! engine thread, the dispatcher that threads commands through the risk
//! gate and the matching engine, and the key/value configuration layer.

pub mod commands;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod fix;
pub mod metrics;
pub mod queue;

pub use commands::EngineCommand;
pub use config::Config;
pub use dispatch::Dispatcher;
pub use error::{CodecError, ConfigError};
pub use fix::FixMessage;
pub use metrics::GatewayMetrics;
pub use queue::CommandQueue;
