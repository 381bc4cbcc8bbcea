//! Gateway error types
//!
//! Malformed input is a value, not a panic: the codec reports what was
//! missing or unparseable and the engine state is untouched.

use std::path::PathBuf;
use thiserror::Error;

/// Wire codec failures when lifting a message into an engine command.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    #[error("missing required tag {0}")]
    MissingTag(u32),

    #[error("invalid value for tag {tag}: {value:?}")]
    InvalidValue { tag: u32, value: String },
}

impl CodecError {
    pub fn invalid(tag: u32, value: impl Into<String>) -> Self {
        Self::InvalidValue {
            tag,
            value: value.into(),
        }
    }
}

/// Configuration loading failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
