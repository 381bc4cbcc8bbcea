//! Key/value configuration
//!
//! Line-oriented `key=value` files with `#` comments and whitespace
//! trimmed around both key and value. Unknown keys are retained but
//! ignored by the core; later duplicates overwrite earlier ones.

use rust_decimal::Decimal;
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;
use tracing::warn;
use types::Quantity;

use crate::error::ConfigError;
use risk_engine::RiskLimits;

/// Read-once configuration map.
#[derive(Debug, Clone, Default)]
pub struct Config {
    values: HashMap<String, String>,
}

impl Config {
    /// Load from a file. A missing or unreadable file is a startup
    /// failure.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::parse(&contents))
    }

    /// Parse file contents. Bad lines are skipped with a warning;
    /// parsing itself never fails.
    pub fn parse(contents: &str) -> Self {
        let mut values = HashMap::new();

        for (line_no, line) in contents.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            match line.split_once('=') {
                Some((key, value)) => {
                    values.insert(key.trim().to_string(), value.trim().to_string());
                }
                None => warn!(line = line_no + 1, "invalid config line"),
            }
        }

        Self { values }
    }

    pub fn has(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn get_string(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or(default).to_string()
    }

    pub fn get_u64(&self, key: &str, default: u64) -> u64 {
        self.get(key)
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    pub fn get_u16(&self, key: &str, default: u16) -> u16 {
        self.get(key)
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    pub fn get_decimal(&self, key: &str, default: Decimal) -> Decimal {
        self.get(key)
            .and_then(|v| Decimal::from_str(v).ok())
            .unwrap_or(default)
    }

    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        match self.get(key) {
            Some(value) => matches!(
                value.to_ascii_lowercase().as_str(),
                "true" | "1" | "yes" | "on"
            ),
            None => default,
        }
    }

    /// Risk limits with `risk.*` overrides applied over the defaults.
    pub fn risk_limits(&self) -> RiskLimits {
        let defaults = RiskLimits::default();
        RiskLimits {
            max_order_size: Quantity::new(
                self.get_u64("risk.max_order_size", defaults.max_order_size.value()),
            ),
            max_position_size: self
                .get("risk.max_position_size")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_position_size),
            max_daily_loss: self.get_decimal("risk.max_daily_loss", defaults.max_daily_loss),
            ..defaults
        }
    }
}
