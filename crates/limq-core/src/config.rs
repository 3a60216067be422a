//! Queue configuration with environment overrides.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Capacity used when nothing else is configured.
pub const DEFAULT_CAPACITY: usize = 1;

/// Environment variable overriding [`QueueConfig::capacity`].
pub const CAPACITY_ENV: &str = "LIMQ_CAPACITY";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueConfig {
    /// Maximum number of buffered items; must be at least 1.
    pub capacity: usize,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
        }
    }
}

impl QueueConfig {
    pub fn with_capacity(capacity: usize) -> Self {
        Self { capacity }
    }

    /// Defaults overridden by `LIMQ_CAPACITY` when it is set.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) but reads variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut cfg = Self::default();
        if let Some(raw) = lookup(CAPACITY_ENV) {
            cfg.capacity = raw.trim().parse().map_err(|_| {
                Error::Config(format!("{} must be a positive integer, got '{}'", CAPACITY_ENV, raw))
            })?;
        }
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(Error::Config("capacity must be at least 1".into()));
        }
        Ok(())
    }
}
