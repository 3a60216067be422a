//! Close configuration: the reason recorded at close time and whether
//! already-buffered items may still be consumed afterwards.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Application-supplied explanation attached to every `Error::Closed`
/// produced after a queue is closed. Cheap to clone; all failed waiters
/// share the same allocation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CloseReason(Arc<str>);

impl CloseReason {
    pub fn new(reason: impl Into<Arc<str>>) -> Self {
        Self(reason.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CloseReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CloseReason {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for CloseReason {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// Options for [`BoundedQueue::close`](crate::queue::BoundedQueue::close).
///
/// The default closes without a reason and discards buffered items.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloseOptions {
    /// Reason attached to every failure caused by the close.
    #[serde(default)]
    pub reason: Option<CloseReason>,
    /// When true, items already in the buffer stay consumable in order.
    #[serde(default)]
    pub allow_drain: bool,
}

impl CloseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Close but keep buffered items available to consumers.
    pub fn drain() -> Self {
        Self {
            reason: None,
            allow_drain: true,
        }
    }

    pub fn with_reason(mut self, reason: impl Into<CloseReason>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    pub fn allow_drain(mut self, allow: bool) -> Self {
        self.allow_drain = allow;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reason_serializes_as_plain_string() {
        let opts = CloseOptions::drain().with_reason("maintenance");
        let json = serde_json::to_value(&opts).unwrap();
        assert_eq!(json["reason"], "maintenance");
        assert_eq!(json["allow_drain"], true);

        let back: CloseOptions = serde_json::from_value(json).unwrap();
        assert_eq!(back.reason.as_ref().map(CloseReason::as_str), Some("maintenance"));
    }

    #[test]
    fn missing_fields_mean_discarding_close() {
        let opts: CloseOptions = serde_json::from_str(r#"{"reason": null}"#).unwrap();
        assert_eq!(opts, CloseOptions::new());
        assert!(!opts.allow_drain);
    }
}
