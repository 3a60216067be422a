use thiserror::Error;

use crate::close::CloseReason;

/// Canonical result for the queue.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The queue was closed before or while the operation was pending.
    /// Terminal for the queue instance: it never reopens.
    #[error("queue is closed{}", reason_suffix(.reason))]
    Closed { reason: Option<CloseReason> },

    #[error("invalid capacity {0}: a queue must hold at least one item")]
    InvalidCapacity(usize),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

fn reason_suffix(reason: &Option<CloseReason>) -> String {
    match reason {
        Some(r) => format!(": {}", r),
        None => String::new(),
    }
}

impl Error {
    pub(crate) fn closed(reason: Option<CloseReason>) -> Self {
        Error::Closed { reason }
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, Error::Closed { .. })
    }

    /// Reason recorded by `close`, if the error is a close failure that carried one.
    pub fn close_reason(&self) -> Option<&CloseReason> {
        match self {
            Error::Closed { reason } => reason.as_ref(),
            _ => None,
        }
    }

    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        let ctx = context.into();
        match self {
            Error::Config(msg) => Error::Config(format!("{}: {}", ctx, msg)),
            Error::InvalidCapacity(cap) => {
                Error::Config(format!("{}: invalid capacity {}", ctx, cap))
            }
            // Closed keeps its reason untouched so callers can still match on it.
            other => other,
        }
    }

    /// Get suggestions for common errors.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Error::Closed { .. } => vec![
                "A closed queue never reopens; construct a new queue".into(),
                "Close with allow_drain to keep buffered items consumable".into(),
            ],
            Error::InvalidCapacity(_) => vec!["Use a capacity of at least 1".into()],
            Error::Config(msg) => {
                if msg.to_ascii_lowercase().contains("capacity") {
                    vec![
                        "Check that LIMQ_CAPACITY is a positive integer".into(),
                        "Unset LIMQ_CAPACITY to fall back to capacity 1".into(),
                    ]
                } else {
                    vec![]
                }
            }
        }
    }
}
