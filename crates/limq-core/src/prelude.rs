//! Convenience re-exports for callers driving a queue.

pub use crate::close::{CloseOptions, CloseReason};
pub use crate::config::QueueConfig;
pub use crate::error::{Error, Result};
pub use crate::queue::{BoundedQueue, QueueStats};
