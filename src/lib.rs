//! limq: bounded asynchronous producer/consumer queue.
//!
//! The queue itself lives in `limq-core`; this package re-exports it and
//! hosts the workspace-level integration tests.

pub use limq_core::*;
