#![forbid(unsafe_code)]
//! limq-core: a bounded, asynchronous producer/consumer queue.
//!
//! Any number of producers and consumers exchange items through a
//! fixed-capacity buffer. Producers suspend while the buffer is full,
//! consumers suspend while it is empty, and a single `close` terminates
//! every outstanding and future operation deterministically.
//!
//! Modules:
//! - `queue`: the `BoundedQueue` state machine and its `Produce`/`Consume` futures.
//! - `close`: the immutable `CloseOptions` value handed to `close`.
//! - `config`: serde-backed `QueueConfig` with environment overrides.
//! - `error`: the crate `Error` and `Result` types.
//!
//! The core never spawns tasks or owns a runtime; it only needs a oneshot
//! channel to park and wake callers, so it runs on any executor.

mod buffer;
mod trace;
mod waiter;

pub mod close;
pub mod config;
pub mod error;
pub mod prelude;
pub mod queue;

pub use close::{CloseOptions, CloseReason};
pub use config::QueueConfig;
pub use error::{Error, Result};
pub use queue::{BoundedQueue, Consume, Produce, QueueStats};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
