#![forbid(unsafe_code)]
//! limq-bench: push/pull throughput harness for `limq_core::BoundedQueue`.
//!
//! The harness runs a scenario repeatedly for a fixed wall-clock period,
//! growing the number of back-to-back iterations per chunk until a chunk
//! takes a noticeable share of the period, and reports the iteration rate.

pub mod harness;
pub mod scenario;

use thiserror::Error;

pub use harness::{bench, bench_impl, BenchResult};
pub use scenario::push_pull_round;

pub type Result<T> = std::result::Result<T, BenchError>;

#[derive(Debug, Error)]
pub enum BenchError {
    #[error("queue error: {0}")]
    Queue(#[from] limq_core::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("runtime error: {0}")]
    Runtime(#[from] std::io::Error),
}
