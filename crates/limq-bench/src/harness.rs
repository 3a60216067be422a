//! Timed benchmark loop.

use std::future::Future;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Outcome of one timed run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BenchResult {
    /// Iterations per second.
    pub rate: f64,
    /// Iterations completed.
    pub count: u64,
    /// Measured wall-clock time in milliseconds.
    pub time: f64,
}

/// Warms `func` up for `warmup`, then measures it for `time`.
pub async fn bench<F, Fut, E>(
    name: &str,
    time: Duration,
    warmup: Duration,
    mut func: F,
) -> Result<BenchResult, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<(), E>>,
{
    info!("{}: warming up...", name);
    bench_impl(&mut func, warmup).await?;
    info!("{}: running bench...", name);
    let result = bench_impl(&mut func, time).await?;
    info!(rate = result.rate, count = result.count, time_ms = result.time, "{}: done", name);
    Ok(result)
}

/// Runs `func` in chunks until `time` has elapsed.
///
/// The chunk size starts at 1 and doubles after every chunk that finishes
/// in under 1/16 of `time`; the deadline is only checked between chunks.
pub async fn bench_impl<F, Fut, E>(func: &mut F, time: Duration) -> Result<BenchResult, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<(), E>>,
{
    let mut counter: u64 = 0;
    let mut chunk_size: u64 = 1;
    let bench_start = Instant::now();
    let deadline = bench_start + time;
    let grow_below = time / 16;

    loop {
        let start = Instant::now();
        if start > deadline {
            break;
        }
        for _ in 0..chunk_size {
            counter += 1;
            func().await?;
        }
        if start.elapsed() < grow_below {
            chunk_size *= 2;
            debug!(chunk_size, "growing chunk");
        }
    }

    let elapsed = bench_start.elapsed();
    let time_ms = elapsed.as_secs_f64() * 1000.0;
    let rate = if time_ms > 0.0 {
        1000.0 * counter as f64 / time_ms
    } else {
        0.0
    };
    Ok(BenchResult {
        rate,
        count: counter,
        time: time_ms,
    })
}
