//! Benchmark scenarios.

use limq_core::BoundedQueue;

/// One iteration of the "N push/pull on queue size C" scenario.
///
/// Issues `items` produce calls without awaiting them, so everything past
/// the first `capacity` items parks as pending producers, then drains the
/// queue with `items` awaited consume calls. Items must come back in order.
pub async fn push_pull_round(items: usize, capacity: usize) -> limq_core::Result<()> {
    let q = BoundedQueue::new(capacity)?;
    let pushes: Vec<_> = (0..items).map(|i| q.produce(i)).collect();

    for expected in 0..items {
        let got = q.consume().await?;
        debug_assert_eq!(got, expected, "queue delivered items out of order");
    }
    for push in pushes {
        push.await?;
    }
    Ok(())
}
