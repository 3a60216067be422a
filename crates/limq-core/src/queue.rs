//! Bounded queue: matches producers with consumers through a fixed-capacity
//! buffer.
//!
//! State machine summary:
//! - `produce` hands its item to the oldest waiting consumer, else appends it
//!   to the buffer, else parks as a pending producer carrying the item.
//! - `consume` takes the buffer head and, in the same step, admits the oldest
//!   pending producer into the slot it freed; with an empty buffer it parks.
//! - `close` fails every parked caller once and fixes the fate of buffered
//!   items according to `CloseOptions::allow_drain`.
//!
//! Every operation performs its "check, mutate, maybe park" step under one
//! lock, so the queue is safe to share across threads even though callers
//! usually drive it from a single cooperative task set.
//!
//! Slot hand-over to a parked producer happens atomically at wake time: the
//! producer's item lands in the buffer before the consume that freed the slot
//! returns, so a produce arriving later can never overtake it.

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::task::{Context, Poll};

use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

use crate::buffer::Buffer;
use crate::close::{CloseOptions, CloseReason};
use crate::config::{QueueConfig, DEFAULT_CAPACITY};
use crate::error::{Error, Result};
use crate::trace::{debug, trace};
use crate::waiter::{ConsumerWaiter, ProducerWaiter};

struct State<T> {
    buffer: Buffer<T>,
    consumers: VecDeque<ConsumerWaiter<T>>,
    producers: VecDeque<ProducerWaiter<T>>,
    closed: bool,
    close_reason: Option<CloseReason>,
    // List lengths at which the next park sweeps out abandoned waiters.
    producers_prune_at: usize,
    consumers_prune_at: usize,
}

impl<T> State<T> {
    fn closed_error(&self) -> Error {
        Error::closed(self.close_reason.clone())
    }

    fn park_producer(&mut self, waiter: ProducerWaiter<T>) {
        if self.producers.len() >= self.producers_prune_at {
            self.producers.retain(|w| !w.is_abandoned());
            self.producers_prune_at = next_prune_at(self.producers.len());
        }
        self.producers.push_back(waiter);
    }

    fn park_consumer(&mut self, waiter: ConsumerWaiter<T>) {
        if self.consumers.len() >= self.consumers_prune_at {
            self.consumers.retain(|w| !w.is_abandoned());
            self.consumers_prune_at = next_prune_at(self.consumers.len());
        }
        self.consumers.push_back(waiter);
    }
}

/// Smallest waiter list that triggers a sweep on park.
const PRUNE_FLOOR: usize = 16;

// Sweeping again only once the list doubles keeps parking amortized O(1)
// while abandoned waiters never outnumber live ones by more than the floor.
fn next_prune_at(live: usize) -> usize {
    (live * 2).max(PRUNE_FLOOR)
}

/// Fixed-capacity asynchronous queue shared by any number of producers and
/// consumers.
///
/// `produce` and `consume` register with the queue at call time and return
/// futures that resolve once the operation completes. Call order therefore
/// fixes FIFO position, not await order.
pub struct BoundedQueue<T> {
    state: Mutex<State<T>>,
}

impl<T> BoundedQueue<T> {
    /// Creates an empty, open queue holding at most `capacity` items.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::InvalidCapacity(capacity));
        }
        Ok(Self::with_buffer(Buffer::with_capacity(capacity)))
    }

    fn with_buffer(buffer: Buffer<T>) -> Self {
        Self {
            state: Mutex::new(State {
                buffer,
                consumers: VecDeque::new(),
                producers: VecDeque::new(),
                closed: false,
                close_reason: None,
                producers_prune_at: PRUNE_FLOOR,
                consumers_prune_at: PRUNE_FLOOR,
            }),
        }
    }

    /// Creates a queue sized by a validated [`QueueConfig`].
    pub fn from_config(cfg: &QueueConfig) -> Result<Self> {
        cfg.validate()?;
        Self::new(cfg.capacity)
    }

    // Each step leaves the lists consistent before anything can panic, so a
    // poisoned lock still guards valid state.
    fn lock(&self) -> MutexGuard<'_, State<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Offers `item` to the queue.
    ///
    /// Resolves immediately when the item is handed to a waiting consumer or
    /// fits in the buffer; otherwise resolves once a later `consume` admits
    /// it. Fails with `Error::Closed` if the queue is closed first. Dropping
    /// the returned future while it is still pending withdraws the item; it
    /// is released by the next sweep of parked producers or by [`prune`].
    ///
    /// [`prune`]: BoundedQueue::prune
    pub fn produce(&self, item: T) -> Produce {
        let mut state = self.lock();
        if state.closed {
            trace!("produce rejected: queue closed");
            return Produce::ready(Err(state.closed_error()));
        }

        let mut item = item;
        while let Some(waiter) = state.consumers.pop_front() {
            match waiter.complete(item) {
                Ok(()) => {
                    trace!(
                        pending_consumers = state.consumers.len(),
                        "item handed off to waiting consumer"
                    );
                    return Produce::ready(Ok(()));
                }
                // consumer went away; offer the item to the next one
                Err(returned) => item = returned,
            }
        }

        match state.buffer.try_push(item) {
            Ok(()) => {
                trace!(len = state.buffer.len(), "item buffered");
                Produce::ready(Ok(()))
            }
            Err(item) => {
                let (waiter, rx) = ProducerWaiter::new(item);
                state.park_producer(waiter);
                trace!(
                    pending_producers = state.producers.len(),
                    "buffer full, producer parked"
                );
                Produce::waiting(rx)
            }
        }
    }

    /// Requests the next item.
    ///
    /// Resolves immediately with the buffer head when one is available;
    /// otherwise resolves with the item a later `produce` hands over. Fails
    /// with `Error::Closed` once the queue is closed and nothing drainable is
    /// left.
    pub fn consume(&self) -> Consume<T> {
        let mut state = self.lock();
        if let Some(item) = state.buffer.try_pop() {
            while let Some(waiter) = state.producers.pop_front() {
                if let Some(admitted) = waiter.admit() {
                    state.buffer.admit(admitted);
                    trace!(
                        pending_producers = state.producers.len(),
                        "pending producer admitted into freed slot"
                    );
                    break;
                }
            }
            return Consume::ready(Ok(item));
        }

        if state.closed {
            trace!("consume rejected: queue closed and empty");
            return Consume::ready(Err(state.closed_error()));
        }

        let (waiter, rx) = ConsumerWaiter::new();
        state.park_consumer(waiter);
        trace!(
            pending_consumers = state.consumers.len(),
            "buffer empty, consumer parked"
        );
        Consume::waiting(rx)
    }

    /// Closes the queue.
    ///
    /// Fails every pending producer, then every pending consumer, with
    /// `Error::Closed` carrying `opts.reason`. Buffered items are discarded
    /// unless `opts.allow_drain` is set, in which case consumers may still
    /// take them in order. New `produce` calls fail regardless.
    ///
    /// Only the first call has an effect; later calls keep the first
    /// reason and drain policy.
    pub fn close(&self, opts: CloseOptions) {
        let (withdrawn, discarded) = {
            let mut state = self.lock();
            if state.closed {
                trace!("close ignored: queue already closed");
                return;
            }
            state.closed = true;
            state.close_reason = opts.reason;
            let err = state.closed_error();

            let producers = std::mem::take(&mut state.producers);
            let consumers = std::mem::take(&mut state.consumers);
            let discarded = if opts.allow_drain {
                VecDeque::new()
            } else {
                state.buffer.take_all()
            };
            debug!(
                reason = ?state.close_reason,
                failed_producers = producers.len(),
                failed_consumers = consumers.len(),
                discarded = discarded.len(),
                retained = state.buffer.len(),
                "queue closed"
            );

            let withdrawn: Vec<T> = producers
                .into_iter()
                .map(|waiter| waiter.fail(err.clone()))
                .collect();
            for waiter in consumers {
                waiter.fail(err.clone());
            }
            (withdrawn, discarded)
        };
        // items are dropped outside the lock
        drop(withdrawn);
        drop(discarded);
    }

    /// Number of items immediately available to `consume`. Items carried by
    /// pending producers are not counted.
    pub fn len(&self) -> usize {
        self.lock().buffer.len()
    }

    /// True when no item is immediately available.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of buffered items, fixed at construction.
    pub fn capacity(&self) -> usize {
        self.lock().buffer.capacity()
    }

    /// True once `close` has been called.
    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    /// Removes parked waiters whose futures were dropped and returns how many
    /// were removed. Withdrawn producer items are dropped outside the lock.
    pub fn prune(&self) -> usize {
        let (pruned, withdrawn) = {
            let mut state = self.lock();
            let consumers_before = state.consumers.len();
            state.consumers.retain(|w| !w.is_abandoned());
            let mut pruned = consumers_before - state.consumers.len();

            let mut withdrawn = Vec::new();
            let mut live = VecDeque::with_capacity(state.producers.len());
            for waiter in std::mem::take(&mut state.producers) {
                if waiter.is_abandoned() {
                    withdrawn.push(waiter.into_item());
                } else {
                    live.push_back(waiter);
                }
            }
            state.producers = live;
            pruned += withdrawn.len();

            state.producers_prune_at = next_prune_at(state.producers.len());
            state.consumers_prune_at = next_prune_at(state.consumers.len());
            trace!(pruned, "abandoned waiters pruned");
            (pruned, withdrawn)
        };
        drop(withdrawn);
        pruned
    }

    /// Parked producers whose futures are still alive.
    pub fn pending_producers(&self) -> usize {
        self.stats().pending_producers
    }

    /// Parked consumers whose futures are still alive.
    pub fn pending_consumers(&self) -> usize {
        self.stats().pending_consumers
    }

    /// Point-in-time snapshot of the observable counters.
    pub fn stats(&self) -> QueueStats {
        let state = self.lock();
        QueueStats {
            capacity: state.buffer.capacity(),
            len: state.buffer.len(),
            pending_producers: state.producers.iter().filter(|w| !w.is_abandoned()).count(),
            pending_consumers: state.consumers.iter().filter(|w| !w.is_abandoned()).count(),
            closed: state.closed,
        }
    }
}

impl<T> Default for BoundedQueue<T> {
    /// Capacity-1 queue.
    fn default() -> Self {
        Self::with_buffer(Buffer::with_capacity(DEFAULT_CAPACITY))
    }
}

impl<T> std::fmt::Debug for BoundedQueue<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let stats = self.stats();
        f.debug_struct("BoundedQueue")
            .field("capacity", &stats.capacity)
            .field("len", &stats.len)
            .field("pending_producers", &stats.pending_producers)
            .field("pending_consumers", &stats.pending_consumers)
            .field("closed", &stats.closed)
            .finish()
    }
}

/// Counters returned by [`BoundedQueue::stats`]; abandoned waiters are not counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueStats {
    pub capacity: usize,
    pub len: usize,
    pub pending_producers: usize,
    pub pending_consumers: usize,
    pub closed: bool,
}

/// Outcome of an operation that either finished at call time or is parked
/// on a oneshot until another operation (or close) resolves it.
enum Completion<V> {
    Ready(Option<Result<V>>),
    Waiting(oneshot::Receiver<Result<V>>),
}

// Neither variant is ever pinned structurally.
impl<V> Unpin for Completion<V> {}

impl<V> Future for Completion<V> {
    type Output = Result<V>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match self.get_mut() {
            Completion::Ready(slot) => match slot.take() {
                Some(res) => Poll::Ready(res),
                None => {
                    debug_assert!(false, "operation future polled after completion");
                    Poll::Ready(Err(Error::closed(None)))
                }
            },
            // The queue was dropped with this caller still parked.
            Completion::Waiting(rx) => Pin::new(rx)
                .poll(cx)
                .map(|res| res.unwrap_or_else(|_| Err(Error::closed(None)))),
        }
    }
}

/// Future returned by [`BoundedQueue::produce`].
#[must_use = "dropping a pending produce withdraws its item"]
pub struct Produce {
    inner: Completion<()>,
}

impl Produce {
    fn ready(res: Result<()>) -> Self {
        Self {
            inner: Completion::Ready(Some(res)),
        }
    }

    fn waiting(rx: oneshot::Receiver<Result<()>>) -> Self {
        Self {
            inner: Completion::Waiting(rx),
        }
    }
}

impl Future for Produce {
    type Output = Result<()>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.get_mut().inner).poll(cx)
    }
}

/// Future returned by [`BoundedQueue::consume`].
#[must_use = "dropping a pending consume gives up its place in line"]
pub struct Consume<T> {
    inner: Completion<T>,
}

impl<T> Consume<T> {
    fn ready(res: Result<T>) -> Self {
        Self {
            inner: Completion::Ready(Some(res)),
        }
    }

    fn waiting(rx: oneshot::Receiver<Result<T>>) -> Self {
        Self {
            inner: Completion::Waiting(rx),
        }
    }
}

impl<T> Future for Consume<T> {
    type Output = Result<T>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.get_mut().inner).poll(cx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn admission_happens_inside_consume() {
        let q = BoundedQueue::new(1).unwrap();
        q.produce(1).await.unwrap();
        let parked = q.produce(2);
        assert_eq!(q.stats().pending_producers, 1);

        assert_eq!(q.consume().await.unwrap(), 1);
        // the slot was earmarked before consume returned
        assert_eq!(q.len(), 1);
        assert_eq!(q.stats().pending_producers, 0);

        // a later produce cannot take the freed slot
        let late = q.produce(3);
        assert_eq!(q.stats().pending_producers, 1);
        parked.await.unwrap();

        assert_eq!(q.consume().await.unwrap(), 2);
        assert_eq!(q.consume().await.unwrap(), 3);
        late.await.unwrap();
    }

    #[test]
    fn waiters_never_accumulate_on_both_sides() {
        let q = BoundedQueue::new(2).unwrap();
        let consumers: Vec<_> = (0..3).map(|_| q.consume()).collect();
        for i in 0..5 {
            let _ = q.produce(i);
            let s = q.stats();
            assert!(s.pending_consumers == 0 || s.pending_producers == 0);
        }
        let s = q.stats();
        assert_eq!((s.len, s.pending_consumers, s.pending_producers), (2, 0, 0));
        drop(consumers);
    }

    #[test]
    fn dropped_consumers_do_not_pile_up() {
        let q = BoundedQueue::<u32>::new(1).unwrap();
        for _ in 0..10_000 {
            drop(q.consume());
        }
        assert_eq!(q.pending_consumers(), 0);
        assert!(q.lock().consumers.len() <= PRUNE_FLOOR);

        // live waiters survive the sweep and keep their order
        let live: Vec<_> = (0..40).map(|_| q.consume()).collect();
        for _ in 0..1_000 {
            drop(q.consume());
        }
        assert_eq!(q.pending_consumers(), 40);
        assert!(q.lock().consumers.len() <= 2 * 40 + PRUNE_FLOOR);
        drop(live);
    }

    #[test]
    fn dropped_producers_do_not_pile_up() {
        let q = BoundedQueue::new(1).unwrap();
        let _ = q.produce(0u32);
        for i in 1..=1_000 {
            drop(q.produce(i));
        }
        assert_eq!(q.pending_producers(), 0);
        assert!(q.lock().producers.len() <= PRUNE_FLOOR);
    }

    #[test]
    fn debug_output_reports_counters() {
        let q: BoundedQueue<u8> = BoundedQueue::default();
        let out = format!("{:?}", q);
        assert!(out.contains("capacity: 1"));
        assert!(out.contains("closed: false"));
    }
}
