//! Capacity-bounded FIFO holding accepted items until they are consumed.

use std::collections::VecDeque;

pub(crate) struct Buffer<T> {
    cap: usize,
    q: VecDeque<T>,
}

impl<T> Buffer<T> {
    /// `cap` has already been validated as non-zero by the queue constructor.
    pub(crate) fn with_capacity(cap: usize) -> Self {
        Self {
            cap,
            q: VecDeque::with_capacity(cap),
        }
    }

    /// Appends `v` at the tail, or hands it back when the buffer is full.
    pub(crate) fn try_push(&mut self, v: T) -> Result<(), T> {
        if self.is_full() {
            Err(v)
        } else {
            self.q.push_back(v);
            Ok(())
        }
    }

    /// Places a parked producer's item into the slot a consume just freed.
    pub(crate) fn admit(&mut self, v: T) {
        debug_assert!(!self.is_full(), "admission requires a freed slot");
        self.q.push_back(v);
    }

    pub(crate) fn try_pop(&mut self) -> Option<T> {
        self.q.pop_front()
    }

    /// Removes every buffered item, preserving order.
    pub(crate) fn take_all(&mut self) -> VecDeque<T> {
        std::mem::take(&mut self.q)
    }

    pub(crate) fn len(&self) -> usize {
        self.q.len()
    }

    pub(crate) fn capacity(&self) -> usize {
        self.cap
    }

    pub(crate) fn is_full(&self) -> bool {
        self.q.len() >= self.cap
    }
}
