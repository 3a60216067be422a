//! Parked produce/consume calls.
//!
//! Each waiter owns the sending half of a oneshot channel; the matching
//! receiver lives inside the caller's `Produce`/`Consume` future. Completing
//! or failing a waiter only signals it: the woken caller observes the outcome
//! on its next poll, never inside the operation that woke it.

use tokio::sync::oneshot;

use crate::error::{Error, Result};

/// A `consume` call waiting for an item.
pub(crate) struct ConsumerWaiter<T> {
    tx: oneshot::Sender<Result<T>>,
}

impl<T> ConsumerWaiter<T> {
    pub(crate) fn new() -> (Self, oneshot::Receiver<Result<T>>) {
        let (tx, rx) = oneshot::channel();
        (Self { tx }, rx)
    }

    /// Hands `item` straight to the waiting consumer.
    ///
    /// Returns the item when the consumer's future was dropped, so the caller
    /// can offer it to the next waiter instead of losing it.
    pub(crate) fn complete(self, item: T) -> std::result::Result<(), T> {
        match self.tx.send(Ok(item)) {
            Ok(()) => Ok(()),
            Err(Ok(item)) => Err(item),
            // only `Ok` travels through `complete`
            Err(Err(_)) => Ok(()),
        }
    }

    pub(crate) fn fail(self, err: Error) {
        let _ = self.tx.send(Err(err));
    }

    pub(crate) fn is_abandoned(&self) -> bool {
        self.tx.is_closed()
    }
}

/// A `produce` call waiting for a free slot, holding the item it carries.
pub(crate) struct ProducerWaiter<T> {
    tx: oneshot::Sender<Result<()>>,
    item: T,
}

impl<T> ProducerWaiter<T> {
    pub(crate) fn new(item: T) -> (Self, oneshot::Receiver<Result<()>>) {
        let (tx, rx) = oneshot::channel();
        (Self { tx, item }, rx)
    }

    /// Resolves the producer and releases its item for placement in the buffer.
    ///
    /// `None` means the producer's future was dropped before admission; its
    /// item is withdrawn and dropped along with the waiter.
    pub(crate) fn admit(self) -> Option<T> {
        match self.tx.send(Ok(())) {
            Ok(()) => Some(self.item),
            Err(_) => None,
        }
    }

    /// Rejects the producer and gives back the item it never delivered.
    pub(crate) fn fail(self, err: Error) -> T {
        let _ = self.tx.send(Err(err));
        self.item
    }

    pub(crate) fn is_abandoned(&self) -> bool {
        self.tx.is_closed()
    }

    /// Discards the waiter and hands back the item it carried.
    pub(crate) fn into_item(self) -> T {
        self.item
    }
}
