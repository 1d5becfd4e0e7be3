//! Publish/subscribe abstraction (mechanics only).
//!
//! A store publishes a message after every committed mutation; every
//! subscriber receives a copy (broadcast semantics). The bus distributes, it
//! does not persist — the owning store remains the source of truth, so a
//! subscriber that misses messages can always re-read the store directly.

use std::sync::mpsc::Receiver;
use std::time::Duration;

/// A subscription to a message stream.
///
/// Each subscription gets a copy of every message published after the
/// subscription was created. Subscriptions are single-consumer: use one per
/// observing surface.
#[derive(Debug)]
pub struct Subscription<M> {
    receiver: Receiver<M>,
}

impl<M> Subscription<M> {
    pub fn new(receiver: Receiver<M>) -> Self {
        Self { receiver }
    }

    /// Block until the next message is available.
    pub fn recv(&self) -> Result<M, std::sync::mpsc::RecvError> {
        self.receiver.recv()
    }

    /// Try to receive a message without blocking.
    ///
    /// This is the call UI event loops make between frames.
    pub fn try_recv(&self) -> Result<M, std::sync::mpsc::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Block for up to `timeout` waiting for a message.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<M, std::sync::mpsc::RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }
}

/// Domain-agnostic message bus (pub/sub abstraction).
///
/// - Lightweight contract, no assumptions about transport.
/// - Broadcast semantics: each subscriber gets a copy of every message.
/// - No storage: missed messages are recovered by re-reading the store.
pub trait EventBus<M> {
    type Error: core::fmt::Debug;

    /// Publish a message to all current subscribers.
    fn publish(&self, message: M) -> Result<(), Self::Error>;

    /// Create a new subscription receiving all subsequently published messages.
    fn subscribe(&self) -> Subscription<M>;
}
