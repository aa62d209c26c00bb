//! Publish/subscribe abstraction (mechanics only).
//!
//! The bus is intentionally **lightweight**:
//!
//! - **Transport-agnostic**: the only implementation today is in-process, but
//!   nothing here assumes it.
//! - **Broadcast semantics**: each subscriber gets its own copy of every message
//!   published after it subscribed.
//! - **No persistence**: the bus distributes values, it does not store history.

use std::sync::Arc;
use std::sync::mpsc::Receiver;
use std::time::Duration;

/// A subscription to a message stream.
///
/// ```ignore
/// let subscription = bus.subscribe();
///
/// while let Ok(identity) = subscription.recv() {
///     redraw_header(identity.as_ref());
/// }
/// ```
///
/// Subscriptions are designed for single-threaded consumption. Dropping the
/// subscription unsubscribes; the bus prunes it on the next publish.
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
    pub fn try_recv(&self) -> Result<M, std::sync::mpsc::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Block for up to `timeout` waiting for a message.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<M, std::sync::mpsc::RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }

    /// Take every message already delivered, oldest first, without blocking.
    pub fn drain(&self) -> Vec<M> {
        self.receiver.try_iter().collect()
    }

    /// The most recent delivered message, discarding older ones.
    pub fn latest(&self) -> Option<M> {
        self.receiver.try_iter().last()
    }
}

/// Domain-agnostic pub/sub abstraction.
///
/// ## Delivery
///
/// Implementations must deliver messages to every live subscriber in the order
/// they were published. A subscriber never observes an older value after a
/// newer one has been delivered to any other subscriber.
///
/// ## Thread Safety
///
/// The trait requires `Send + Sync` so a bus can be shared behind an `Arc`
/// between the navigation shell and the active view.
pub trait EventBus<M>: Send + Sync {
    type Error: core::fmt::Debug + Send + Sync + 'static;

    fn publish(&self, message: M) -> Result<(), Self::Error>;

    fn subscribe(&self) -> Subscription<M>;
}

impl<M, B> EventBus<M> for Arc<B>
where
    B: EventBus<M> + ?Sized,
{
    type Error = B::Error;

    fn publish(&self, message: M) -> Result<(), Self::Error> {
        (**self).publish(message)
    }

    fn subscribe(&self) -> Subscription<M> {
        (**self).subscribe()
    }
}
