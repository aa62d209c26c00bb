//! Replay-of-latest broadcast bus.

use std::sync::{Mutex, MutexGuard, mpsc};

use crate::bus::{EventBus, Subscription};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReplayBusError {
    /// Publish failed due to internal lock poisoning.
    #[error("replay bus lock poisoned")]
    Poisoned,
}

#[derive(Debug)]
struct Inner<M> {
    latest: M,
    subscribers: Vec<mpsc::Sender<M>>,
}

/// In-memory pub/sub bus that replays the current value to new subscribers.
///
/// - No IO / no async
/// - Publishing and subscribing share one lock, so the latest value and the
///   subscriber list can never disagree: a new subscriber sees the current
///   value first, then everything published after it.
/// - Dead subscribers are pruned while publishing.
#[derive(Debug)]
pub struct ReplayBus<M> {
    inner: Mutex<Inner<M>>,
}

impl<M> ReplayBus<M>
where
    M: Clone,
{
    pub fn new(initial: M) -> Self {
        Self {
            inner: Mutex::new(Inner {
                latest: initial,
                subscribers: Vec::new(),
            }),
        }
    }

    /// Snapshot of the latest published value.
    pub fn current(&self) -> M {
        self.lock().latest.clone()
    }

    /// Number of live subscribers as of the last publish.
    pub fn subscriber_count(&self) -> usize {
        self.lock().subscribers.len()
    }

    // The guarded state is a plain value plus senders; a panic while holding the
    // lock cannot leave it half-updated, so reads recover from poisoning.
    fn lock(&self) -> MutexGuard<'_, Inner<M>> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<M> Default for ReplayBus<M>
where
    M: Clone + Default,
{
    fn default() -> Self {
        Self::new(M::default())
    }
}

impl<M> EventBus<M> for ReplayBus<M>
where
    M: Clone + Send + 'static,
{
    type Error = ReplayBusError;

    fn publish(&self, message: M) -> Result<(), Self::Error> {
        let mut inner = self.inner.lock().map_err(|_| ReplayBusError::Poisoned)?;

        inner.latest = message.clone();
        inner.subscribers.retain(|tx| tx.send(message.clone()).is_ok());

        tracing::trace!(subscribers = inner.subscribers.len(), "replay bus published");
        Ok(())
    }

    fn subscribe(&self) -> Subscription<M> {
        let (tx, rx) = mpsc::channel();
        let mut inner = self.lock();

        // Receiver is alive (we hold it), so the replay cannot fail.
        let _ = tx.send(inner.latest.clone());
        inner.subscribers.push(tx);

        Subscription::new(rx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscriber_receives_current_value_immediately() {
        let bus = ReplayBus::new(Some("alice".to_string()));
        let sub = bus.subscribe();
        assert_eq!(sub.try_recv().unwrap(), Some("alice".to_string()));
        assert!(sub.try_recv().is_err());
    }

    #[test]
    fn subscribers_observe_changes_in_publish_order() {
        let bus = ReplayBus::new(0u32);
        let early = bus.subscribe();
        bus.publish(1).unwrap();
        let late = bus.subscribe();
        bus.publish(2).unwrap();
        bus.publish(3).unwrap();

        assert_eq!(early.drain(), vec![0, 1, 2, 3]);
        assert_eq!(late.drain(), vec![1, 2, 3]);
        assert_eq!(bus.current(), 3);
    }

    #[test]
    fn dropped_subscribers_are_pruned_on_publish() {
        let bus = ReplayBus::new(None::<u8>);
        let keep = bus.subscribe();
        {
            let _gone = bus.subscribe();
        }
        bus.publish(Some(1)).unwrap();
        assert_eq!(bus.subscriber_count(), 1);
        assert_eq!(keep.latest(), Some(Some(1)));
    }

    #[test]
    fn shared_bus_publishes_through_arc() {
        let bus = std::sync::Arc::new(ReplayBus::new(0u8));
        let sub = bus.subscribe();
        EventBus::publish(&bus, 9).unwrap();
        assert_eq!(sub.drain(), vec![0, 9]);
    }
}
