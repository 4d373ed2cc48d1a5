//! Best-effort fan-out to live feed subscribers.
//!
//! Every subscriber owns a single-slot channel. Publishing never waits: if a
//! subscriber still has an undelivered update in its slot, the new update is
//! dropped for that subscriber. Subscribers whose receiving end has gone away
//! are pruned on the next publish.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc::{self, error::TrySendError};

/// Depth of each subscriber's channel.
const SUBSCRIBER_CAPACITY: usize = 1;

/// Handle identifying one registered subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Receiving end of a registered feed.
pub struct Subscription<T> {
    id: SubscriptionId,
    rx: mpsc::Receiver<Arc<T>>,
}

impl<T> Subscription<T> {
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Wait for the next update. `None` once the registry dropped this subscriber.
    pub async fn recv(&mut self) -> Option<Arc<T>> {
        self.rx.recv().await
    }

    /// Take a pending update without waiting.
    #[cfg(test)]
    pub fn try_recv(&mut self) -> Option<Arc<T>> {
        self.rx.try_recv().ok()
    }
}

/// Outcome of one publish, for logging.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Delivery {
    pub delivered: usize,
    pub dropped: usize,
    pub pruned: usize,
}

struct Inner<T> {
    next_id: u64,
    senders: BTreeMap<SubscriptionId, mpsc::Sender<Arc<T>>>,
}

/// Registry of open feeds for one message type.
pub struct SubscriberRegistry<T> {
    inner: Mutex<Inner<T>>,
}

impl<T> Default for SubscriberRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SubscriberRegistry<T> {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                next_id: 0,
                senders: BTreeMap::new(),
            }),
        }
    }

    pub fn subscribe(&self) -> Subscription<T> {
        let (tx, rx) = mpsc::channel(SUBSCRIBER_CAPACITY);
        let mut inner = self.inner.lock();
        let id = SubscriptionId(inner.next_id);
        inner.next_id += 1;
        inner.senders.insert(id, tx);
        tracing::debug!(subscription = %id, subscribers = inner.senders.len(), "Subscriber registered");
        Subscription { id, rx }
    }

    /// Remove a subscriber. Returns false if it was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut inner = self.inner.lock();
        let removed = inner.senders.remove(&id).is_some();
        if removed {
            tracing::debug!(subscription = %id, subscribers = inner.senders.len(), "Subscriber removed");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.inner.lock().senders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Offer `update` to every subscriber without blocking.
    pub fn publish(&self, update: Arc<T>) -> Delivery {
        let mut delivery = Delivery::default();
        let mut inner = self.inner.lock();
        inner.senders.retain(|id, tx| match tx.try_send(update.clone()) {
            Ok(()) => {
                delivery.delivered += 1;
                true
            }
            Err(TrySendError::Full(_)) => {
                tracing::trace!(subscription = %id, "Subscriber busy, update dropped");
                delivery.dropped += 1;
                true
            }
            Err(TrySendError::Closed(_)) => {
                delivery.pruned += 1;
                false
            }
        });
        delivery
    }
}
