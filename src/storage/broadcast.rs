//! Local change broadcast
//!
//! After a collection is written, every open observer is told which key
//! changed so it can reload from storage. Delivery is in-process over mpsc
//! channels; observers that have gone away are pruned on the next publish.

use std::sync::{mpsc, Mutex, MutexGuard, PoisonError};

use tracing::trace;

use super::preferences::StoreKey;

/// Notification that a stored collection was rewritten
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeEvent {
    pub key: StoreKey,
}

/// Fan-out publisher for change events
#[derive(Default)]
pub struct ChangeBroadcaster {
    subscribers: Mutex<Vec<mpsc::Sender<ChangeEvent>>>,
}

impl ChangeBroadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    /// The sender list stays consistent even if a holder panicked, so a
    /// poisoned lock is recovered rather than dropping observers
    fn senders(&self) -> MutexGuard<'_, Vec<mpsc::Sender<ChangeEvent>>> {
        self.subscribers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a new observer
    pub fn subscribe(&self) -> Subscription {
        let (sender, receiver) = mpsc::channel();
        self.senders().push(sender);
        Subscription { receiver }
    }

    /// Deliver `event` to every live observer
    pub fn publish(&self, event: ChangeEvent) {
        let mut subscribers = self.senders();
        subscribers.retain(|sender| sender.send(event).is_ok());
        trace!(key = %event.key, observers = subscribers.len(), "broadcast change");
    }

    /// Number of observers still listening as of the last publish
    pub fn subscriber_count(&self) -> usize {
        self.senders().len()
    }
}

/// Receiving end held by an observer
pub struct Subscription {
    receiver: mpsc::Receiver<ChangeEvent>,
}

impl Subscription {
    /// Pending events, without blocking
    pub fn drain(&self) -> Vec<ChangeEvent> {
        self.receiver.try_iter().collect()
    }

    /// Keys that changed since the last call, deduplicated, in first-seen order
    pub fn changed_keys(&self) -> Vec<StoreKey> {
        let mut keys: Vec<StoreKey> = Vec::new();
        for event in self.drain() {
            if !keys.contains(&event.key) {
                keys.push(event.key);
            }
        }
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_subscriber_receives() {
        let broadcaster = ChangeBroadcaster::new();
        let a = broadcaster.subscribe();
        let b = broadcaster.subscribe();

        broadcaster.publish(ChangeEvent {
            key: StoreKey::Expenses,
        });

        assert_eq!(a.drain().len(), 1);
        assert_eq!(b.drain().len(), 1);
        assert!(a.drain().is_empty());
    }

    #[test]
    fn test_dropped_subscribers_are_pruned() {
        let broadcaster = ChangeBroadcaster::new();
        let kept = broadcaster.subscribe();
        {
            let _gone = broadcaster.subscribe();
        }
        assert_eq!(broadcaster.subscriber_count(), 2);

        broadcaster.publish(ChangeEvent { key: StoreKey::Tasks });
        assert_eq!(broadcaster.subscriber_count(), 1);
        assert_eq!(kept.drain()[0].key, StoreKey::Tasks);
    }

    #[test]
    fn test_poisoned_lock_still_delivers() {
        let broadcaster = ChangeBroadcaster::new();
        let early = broadcaster.subscribe();

        let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = broadcaster.subscribers.lock().unwrap();
            panic!("observer list holder failed");
        }));
        assert!(broadcaster.subscribers.is_poisoned());

        let late = broadcaster.subscribe();
        broadcaster.publish(ChangeEvent { key: StoreKey::Incomes });

        assert_eq!(broadcaster.subscriber_count(), 2);
        assert_eq!(early.drain()[0].key, StoreKey::Incomes);
        assert_eq!(late.drain()[0].key, StoreKey::Incomes);
    }

    #[test]
    fn test_changed_keys_deduplicates() {
        let broadcaster = ChangeBroadcaster::new();
        let sub = broadcaster.subscribe();

        for key in [StoreKey::Loans, StoreKey::Plans, StoreKey::Loans] {
            broadcaster.publish(ChangeEvent { key });
        }

        assert_eq!(sub.changed_keys(), vec![StoreKey::Loans, StoreKey::Plans]);
    }
}
