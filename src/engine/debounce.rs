use std::collections::HashMap;
use std::hash::Hash;
use std::time::Duration;

use futures::future::{AbortHandle, Abortable};
use tokio::sync::Mutex;

/// Coalesces bursts of work per key: only the last call made within the
/// quiet period proceeds, and only the latest scheduled call counts as
/// current afterwards.
pub struct Debouncer<K> {
    quiet_period: Duration,
    slots: Mutex<Slots<K>>,
}

struct Slots<K> {
    next_generation: u64,
    pending: HashMap<K, Slot>,
}

struct Slot {
    generation: u64,
    abort: AbortHandle,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ticket<K> {
    key: K,
    generation: u64,
}

impl<K> Debouncer<K>
where
    K: Eq + Hash + Clone,
{
    pub fn new(quiet_period: Duration) -> Self {
        Self {
            quiet_period,
            slots: Mutex::new(Slots {
                next_generation: 0,
                pending: HashMap::new(),
            }),
        }
    }

    pub fn quiet_period(&self) -> Duration {
        self.quiet_period
    }

    /// Waits out the quiet period for `key`, cancelling whatever wait was
    /// pending for it. Returns `None` if a later call cancelled this one.
    pub async fn settle(&self, key: K) -> Option<Ticket<K>> {
        let (abort, registration) = AbortHandle::new_pair();

        let generation = {
            let mut slots = self.slots.lock().await;
            slots.next_generation += 1;
            let generation = slots.next_generation;

            let previous = slots
                .pending
                .insert(key.clone(), Slot { generation, abort });
            if let Some(previous) = previous {
                previous.abort.abort();
            }

            generation
        };

        match Abortable::new(tokio::time::sleep(self.quiet_period), registration).await {
            Ok(()) => Some(Ticket { key, generation }),
            Err(_) => None,
        }
    }

    /// Whether no call for the ticket's key has been made since it was
    /// issued.
    pub async fn is_current(&self, ticket: &Ticket<K>) -> bool {
        let slots = self.slots.lock().await;

        slots
            .pending
            .get(&ticket.key)
            .map(|slot| slot.generation == ticket.generation)
            .unwrap_or(false)
    }

    /// Drops the slot for `key`, cancelling a pending wait.
    pub async fn cancel(&self, key: &K) {
        let mut slots = self.slots.lock().await;

        if let Some(slot) = slots.pending.remove(key) {
            slot.abort.abort();
        }
    }
}

#[test]
fn lone_call_settles() {
    tokio_test::block_on(async {
        let debouncer = Debouncer::new(Duration::from_millis(5));

        let ticket = debouncer.settle("pickup").await.unwrap();
        assert!(debouncer.is_current(&ticket).await);
    });
}

#[test]
fn later_call_cancels_pending_one() {
    tokio_test::block_on(async {
        let debouncer = Debouncer::new(Duration::from_millis(50));

        let first = debouncer.settle("pickup");
        let second = async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            debouncer.settle("pickup").await
        };
        let other_key = debouncer.settle("drop");

        let (first, second, other_key) = tokio::join!(first, second, other_key);

        assert!(first.is_none());
        assert!(debouncer.is_current(&second.unwrap()).await);
        assert!(debouncer.is_current(&other_key.unwrap()).await);
    });
}

#[test]
fn settled_ticket_goes_stale() {
    tokio_test::block_on(async {
        let debouncer = Debouncer::new(Duration::from_millis(5));

        let first = debouncer.settle("pickup").await.unwrap();
        let second = debouncer.settle("pickup").await.unwrap();

        assert!(!debouncer.is_current(&first).await);
        assert!(debouncer.is_current(&second).await);

        debouncer.cancel(&"pickup").await;
        assert!(!debouncer.is_current(&second).await);
    });
}
