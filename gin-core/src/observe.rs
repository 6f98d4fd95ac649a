//! Observation snapshots and listener registration
//!
//! Each emitting entity (a seat's hand, the table) owns an [`Observers`] list.
//! After every mutating action the match pushes a fixed-width snapshot of card
//! rankings to each registered listener, synchronously and in registration order.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

/// Slots in a hand snapshot (a hand holds at most 11 cards)
pub const HAND_SLOTS: usize = 11;

/// Slots in a table snapshot: undealt count, then the discard pile
pub const TABLE_SLOTS: usize = 33;

/// Receives snapshots from an emitting entity
pub trait Observer: Send + Sync {
    fn observe(&self, snapshot: &[u8]);
}

/// Registration list for one emitting entity
#[derive(Default)]
pub struct Observers {
    listeners: Vec<Arc<dyn Observer>>,
}

impl Observers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener. Registering the same listener twice is a no-op;
    /// returns whether it was newly added.
    pub fn register(&mut self, listener: Arc<dyn Observer>) -> bool {
        if self.contains(&listener) {
            return false;
        }
        self.listeners.push(listener);
        true
    }

    /// Remove a listener by identity; returns whether it was registered
    pub fn remove(&mut self, listener: &Arc<dyn Observer>) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|l| !same_listener(l, listener));
        self.listeners.len() != before
    }

    pub fn contains(&self, listener: &Arc<dyn Observer>) -> bool {
        self.listeners.iter().any(|l| same_listener(l, listener))
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    pub fn notify(&self, snapshot: &[u8]) {
        for listener in &self.listeners {
            listener.observe(snapshot);
        }
    }
}

impl std::fmt::Debug for Observers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observers")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

// Compare data pointers only; vtable pointers are not guaranteed unique.
fn same_listener(a: &Arc<dyn Observer>, b: &Arc<dyn Observer>) -> bool {
    std::ptr::eq(
        Arc::as_ptr(a) as *const (),
        Arc::as_ptr(b) as *const (),
    )
}

/// Keeps the most recent snapshot it was sent
#[derive(Debug, Default)]
pub struct SnapshotBuffer {
    latest: RwLock<Vec<u8>>,
    notifications: AtomicUsize,
}

impl SnapshotBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffer pre-filled with `width` empty slots
    pub fn with_width(width: usize) -> Self {
        Self {
            latest: RwLock::new(vec![0; width]),
            notifications: AtomicUsize::new(0),
        }
    }

    pub fn latest(&self) -> Vec<u8> {
        self.latest
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// How many snapshots have been received
    pub fn times_notified(&self) -> usize {
        self.notifications.load(Ordering::Relaxed)
    }
}

impl Observer for SnapshotBuffer {
    fn observe(&self, snapshot: &[u8]) {
        let mut latest = self.latest.write().unwrap_or_else(PoisonError::into_inner);
        latest.clear();
        latest.extend_from_slice(snapshot);
        self.notifications.fetch_add(1, Ordering::Relaxed);
    }
}
