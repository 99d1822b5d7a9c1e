//! Last-request-wins fencing for request slots.
//!
//! A slot is one logical place in the UI (the current classification, the
//! displayed history). Each request takes a [`Ticket`]; only the holder of
//! the most recent ticket may write its outcome back. Older outcomes are
//! dropped, which is how an abandoned request is "cancelled".

use crate::error::ErrorNotice;
use std::sync::{Mutex, MutexGuard};

/// Monotonic request identity within one slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl Ticket {
    pub fn seq(self) -> u64 {
        self.0
    }
}

/// What a slot currently shows.
#[derive(Debug, Clone, PartialEq)]
pub enum SlotState<K, T> {
    Idle,
    Pending { key: K },
    Ready { key: K, value: T },
    Failed { key: K, notice: ErrorNotice },
}

impl<K, T> SlotState<K, T> {
    pub fn is_pending(&self) -> bool {
        matches!(self, SlotState::Pending { .. })
    }

    pub fn key(&self) -> Option<&K> {
        match self {
            SlotState::Idle => None,
            SlotState::Pending { key }
            | SlotState::Ready { key, .. }
            | SlotState::Failed { key, .. } => Some(key),
        }
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            SlotState::Ready { value, .. } => Some(value),
            _ => None,
        }
    }
}

impl<K, T> Default for SlotState<K, T> {
    fn default() -> Self {
        SlotState::Idle
    }
}

/// Result of writing an outcome back into a slot.
#[derive(Debug, Clone, PartialEq)]
pub enum Settled<T> {
    /// The outcome was current and is now what the slot shows.
    Applied(T),
    /// A newer request took the slot; the outcome was discarded.
    Superseded,
}

impl<T> Settled<T> {
    pub fn applied(self) -> Option<T> {
        match self {
            Settled::Applied(v) => Some(v),
            Settled::Superseded => None,
        }
    }

    pub fn is_superseded(&self) -> bool {
        matches!(self, Settled::Superseded)
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Settled<U> {
        match self {
            Settled::Applied(v) => Settled::Applied(f(v)),
            Settled::Superseded => Settled::Superseded,
        }
    }
}

struct Inner<K, T> {
    latest: u64,
    state: SlotState<K, T>,
}

pub struct FencedSlot<K, T> {
    inner: Mutex<Inner<K, T>>,
}

impl<K: Clone, T: Clone> FencedSlot<K, T> {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                latest: 0,
                state: SlotState::Idle,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner<K, T>> {
        // A panic mid-transition leaves a consistent state behind; keep going.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Claim the slot for a new request. Every older ticket becomes stale.
    pub fn begin(&self, key: K) -> Ticket {
        let mut inner = self.lock();
        inner.latest += 1;
        inner.state = SlotState::Pending { key };
        Ticket(inner.latest)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.lock().latest == ticket.0
    }

    /// Write `next` into the slot if `ticket` is still the latest.
    ///
    /// The check and the write happen under one lock, so a newer request can
    /// never be overwritten by an older one finishing late.
    pub fn settle(&self, ticket: Ticket, next: SlotState<K, T>) -> bool {
        let mut inner = self.lock();
        if inner.latest != ticket.0 {
            return false;
        }
        inner.state = next;
        true
    }

    /// Drop a displayed failure, returning to `Idle`.
    pub fn dismiss(&self) {
        let mut inner = self.lock();
        if matches!(inner.state, SlotState::Failed { .. }) {
            inner.state = SlotState::Idle;
        }
    }

    /// Return to `Idle` and invalidate every outstanding ticket.
    pub fn reset(&self) {
        let mut inner = self.lock();
        inner.latest += 1;
        inner.state = SlotState::Idle;
    }

    pub fn state(&self) -> SlotState<K, T> {
        self.lock().state.clone()
    }
}

impl<K: Clone, T: Clone> Default for FencedSlot<K, T> {
    fn default() -> Self {
        Self::new()
    }
}
