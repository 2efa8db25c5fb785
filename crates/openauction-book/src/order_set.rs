//! The ordered order set: an intrusive singly-linked chain of order keys.
//!
//! The chain runs from [`QUEUE_START`] through every live key in ascending
//! [`OrderKey::smaller_than`] order to [`QUEUE_END`]. The backing map is
//! `key -> next_key`; a key unknown to the map reads as `QUEUE_START`,
//! which makes a walk through a fully deleted entry restart from the head
//! instead of dereferencing garbage.
//!
//! Removal comes in two flavours. [`OrderedOrderSet::remove`] unlinks a key
//! and deletes its map entry (the claim path). [`OrderedOrderSet::remove_keep_history`]
//! unlinks the key but keeps its `next` entry as a tombstone, so an
//! in-flight placement that was computed against the old book can still use
//! the cancelled key as its hint (the cancellation path).
//!
//! All mutating operations return `bool` rather than an error: inside a
//! batch, a duplicate key or a stale hint is an expected input and is
//! skipped by the caller, not raised.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use openauction_types::{OrderKey, QUEUE_END, QUEUE_START};

/// A per-auction set of order keys, linked in ascending price order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderedOrderSet {
    /// `key -> next_key` chain, including tombstoned entries.
    next: HashMap<OrderKey, OrderKey>,
    /// Keys unlinked from the chain but kept in `next` as hints.
    tombstoned: HashSet<OrderKey>,
    /// Number of live (reachable) keys.
    len: usize,
}

impl OrderedOrderSet {
    /// Create an empty set: `QUEUE_START` links straight to `QUEUE_END`.
    #[must_use]
    pub fn new() -> Self {
        let mut next = HashMap::new();
        next.insert(QUEUE_START, QUEUE_END);
        Self {
            next,
            tombstoned: HashSet::new(),
            len: 0,
        }
    }

    /// Successor lookup without traversal.
    ///
    /// Keys unknown to the map read as `QUEUE_START` (the zero default of
    /// the underlying mapping).
    #[must_use]
    pub fn next(&self, key: OrderKey) -> OrderKey {
        self.next.get(&key).copied().unwrap_or(QUEUE_START)
    }

    /// The best (smallest) live key, or `QUEUE_END` if the set is empty.
    #[must_use]
    pub fn first(&self) -> OrderKey {
        self.next(QUEUE_START)
    }

    /// Whether `key` is live in the chain. Sentinels and tombstones are
    /// not contained.
    #[must_use]
    pub fn contains(&self, key: OrderKey) -> bool {
        !key.is_sentinel() && self.next.contains_key(&key) && !self.tombstoned.contains(&key)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.first() == QUEUE_END
    }

    /// Number of live keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Iterate the live chain in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = OrderKey> + '_ {
        std::iter::successors(Some(self.first()), move |key| Some(self.next(*key)))
            .take_while(|key| *key != QUEUE_END)
    }

    /// Insert `key` after the position found by walking forward from `hint`.
    ///
    /// Returns `false` without mutating if `key` is a sentinel, has a zero
    /// `sell_amount`, is already live, or if the hint is unusable: unknown
    /// to the map, or not strictly smaller than `key`. An over-early hint
    /// (including `QUEUE_START`) always works; it just walks further.
    ///
    /// Re-inserting a tombstoned key revives it at its correct position.
    pub fn insert(&mut self, key: OrderKey, hint: OrderKey) -> bool {
        if key.is_sentinel() || key.sell_amount() == 0 {
            return false;
        }
        if self.contains(key) {
            return false;
        }
        if hint != QUEUE_START && !self.next.contains_key(&hint) {
            return false;
        }
        if !hint.smaller_than(key) {
            return false;
        }

        let previous = match self.walk_to_predecessor(hint, key) {
            Some(previous) => previous,
            None => return false,
        };

        let successor = self.next(previous);
        self.next.insert(key, successor);
        self.next.insert(previous, key);
        self.tombstoned.remove(&key);
        self.len += 1;
        true
    }

    /// Walk forward from `hint` until the successor is not smaller than
    /// `key`, then make sure the landing spot is on the live chain.
    ///
    /// A hint on a stale tombstone chain can leave the walk parked on an
    /// unreachable key; splicing there would lose the insert, so the walk
    /// restarts from the head instead. Returns `None` if the chain already
    /// holds `key`.
    fn walk_to_predecessor(&self, hint: OrderKey, key: OrderKey) -> Option<OrderKey> {
        let mut previous = hint;
        loop {
            let mut nxt = self.next(previous);
            while nxt.smaller_than(key) {
                previous = nxt;
                nxt = self.next(previous);
            }
            if nxt == key {
                return None;
            }
            if previous == QUEUE_START || !self.tombstoned.contains(&previous) {
                return Some(previous);
            }
            previous = QUEUE_START;
        }
    }

    /// Hard-remove `key`: unlink it and delete its map entry.
    ///
    /// Returns `false` if `key` is not live. The predecessor is found by
    /// traversal from the head.
    pub fn remove(&mut self, key: OrderKey) -> bool {
        if !self.unlink(key) {
            return false;
        }
        self.next.remove(&key);
        true
    }

    /// Soft-remove `key`: unlink it from the live chain but keep its map
    /// entry, so it remains a usable insertion hint.
    ///
    /// Returns `false` if `key` is not live.
    pub fn remove_keep_history(&mut self, key: OrderKey) -> bool {
        if !self.unlink(key) {
            return false;
        }
        self.tombstoned.insert(key);
        true
    }

    /// Unlink a live key from the chain. The predecessor is found by
    /// traversal from the head.
    fn unlink(&mut self, key: OrderKey) -> bool {
        if !self.contains(key) {
            return false;
        }
        let mut previous = QUEUE_START;
        while self.next(previous) != key {
            previous = self.next(previous);
        }
        let successor = self.next(key);
        self.next.insert(previous, successor);
        self.len -= 1;
        true
    }
}

impl Default for OrderedOrderSet {
    fn default() -> Self {
        Self::new()
    }
}
