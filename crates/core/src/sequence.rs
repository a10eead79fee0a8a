//! Request generation tags for overlapping async operations.
//!
//! Every time a logical operation starts (say "load the queue" or "analyze the
//! logo") the store takes a [`Ticket`] from a [`RequestSequencer`]. When the
//! response arrives it is applied only if its ticket is still the latest one
//! for that operation; a response overtaken by a newer request is dropped.

use std::collections::HashMap;
use std::hash::Hash;

/// Proof that a request was started, tagged with its generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket<K> {
    op: K,
    seq: u64,
}

impl<K: Copy> Ticket<K> {
    /// The operation this ticket belongs to.
    #[must_use]
    pub const fn op(&self) -> K {
        self.op
    }

    /// Generation number (monotonically increasing per operation).
    #[must_use]
    pub const fn seq(&self) -> u64 {
        self.seq
    }
}

/// Hands out monotonically increasing tickets per logical operation.
#[derive(Debug, Clone)]
pub struct RequestSequencer<K> {
    latest: HashMap<K, u64>,
}

impl<K> Default for RequestSequencer<K> {
    fn default() -> Self {
        Self {
            latest: HashMap::new(),
        }
    }
}

impl<K: Copy + Eq + Hash> RequestSequencer<K> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new request for `op`, superseding any in flight.
    pub fn begin(&mut self, op: K) -> Ticket<K> {
        let seq = self.latest.entry(op).or_insert(0);
        *seq += 1;
        Ticket { op, seq: *seq }
    }

    /// Whether `ticket` is still the latest request for its operation.
    #[must_use]
    pub fn is_current(&self, ticket: &Ticket<K>) -> bool {
        self.latest.get(&ticket.op) == Some(&ticket.seq)
    }

    /// Discard every in-flight request for `op` without starting a new one.
    pub fn invalidate(&mut self, op: K) {
        *self.latest.entry(op).or_insert(0) += 1;
    }
}
