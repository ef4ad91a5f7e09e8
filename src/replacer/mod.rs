//! Page-replacement policies.
//!
//! FIFO and LRU share the victim-scan contract and differ in two places:
//! the direction the scan compares age counters, and what a touch does to
//! them. No further variants are anticipated, so the policy is a closed
//! enum rather than an open trait.

mod fifo;
mod lru;

pub use fifo::Fifo;
pub use lru::Lru;

use crate::config::PolicyKind;
use crate::frame::FrameIndex;
use crate::pool::{FramePool, VictimOrder};

/// A replacement policy instance, carrying whatever aging state the
/// algorithm keeps across faults.
#[derive(Debug)]
pub enum Policy {
    /// First-in, first-out replacement.
    Fifo(Fifo),
    /// Least-recently-used replacement.
    Lru(Lru),
}

impl Policy {
    /// Instantiates the policy selected by `kind`.
    pub fn new(kind: PolicyKind) -> Self {
        match kind {
            PolicyKind::Fifo => Policy::Fifo(Fifo::default()),
            PolicyKind::Lru => Policy::Lru(Lru::default()),
        }
    }

    /// The selector this policy was built from.
    pub fn kind(&self) -> PolicyKind {
        match self {
            Policy::Fifo(_) => PolicyKind::Fifo,
            Policy::Lru(_) => PolicyKind::Lru,
        }
    }

    /// Scan direction for the pool's victim search: oldest insertion wins
    /// for FIFO, most stale wins for LRU.
    pub(crate) fn victim_order(&self) -> VictimOrder {
        match self {
            Policy::Fifo(_) => VictimOrder::MinCounter,
            Policy::Lru(_) => VictimOrder::MaxCounter,
        }
    }

    /// Counter baseline for a frame about to be occupied.
    pub(crate) fn counter_on_occupy(&mut self) -> u64 {
        match self {
            Policy::Fifo(fifo) => fifo.next_insertion(),
            Policy::Lru(_) => 0,
        }
    }

    /// Updates aging for a successful reference to `frame`.
    pub(crate) fn touch(&mut self, pool: &mut FramePool, frame: FrameIndex) {
        match self {
            Policy::Fifo(fifo) => fifo.touch(pool, frame),
            Policy::Lru(lru) => lru.touch(pool, frame),
        }
    }
}
