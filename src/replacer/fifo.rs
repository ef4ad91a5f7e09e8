//! First-in, first-out replacement.

use crate::frame::FrameIndex;
use crate::pool::FramePool;

/// FIFO aging state: a monotonically increasing insertion sequence.
///
/// A frame's counter is the sequence number it was occupied at, so the
/// minimum-counter victim scan lands on the oldest insertion. Re-references
/// never move a frame in the queue.
#[derive(Debug, Default)]
pub struct Fifo {
    /// Sequence number handed to the next insertion.
    next_seq: u64,
}

impl Fifo {
    /// Claims the sequence number for a frame about to be occupied.
    pub(crate) fn next_insertion(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    /// FIFO ignores re-reference recency; only insertion order matters.
    pub(crate) fn touch(&mut self, _pool: &mut FramePool, _frame: FrameIndex) {}
}
