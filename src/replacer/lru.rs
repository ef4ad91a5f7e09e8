//! Least-recently-used replacement.

use crate::frame::FrameIndex;
use crate::pool::FramePool;

/// LRU aging: an explicit clock tick per reference.
///
/// The touched frame's counter drops to zero and every other occupied frame
/// ages by one. The trace is sequential, so reference order alone determines
/// recency, and the maximum-counter victim scan lands on the least recently
/// used frame.
#[derive(Debug, Default)]
pub struct Lru;

impl Lru {
    /// Resets the touched frame and ages every other occupied frame.
    pub(crate) fn touch(&mut self, pool: &mut FramePool, frame: FrameIndex) {
        for (index, slot) in pool.frames_mut().iter_mut().enumerate() {
            if index == frame {
                slot.counter = 0;
            } else if !slot.is_free() {
                slot.counter += 1;
            }
        }
    }
}
