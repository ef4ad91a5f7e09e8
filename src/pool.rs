//! The shared pool of physical frames.

use crate::config::{ConfigError, SimConfig};
use crate::frame::{Frame, FrameIndex, FrameOccupant};
use crate::page_table::VirtualPage;
use crate::process::ProcessHandle;
use tracing::trace;

/// Run-wide statistics, kept for the lifetime of the simulation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Total page faults resolved.
    pub faults: u64,
    /// Total successful memory references, hits and faults alike.
    pub references: u64,
}

impl PoolStats {
    /// Fault ratio as a whole percentage point, truncated rather than
    /// rounded. Zero when nothing has been referenced yet.
    pub fn fault_ratio_percent(&self) -> u64 {
        if self.references == 0 {
            0
        } else {
            self.faults * 100 / self.references
        }
    }
}

/// Which end of the age-counter range the victim scan should prefer.
///
/// FIFO hunts for the smallest counter (oldest insertion sequence); LRU for
/// the largest (most references since last touch).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VictimOrder {
    /// Reclaim the occupied frame with the smallest counter.
    MinCounter,
    /// Reclaim the occupied frame with the largest counter.
    MaxCounter,
}

/// The fixed array of physical frames shared by every process in the run.
#[derive(Debug)]
pub struct FramePool {
    /// The frames, indexed by [`FrameIndex`].
    frames: Vec<Frame>,
    /// Fault and reference totals.
    stats: PoolStats,
}

impl FramePool {
    /// Builds a pool of `config.frames` free frames.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for degenerate dimensions; in particular a
    /// zero-frame pool is rejected here because victim selection would be
    /// undefined.
    pub fn new(config: &SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            frames: vec![Frame::default(); config.frames],
            stats: PoolStats::default(),
        })
    }

    /// Number of frames in the pool.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Always `false`: construction rejects empty pools.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// The frames, for inspection and reporting.
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Mutable frame access for the policy's aging updates.
    pub(crate) fn frames_mut(&mut self) -> &mut [Frame] {
        &mut self.frames
    }

    /// Snapshot of the run-wide counters.
    pub fn stats(&self) -> PoolStats {
        self.stats
    }

    /// Counts one resolved page fault.
    pub(crate) fn count_fault(&mut self) {
        self.stats.faults += 1;
    }

    /// Counts one successful memory reference.
    pub(crate) fn count_reference(&mut self) {
        self.stats.references += 1;
    }

    /// Selects the frame to reuse for the next fault.
    ///
    /// A free frame always wins, scanning left to right. With no frame
    /// free, the occupied frame whose counter is extremal under `order` is
    /// chosen; ties go to the lowest index. This never fails: the pool
    /// holds at least one frame, so evicting an occupied frame is always a
    /// legal fallback.
    pub fn find_victim(&self, order: VictimOrder) -> FrameIndex {
        let mut victim = 0;
        for (index, frame) in self.frames.iter().enumerate() {
            if frame.is_free() {
                return index;
            }
            let best = self.frames[victim].counter;
            let better = match order {
                VictimOrder::MinCounter => frame.counter < best,
                VictimOrder::MaxCounter => frame.counter > best,
            };
            if better {
                victim = index;
            }
        }
        victim
    }

    /// Takes the occupant out of `index`, leaving the frame free with its
    /// counter back at the baseline.
    pub(crate) fn evict(&mut self, index: FrameIndex) -> Option<FrameOccupant> {
        let frame = &mut self.frames[index];
        frame.counter = 0;
        frame.occupant.take()
    }

    /// Installs `process`'s `vpage` as the occupant of `index`, with the
    /// counter baseline the policy chose for this insertion.
    pub(crate) fn occupy(
        &mut self,
        index: FrameIndex,
        process: ProcessHandle,
        vpage: VirtualPage,
        counter: u64,
    ) {
        let frame = &mut self.frames[index];
        debug_assert!(frame.is_free(), "occupying a frame that was not evicted");
        frame.occupant = Some(FrameOccupant { process, vpage });
        frame.counter = counter;
    }

    /// Frees every frame `process` owns, invalidating the matching page
    /// table entries as it goes. Frames owned by other processes keep their
    /// occupants and counters untouched.
    pub fn release(&mut self, process: &ProcessHandle) {
        for (index, frame) in self.frames.iter_mut().enumerate() {
            let owned = frame
                .occupant
                .as_ref()
                .is_some_and(|occupant| occupant.process.is_same(process));
            if owned {
                frame.occupant = None;
                frame.counter = 0;
                let dirty = process.invalidate_frame(index);
                trace!(pid = %process.id(), frame = index, dirty, "released frame");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::ProcessId;

    fn pool(frames: usize) -> FramePool {
        let config = SimConfig {
            frames,
            ..SimConfig::default()
        };
        FramePool::new(&config).unwrap()
    }

    fn process(id: u32) -> ProcessHandle {
        ProcessHandle::new(ProcessId::new(id), &SimConfig::default())
    }

    #[test]
    fn empty_pool_is_rejected() {
        let config = SimConfig {
            frames: 0,
            ..SimConfig::default()
        };
        assert_eq!(FramePool::new(&config).unwrap_err(), ConfigError::NoFrames);
    }

    #[test]
    fn first_free_frame_wins() {
        let mut pool = pool(3);
        let p = process(1);
        pool.occupy(0, p.clone(), 0, 7);
        assert_eq!(pool.find_victim(VictimOrder::MinCounter), 1);
        assert_eq!(pool.find_victim(VictimOrder::MaxCounter), 1);

        // A free frame preempts any counter, even a hole in the middle.
        pool.occupy(1, p.clone(), 1, 0);
        pool.occupy(2, p.clone(), 2, 9);
        pool.evict(1);
        assert_eq!(pool.find_victim(VictimOrder::MaxCounter), 1);
    }

    #[test]
    fn counter_ties_go_to_the_lowest_index() {
        let mut pool = pool(3);
        let p = process(1);
        pool.occupy(0, p.clone(), 0, 5);
        pool.occupy(1, p.clone(), 1, 5);
        pool.occupy(2, p.clone(), 2, 5);
        assert_eq!(pool.find_victim(VictimOrder::MinCounter), 0);
        assert_eq!(pool.find_victim(VictimOrder::MaxCounter), 0);
    }

    #[test]
    fn victim_scan_direction() {
        let mut pool = pool(3);
        let p = process(1);
        pool.occupy(0, p.clone(), 0, 3);
        pool.occupy(1, p.clone(), 1, 1);
        pool.occupy(2, p.clone(), 2, 8);
        assert_eq!(pool.find_victim(VictimOrder::MinCounter), 1);
        assert_eq!(pool.find_victim(VictimOrder::MaxCounter), 2);
    }
}
