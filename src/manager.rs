//! Composition of the frame pool and the replacement policy.

use crate::config::{ConfigError, SimConfig};
use crate::frame::FrameIndex;
use crate::page_table::VirtualPage;
use crate::pool::{FramePool, PoolStats};
use crate::process::ProcessHandle;
use crate::replacer::Policy;
use tracing::{debug, info, trace};

/// Resolves page faults against the shared frame pool using the configured
/// replacement policy, and keeps the run-wide statistics.
#[derive(Debug)]
pub struct MemoryManager {
    /// The shared physical frames and counters.
    pool: FramePool,
    /// The replacement policy and its aging state.
    policy: Policy,
}

impl MemoryManager {
    /// Builds a manager for `config`'s pool and policy.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for degenerate dimensions.
    pub fn new(config: &SimConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            pool: FramePool::new(config)?,
            policy: Policy::new(config.policy),
        })
    }

    /// Assigns a frame to `process`'s `vpage`, evicting a resident page if
    /// the pool is full. Returns the assigned frame index.
    ///
    /// If the victim frame was occupied, the previous owner's page table is
    /// notified before the frame changes hands, so a valid entry never
    /// names a frame the pool has already reassigned. Counts exactly one
    /// fault per call.
    pub fn handle_fault(&mut self, process: &ProcessHandle, vpage: VirtualPage) -> FrameIndex {
        let victim = self.pool.find_victim(self.policy.victim_order());

        if let Some(previous) = self.pool.evict(victim) {
            let dirty = previous.process.invalidate_frame(victim);
            info!(pid = %process.id(), frame = victim, "page fault");
            debug!(
                pid = %previous.process.id(),
                vpage = previous.vpage,
                dirty,
                "evicted resident page",
            );
        }

        self.pool.count_fault();
        let counter = self.policy.counter_on_occupy();
        self.pool.occupy(victim, process.clone(), vpage, counter);

        trace!(pid = %process.id(), vpage, frame = victim, "fault resolved");
        victim
    }

    /// Records a successful reference to `frame`, hit or just-resolved
    /// fault, and lets the policy update its aging.
    pub fn touch(&mut self, frame: FrameIndex) {
        self.pool.count_reference();
        self.policy.touch(&mut self.pool, frame);
    }

    /// Frees every frame `process` owns; called when the process leaves the
    /// simulation.
    pub fn release(&mut self, process: &ProcessHandle) {
        self.pool.release(process);
    }

    /// The underlying frame pool, for inspection and reporting.
    pub fn pool(&self) -> &FramePool {
        &self.pool
    }

    /// Snapshot of the run-wide fault and reference counters.
    pub fn stats(&self) -> PoolStats {
        self.pool.stats()
    }
}
