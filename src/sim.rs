//! The trace-driven simulation: a process registry over the memory manager.

use crate::config::{ConfigError, SimConfig};
use crate::manager::MemoryManager;
use crate::page_table::AddressOutOfRange;
use crate::pool::PoolStats;
use crate::process::{ProcessHandle, ProcessId};
use crate::trace::{TraceOp, TraceRecord};
use std::collections::HashMap;
use tracing::debug;

/// One full simulation run: the shared memory manager plus the table of
/// live processes, keyed by external id with create-on-first-use.
#[derive(Debug)]
pub struct Simulation {
    /// Machine dimensions, shared with every page table created here.
    config: SimConfig,
    /// Pool, policy, and counters.
    manager: MemoryManager,
    /// Live processes. Terminated ids are removed and may be reused by a
    /// later record, which creates a brand-new process.
    processes: HashMap<ProcessId, ProcessHandle>,
}

impl Simulation {
    /// Builds a simulation over an empty pool and no processes.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for degenerate dimensions.
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            manager: MemoryManager::new(&config)?,
            config,
            processes: HashMap::new(),
        })
    }

    /// Applies one trace record. Records must be applied in trace order;
    /// all fault and aging side effects happen before this returns.
    ///
    /// # Errors
    ///
    /// [`AddressOutOfRange`] if the record references past the virtual
    /// address space. The reference is abandoned and the simulation is
    /// still consistent; the caller decides whether to continue.
    pub fn apply(&mut self, record: TraceRecord) -> Result<(), AddressOutOfRange> {
        match record.op {
            TraceOp::Access { address, write } => {
                let process = self.process(record.pid);
                process.access(&mut self.manager, address, write)?;
            }
            TraceOp::Terminate => {
                if let Some(process) = self.processes.remove(&record.pid) {
                    self.manager.release(&process);
                    debug!(pid = %record.pid, "process terminated");
                }
            }
        }
        Ok(())
    }

    /// Looks up `pid`, creating the process on first reference.
    fn process(&mut self, pid: ProcessId) -> ProcessHandle {
        self.processes
            .entry(pid)
            .or_insert_with(|| {
                debug!(%pid, "process entered simulation");
                ProcessHandle::new(pid, &self.config)
            })
            .clone()
    }

    /// The machine dimensions this run was built with.
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// The memory manager, for frame and pool inspection.
    pub fn manager(&self) -> &MemoryManager {
        &self.manager
    }

    /// Snapshot of the run-wide fault and reference counters.
    pub fn stats(&self) -> PoolStats {
        self.manager.stats()
    }

    /// Handles to the processes still alive, in id order so reports are
    /// deterministic.
    pub fn processes(&self) -> Vec<ProcessHandle> {
        let mut processes: Vec<ProcessHandle> = self.processes.values().cloned().collect();
        processes.sort_by_key(ProcessHandle::id);
        processes
    }
}
