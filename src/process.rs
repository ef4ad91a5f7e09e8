//! Processes and the shared handles held by the registry and the pool.

use crate::config::SimConfig;
use crate::frame::FrameIndex;
use crate::manager::MemoryManager;
use crate::page_table::{AddressOutOfRange, PageTable, VirtualPage};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// External process identifier, unique while the process is alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProcessId(u32);

impl ProcessId {
    /// Wraps a raw trace process number.
    pub fn new(id: u32) -> Self {
        Self(id)
    }
}

impl From<ProcessId> for u32 {
    fn from(id: ProcessId) -> Self {
        id.0
    }
}

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A simulated process: an external id plus exclusive ownership of one page
/// table.
#[derive(Debug)]
pub(crate) struct Process {
    /// The external id the trace refers to this process by.
    id: ProcessId,
    /// This process's private address mapping.
    page_table: PageTable,
}

/// A cloneable, shared handle to a process.
///
/// Both the process registry and every frame the process occupies hold one
/// of these, so the pool can notify the owner's page table directly when one
/// of its frames is reclaimed.
#[derive(Debug, Clone)]
pub struct ProcessHandle {
    /// Single-threaded shared ownership of the process.
    inner: Rc<RefCell<Process>>,
}

impl ProcessHandle {
    /// Creates a fresh process with an all-invalid page table.
    ///
    /// `config` is assumed validated; the pool or simulation it came from
    /// rejected degenerate dimensions at construction.
    pub fn new(id: ProcessId, config: &SimConfig) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Process {
                id,
                page_table: PageTable::new(config),
            })),
        }
    }

    /// The external id the trace refers to this process by.
    pub fn id(&self) -> ProcessId {
        self.inner.borrow().id
    }

    /// Whether two handles name the same live process.
    pub fn is_same(&self, other: &ProcessHandle) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Simulates one memory reference at `address`.
    ///
    /// Translates through the page table, faulting a frame in if the page
    /// has no valid mapping, then touches the frame so the policy sees the
    /// reference. Returns the physical frame backing the address.
    ///
    /// # Errors
    ///
    /// [`AddressOutOfRange`] if the address falls past the virtual address
    /// space. The reference is abandoned: no fault is resolved and no
    /// counter moves.
    pub fn access(
        &self,
        manager: &mut MemoryManager,
        address: u64,
        write: bool,
    ) -> Result<FrameIndex, AddressOutOfRange> {
        let (vpage, mapped) = {
            let process = self.inner.borrow();
            let vpage = process.page_table.page_of(address)?;
            (vpage, process.page_table.frame_of(vpage))
        };

        let frame = match mapped {
            Some(frame) => frame,
            None => {
                // No borrow may be live here: resolving the fault can evict
                // one of our own frames, which loops back into this table.
                let frame = manager.handle_fault(self, vpage);
                self.inner.borrow_mut().page_table.install(vpage, frame);
                frame
            }
        };

        if write {
            self.inner.borrow_mut().page_table.mark_dirty(vpage);
        }

        manager.touch(frame);

        Ok(frame)
    }

    /// Marks whichever of this process's pages maps `frame` invalid,
    /// returning whether the evicted page had been written during its
    /// residency. `false` when no valid entry names the frame.
    pub fn invalidate_frame(&self, frame: FrameIndex) -> bool {
        self.inner.borrow_mut().page_table.invalidate(frame)
    }

    /// Currently valid `(virtual page, frame)` mappings, in page order.
    pub fn mappings(&self) -> Vec<(VirtualPage, FrameIndex)> {
        self.inner.borrow().page_table.mappings()
    }
}
