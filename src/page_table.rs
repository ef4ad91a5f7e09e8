//! Per-process page tables.

use crate::config::SimConfig;
use crate::frame::FrameIndex;
use thiserror::Error;

/// A virtual page number, `0..V`.
pub type VirtualPage = usize;

/// A reference fell past the end of the virtual address space.
///
/// This is a programming or input error: the offending reference is
/// abandoned and the error propagates to the caller. Nothing is clamped and
/// no counter moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("address {address} maps to virtual page {page}, but only pages 0..{limit} exist")]
pub struct AddressOutOfRange {
    /// The offending logical address.
    pub address: u64,
    /// The virtual page the address decomposes to.
    pub page: VirtualPage,
    /// Number of virtual pages in the address space.
    pub limit: usize,
}

/// One virtual page's mapping state.
#[derive(Debug, Clone, Copy, Default)]
struct PageTableEntry {
    /// Whether `frame` is currently authoritative for this page.
    valid: bool,
    /// Set on the first write during the current residency.
    dirty: bool,
    /// Physical frame backing this page; meaningful only while `valid`.
    frame: FrameIndex,
}

/// Maps one process's virtual pages onto physical frames.
///
/// Entries cycle between invalid and valid for the life of the process:
/// a fault makes a page valid, an eviction or the owner's termination makes
/// it invalid again.
#[derive(Debug)]
pub struct PageTable {
    /// Page size in address units, for address decomposition.
    page_size: u64,
    /// One entry per virtual page.
    entries: Vec<PageTableEntry>,
}

impl PageTable {
    /// Creates an all-invalid table sized for `config`'s address space.
    pub(crate) fn new(config: &SimConfig) -> Self {
        Self {
            page_size: config.page_size,
            entries: vec![PageTableEntry::default(); config.virtual_pages],
        }
    }

    /// Decomposes a logical address into its virtual page number.
    ///
    /// # Errors
    ///
    /// [`AddressOutOfRange`] if the page falls past the address space.
    pub(crate) fn page_of(&self, address: u64) -> Result<VirtualPage, AddressOutOfRange> {
        let page = (address / self.page_size) as VirtualPage;
        if page >= self.entries.len() {
            return Err(AddressOutOfRange {
                address,
                page,
                limit: self.entries.len(),
            });
        }
        Ok(page)
    }

    /// The frame mapped for `page`, if the mapping is currently valid.
    pub(crate) fn frame_of(&self, page: VirtualPage) -> Option<FrameIndex> {
        let entry = &self.entries[page];
        entry.valid.then_some(entry.frame)
    }

    /// Records a freshly faulted-in mapping.
    ///
    /// The page comes in clean: dirty state tracks writes during a single
    /// residency, so an earlier residency's writes do not leak into this
    /// one's eviction verdict.
    pub(crate) fn install(&mut self, page: VirtualPage, frame: FrameIndex) {
        let entry = &mut self.entries[page];
        entry.valid = true;
        entry.dirty = false;
        entry.frame = frame;
    }

    /// Marks `page` written. The flag is sticky until the page is evicted;
    /// nothing in the simulation ever flushes it.
    pub(crate) fn mark_dirty(&mut self, page: VirtualPage) {
        self.entries[page].dirty = true;
    }

    /// Invalidates whichever entry currently maps `frame`.
    ///
    /// Returns the invalidated page's dirty flag, telling the caller whether
    /// a real system would have had to write the page back. Returns `false`
    /// when no valid entry names `frame`: callers invalidate defensively,
    /// and a miss is a no-op signal rather than an error.
    pub(crate) fn invalidate(&mut self, frame: FrameIndex) -> bool {
        for entry in &mut self.entries {
            if entry.valid && entry.frame == frame {
                entry.valid = false;
                return entry.dirty;
            }
        }
        false
    }

    /// Currently valid `(virtual page, frame)` mappings, in page order.
    pub(crate) fn mappings(&self) -> Vec<(VirtualPage, FrameIndex)> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.valid)
            .map(|(page, entry)| (page, entry.frame))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> PageTable {
        PageTable::new(&SimConfig::default())
    }

    #[test]
    fn address_decomposition() {
        let table = table();
        assert_eq!(table.page_of(0).unwrap(), 0);
        assert_eq!(table.page_of(31).unwrap(), 0);
        assert_eq!(table.page_of(32).unwrap(), 1);
        assert_eq!(table.page_of(127 * 32 + 31).unwrap(), 127);
    }

    #[test]
    fn address_past_the_last_page_is_rejected() {
        let table = table();
        let err = table.page_of(128 * 32).unwrap_err();
        assert_eq!(
            err,
            AddressOutOfRange {
                address: 4096,
                page: 128,
                limit: 128,
            }
        );
    }

    #[test]
    fn invalidate_misses_are_not_dirty() {
        let mut table = table();
        assert!(!table.invalidate(0));

        table.install(3, 2);
        table.mark_dirty(3);
        // Entry maps frame 2, not frame 1.
        assert!(!table.invalidate(1));
        assert!(table.invalidate(2));
        // Already invalid now.
        assert!(!table.invalidate(2));
    }

    #[test]
    fn reinstall_clears_the_previous_residency_dirty_bit() {
        let mut table = table();
        table.install(5, 0);
        table.mark_dirty(5);
        assert!(table.invalidate(0));

        table.install(5, 1);
        assert!(!table.invalidate(1));
    }
}
