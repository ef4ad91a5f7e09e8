//! Dimensions of the simulated machine and the policy selector.

use clap::ValueEnum;
use std::fmt;
use thiserror::Error;

/// Frame count when none is given on the command line.
pub const DEFAULT_FRAMES: usize = 4;

/// Virtual pages per process when none is given on the command line.
pub const DEFAULT_VIRTUAL_PAGES: usize = 128;

/// Page size in address units when none is given on the command line.
pub const DEFAULT_PAGE_SIZE: u64 = 32;

/// Which page-replacement policy the simulator runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum PolicyKind {
    /// Evict the frame that was faulted in earliest.
    #[default]
    Fifo,
    /// Evict the frame that has gone unreferenced longest.
    Lru,
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicyKind::Fifo => write!(f, "fifo"),
            PolicyKind::Lru => write!(f, "lru"),
        }
    }
}

/// Everything the simulator needs to know about the machine it models.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimConfig {
    /// Number of physical frames in the shared pool.
    pub frames: usize,
    /// Number of virtual pages in each process's address space.
    pub virtual_pages: usize,
    /// Page size in address units.
    pub page_size: u64,
    /// Replacement policy to run.
    pub policy: PolicyKind,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            frames: DEFAULT_FRAMES,
            virtual_pages: DEFAULT_VIRTUAL_PAGES,
            page_size: DEFAULT_PAGE_SIZE,
            policy: PolicyKind::default(),
        }
    }
}

impl SimConfig {
    /// Checks the configuration for degenerate dimensions.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if any dimension is zero. A pool with no
    /// frames has no victim to select, and a zero page size or empty
    /// address space makes translation undefined.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.frames == 0 {
            return Err(ConfigError::NoFrames);
        }
        if self.virtual_pages == 0 {
            return Err(ConfigError::NoVirtualPages);
        }
        if self.page_size == 0 {
            return Err(ConfigError::ZeroPageSize);
        }
        Ok(())
    }
}

/// A configuration the simulator refuses to construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The frame pool must hold at least one frame.
    #[error("frame pool requires at least one frame")]
    NoFrames,
    /// Each process needs a nonempty virtual address space.
    #[error("virtual address space requires at least one page")]
    NoVirtualPages,
    /// Address-to-page decomposition divides by the page size.
    #[error("page size must be at least one address unit")]
    ZeroPageSize,
}
