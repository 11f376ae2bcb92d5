//! # Platform Boundary
//!
//! Everything the shell needs from the machine beyond the serial line. The
//! board implements these traits over raw physical memory; host-side tests
//! implement them over a byte vector standing in for RAM.
//!
//! The one operation that cannot be modeled here is the final jump. The
//! shell instead returns a [`Handoff`] and the board's entry code performs
//! the transfer.

use crate::error::MemoryError;
use boot_addresses::{MemoryRegion, PhysicalAddress, RegionError};

/// Byte access to physical memory.
pub trait PhysicalMemory {
    /// Borrow `region` for reading.
    ///
    /// # Errors
    /// [`MemoryError::Unmapped`] if any byte of `region` is not backed by
    /// accessible memory.
    fn memory(&self, region: MemoryRegion) -> Result<&[u8], MemoryError>;

    /// Borrow `region` for writing.
    ///
    /// # Errors
    /// As for [`memory`](Self::memory).
    fn memory_mut(&mut self, region: MemoryRegion) -> Result<&mut [u8], MemoryError>;
}

pub trait Platform: PhysicalMemory {
    /// Extent and entry point of the running bootloader.
    fn image(&self) -> ImageExtent;

    /// Arm a board reset after `ticks` watchdog ticks.
    fn reset(&mut self, ticks: u32);
}

/// Where the running bootloader lives, from its first byte to the last byte
/// of its zero-initialized data.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct ImageExtent {
    start: PhysicalAddress,
    last: PhysicalAddress,
    entry: PhysicalAddress,
}

impl ImageExtent {
    /// `last` is the final byte of the image (inclusive), `entry` the
    /// address execution starts at.
    #[must_use]
    pub const fn new(
        start: PhysicalAddress,
        last: PhysicalAddress,
        entry: PhysicalAddress,
    ) -> Self {
        Self { start, last, entry }
    }

    #[must_use]
    pub const fn start(&self) -> PhysicalAddress {
        self.start
    }

    #[must_use]
    pub const fn entry(&self) -> PhysicalAddress {
        self.entry
    }

    /// Every byte of the image, `[start, last]`.
    ///
    /// # Errors
    /// The bounds are inverted or wrap.
    pub const fn region(&self) -> Result<MemoryRegion, RegionError> {
        MemoryRegion::from_inclusive(self.start, self.last)
    }

    /// Distance of the entry point from the start of the image; preserved
    /// when the image moves. `None` if the entry lies below the start.
    #[must_use]
    pub const fn entry_offset(&self) -> Option<u64> {
        self.entry.offset_from(self.start)
    }
}

/// Where execution continues once the shell is done.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Handoff {
    /// Enter the relocated copy of the bootloader.
    Relocated {
        entry: PhysicalAddress,
        device_tree: PhysicalAddress,
    },
    /// Enter a kernel image received over the serial line.
    Kernel {
        entry: PhysicalAddress,
        device_tree: PhysicalAddress,
    },
}

impl Handoff {
    #[must_use]
    pub const fn entry(&self) -> PhysicalAddress {
        match self {
            Self::Relocated { entry, .. } | Self::Kernel { entry, .. } => *entry,
        }
    }

    /// Passed in `x0`, as the firmware passes it to us.
    #[must_use]
    pub const fn device_tree(&self) -> PhysicalAddress {
        match self {
            Self::Relocated { device_tree, .. } | Self::Kernel { device_tree, .. } => *device_tree,
        }
    }
}
