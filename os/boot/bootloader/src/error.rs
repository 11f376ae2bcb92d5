use crate::dtb::FdtError;
use crate::input::NumberError;
use boot_addresses::{MemoryRegion, PhysicalAddress, RegionError};
use cpio_newc::ArchiveError;

/// A physical memory access the platform refuses.
#[derive(Debug, Copy, Clone, Eq, PartialEq, thiserror::Error)]
pub enum MemoryError {
    #[error("{region} is outside accessible memory")]
    Unmapped { region: MemoryRegion },
    #[error("{region} overlaps the running bootloader at {image}")]
    OverlapsImage {
        region: MemoryRegion,
        image: MemoryRegion,
    },
    #[error(transparent)]
    Region(#[from] RegionError),
}

/// Why a command did not complete. Every variant is reported to the
/// operator as one console line, after which the shell prompts again.
#[derive(Debug, Copy, Clone, Eq, PartialEq, thiserror::Error)]
pub enum CommandError {
    #[error("No such file or directory")]
    NotFound,
    #[error("corrupt archive: {0}")]
    CorruptArchive(#[from] ArchiveError),
    #[error("invalid number: {0}")]
    InvalidNumber(#[from] NumberError),
    #[error(transparent)]
    Memory(#[from] MemoryError),
    #[error("image of {size} bytes does not fit in {region}")]
    ImageTooLarge { size: u64, region: MemoryRegion },
    #[error("refusing to load an empty image")]
    EmptyImage,
    #[error("relocation target {dest} is not aligned to {align:#x} bytes")]
    Misaligned { dest: PhysicalAddress, align: u64 },
    #[error("bad device tree: {0}")]
    BadDeviceTree(#[from] FdtError),
}

impl From<RegionError> for CommandError {
    fn from(e: RegionError) -> Self {
        Self::Memory(MemoryError::Region(e))
    }
}
