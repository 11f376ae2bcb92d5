//! # Boot Configuration
//!
//! The fixed constants of [`memory`](crate::memory) gathered into one value
//! that is injected into the command shell at start-up. Host-side tests build
//! their own [`BootConfig`] pointing at sandbox addresses instead.

use crate::memory;
use boot_addresses::{MemoryRegion, PhysicalAddress};
use log::LevelFilter;

/// Length of the command line buffer, including room for the terminator the
/// console protocol historically reserved.
pub const LINE_CAPACITY: usize = 64;

/// Watchdog ticks before the `reboot` command resets the board.
pub const REBOOT_TICKS: u32 = 1;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct BootConfig {
    /// Where the `newc` archive lives and how far traversal may go.
    pub archive: MemoryRegion,

    /// Region a received kernel image is written to; its start is the
    /// address control is transferred to after `load`.
    pub kernel_load: MemoryRegion,

    /// Flattened device tree header inspected by `dtp`.
    pub device_tree: PhysicalAddress,

    /// Memory the shell may read (`showmem`) or write (`relo`, `load`).
    pub ram: MemoryRegion,

    /// Shown in the prompt as `user@<host_name>:~$ `.
    pub host_name: &'static str,

    /// Maximum number of bytes kept from one input line.
    pub line_capacity: usize,

    pub log_level: LevelFilter,

    pub reboot_ticks: u32,
}

const fn region(start: u64, len: u64) -> MemoryRegion {
    match MemoryRegion::new(PhysicalAddress::new(start), len) {
        Ok(region) => region,
        Err(_) => panic!("memory layout constant wraps around"),
    }
}

impl BootConfig {
    /// The Raspberry Pi 3 layout.
    #[must_use]
    pub const fn rpi3() -> Self {
        Self {
            archive: region(memory::INITRAMFS_BASE, memory::INITRAMFS_SIZE_LIMIT),
            kernel_load: region(
                memory::KERNEL_LOAD_ADDRESS,
                memory::KERNEL_LOAD_LIMIT - memory::KERNEL_LOAD_ADDRESS,
            ),
            device_tree: PhysicalAddress::new(memory::DEVICE_TREE_BASE),
            ram: region(memory::RAM_START, memory::RAM_END - memory::RAM_START),
            host_name: "rpi3",
            line_capacity: LINE_CAPACITY,
            log_level: LevelFilter::Info,
            reboot_ticks: REBOOT_TICKS,
        }
    }

    /// Use the device tree the firmware handed over, if any.
    #[must_use]
    pub const fn with_device_tree(mut self, dtb: PhysicalAddress) -> Self {
        if dtb.as_u64() != 0 {
            self.device_tree = dtb;
        }
        self
    }

    /// Address control is transferred to after a successful `load`.
    #[must_use]
    pub const fn kernel_entry(&self) -> PhysicalAddress {
        self.kernel_load.start()
    }
}

impl Default for BootConfig {
    fn default() -> Self {
        Self::rpi3()
    }
}
