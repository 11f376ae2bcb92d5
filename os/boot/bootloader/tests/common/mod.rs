//! A sandbox board: one vector of "RAM" at a fake physical base, a fake
//! image extent inside it, and a record of reset requests.

#![allow(dead_code)]

use boot_addresses::{MemoryRegion, PhysicalAddress};
use boot_console::mock::ScriptedSerial;
use boot_info::BootConfig;
use bootloader::{ImageExtent, MemoryError, PhysicalMemory, Platform, Shell};
use log::LevelFilter;

pub const RAM_BASE: u64 = 0x10_0000;
pub const RAM_LEN: u64 = 0x10_0000;

pub const IMAGE_BASE: u64 = 0x10_0000;
pub const IMAGE_LEN: u64 = 0x1000;
pub const IMAGE_ENTRY: u64 = IMAGE_BASE + 0x40;

pub const LOAD_BASE: u64 = 0x11_0000;
pub const LOAD_LEN: u64 = 0x1_0000;

pub const ARCHIVE_BASE: u64 = 0x18_0000;
pub const ARCHIVE_LEN: u64 = 0x1_0000;

pub const DEVICE_TREE: u64 = 0x1F_0000;

pub fn region(start: u64, len: u64) -> MemoryRegion {
    MemoryRegion::new(PhysicalAddress::new(start), len).unwrap()
}

pub fn config() -> BootConfig {
    BootConfig {
        archive: region(ARCHIVE_BASE, ARCHIVE_LEN),
        kernel_load: region(LOAD_BASE, LOAD_LEN),
        device_tree: PhysicalAddress::new(DEVICE_TREE),
        ram: region(RAM_BASE, RAM_LEN),
        host_name: "rpi3",
        line_capacity: 64,
        log_level: LevelFilter::Off,
        reboot_ticks: 1,
    }
}

pub struct Sandbox {
    bytes: Vec<u8>,
    image: ImageExtent,
    pub resets: Vec<u32>,
}

impl Sandbox {
    pub fn new() -> Self {
        Self {
            bytes: vec![0; RAM_LEN as usize],
            image: ImageExtent::new(
                PhysicalAddress::new(IMAGE_BASE),
                PhysicalAddress::new(IMAGE_BASE + IMAGE_LEN - 1),
                PhysicalAddress::new(IMAGE_ENTRY),
            ),
            resets: Vec::new(),
        }
    }

    fn offset(&self, region: MemoryRegion) -> Result<usize, MemoryError> {
        if !config().ram.contains_region(&region) {
            return Err(MemoryError::Unmapped { region });
        }
        Ok((region.start().as_u64() - RAM_BASE) as usize)
    }

    pub fn fill(&mut self, at: u64, data: &[u8]) {
        let start = (at - RAM_BASE) as usize;
        self.bytes[start..start + data.len()].copy_from_slice(data);
    }

    pub fn read(&self, at: u64, len: usize) -> &[u8] {
        let start = (at - RAM_BASE) as usize;
        &self.bytes[start..start + len]
    }
}

impl PhysicalMemory for Sandbox {
    fn memory(&self, region: MemoryRegion) -> Result<&[u8], MemoryError> {
        let start = self.offset(region)?;
        Ok(&self.bytes[start..start + region.len() as usize])
    }

    fn memory_mut(&mut self, region: MemoryRegion) -> Result<&mut [u8], MemoryError> {
        let start = self.offset(region)?;
        Ok(&mut self.bytes[start..start + region.len() as usize])
    }
}

impl Platform for Sandbox {
    fn image(&self) -> ImageExtent {
        self.image
    }

    fn reset(&mut self, ticks: u32) {
        self.resets.push(ticks);
    }
}

/// A shell over the sandbox with `archive` placed at the archive base and
/// `input` queued on the serial line.
pub fn shell(archive: &[u8], input: &[u8]) -> Shell<ScriptedSerial, Sandbox> {
    shell_with(input, |sandbox| sandbox.fill(ARCHIVE_BASE, archive))
}

/// A shell over a sandbox prepared by `setup`.
pub fn shell_with(
    input: &[u8],
    setup: impl FnOnce(&mut Sandbox),
) -> Shell<ScriptedSerial, Sandbox> {
    let mut sandbox = Sandbox::new();
    setup(&mut sandbox);
    Shell::new(ScriptedSerial::with_input(input), sandbox, config())
}

/// Everything written to the console so far.
pub fn output(shell: &Shell<ScriptedSerial, Sandbox>) -> String {
    shell.serial().output_lossy()
}
