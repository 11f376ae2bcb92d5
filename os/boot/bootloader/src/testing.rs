//! Vec-backed stand-in for physical memory.

use crate::error::MemoryError;
use crate::platform::PhysicalMemory;
use boot_addresses::{MemoryRegion, PhysicalAddress};

pub struct SandboxRam {
    base: u64,
    bytes: Vec<u8>,
}

impl SandboxRam {
    pub fn new(base: u64, len: usize) -> Self {
        Self {
            base,
            bytes: vec![0; len],
        }
    }

    fn range(&self, region: MemoryRegion) -> Result<core::ops::Range<usize>, MemoryError> {
        let start = region
            .start()
            .offset_from(PhysicalAddress::new(self.base))
            .and_then(|o| usize::try_from(o).ok());
        let len = usize::try_from(region.len()).ok();
        match (start, len) {
            (Some(start), Some(len)) if start + len <= self.bytes.len() => Ok(start..start + len),
            _ => Err(MemoryError::Unmapped { region }),
        }
    }

    pub fn fill(&mut self, at: PhysicalAddress, data: &[u8]) {
        let region = MemoryRegion::new(at, data.len() as u64).unwrap();
        let range = self.range(region).unwrap();
        self.bytes[range].copy_from_slice(data);
    }

    pub fn read(&self, at: PhysicalAddress, len: usize) -> Vec<u8> {
        let region = MemoryRegion::new(at, len as u64).unwrap();
        self.bytes[self.range(region).unwrap()].to_vec()
    }
}

impl PhysicalMemory for SandboxRam {
    fn memory(&self, region: MemoryRegion) -> Result<&[u8], MemoryError> {
        Ok(&self.bytes[self.range(region)?])
    }

    fn memory_mut(&mut self, region: MemoryRegion) -> Result<&mut [u8], MemoryError> {
        let range = self.range(region)?;
        Ok(&mut self.bytes[range])
    }
}
