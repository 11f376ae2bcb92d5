//! # Serial Image Loader
//!
//! The host sends the image size as decimal text at a prompt, then exactly
//! that many raw bytes. Bytes are stored at the kernel load address as they
//! arrive, with no echo, while an 8-bit truncating sum accumulates.
//!
//! The sum is only reported. Nothing compares it with an expected value;
//! the operator does that against `cpio-pack --checksum`. A host that sends
//! fewer bytes than announced leaves the loader waiting until reset.

use crate::error::{CommandError, MemoryError};
use crate::platform::ImageExtent;
use boot_addresses::{MemoryRegion, PhysicalAddress};
use boot_console::Serial;
use boot_info::BootConfig;
use core::fmt;

/// Truncating 8-bit sum of a byte stream.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
pub struct Checksum(u8);

impl Checksum {
    #[must_use]
    pub const fn new() -> Self {
        Self(0)
    }

    #[must_use]
    pub fn of(bytes: &[u8]) -> Self {
        let mut sum = Self::new();
        sum.extend(bytes);
        sum
    }

    #[inline]
    pub const fn update(&mut self, byte: u8) {
        self.0 = self.0.wrapping_add(byte);
    }

    pub fn extend(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.update(b);
        }
    }

    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }
}

/// `10 (0x0A)`
impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (0x{:02X})", self.0, self.0)
    }
}

/// Where an image of a given size goes.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct LoadPlan {
    target: MemoryRegion,
}

impl LoadPlan {
    /// Check that `size` bytes fit in the kernel load region without
    /// touching the running bootloader.
    ///
    /// # Errors
    /// * [`CommandError::EmptyImage`] for a size of zero
    /// * [`CommandError::ImageTooLarge`] if the load region is too small
    /// * [`MemoryError::OverlapsImage`] if the bootloader has not been
    ///   relocated out of the way
    pub fn new(size: u64, config: &BootConfig, image: &ImageExtent) -> Result<Self, CommandError> {
        if size == 0 {
            return Err(CommandError::EmptyImage);
        }
        if size > config.kernel_load.len() {
            return Err(CommandError::ImageTooLarge {
                size,
                region: config.kernel_load,
            });
        }

        let target = MemoryRegion::new(config.kernel_load.start(), size)?;
        let image = image.region()?;
        if target.overlaps(&image) {
            return Err(MemoryError::OverlapsImage {
                region: target,
                image,
            }
            .into());
        }

        Ok(Self { target })
    }

    #[must_use]
    pub const fn target(&self) -> MemoryRegion {
        self.target
    }

    /// The image is entered at its first byte.
    #[must_use]
    pub const fn entry(&self) -> PhysicalAddress {
        self.target.start()
    }
}

/// Fill `dest` from the serial line, one blocking read per byte.
pub fn receive<S: Serial + ?Sized>(serial: &mut S, dest: &mut [u8]) -> Checksum {
    let mut sum = Checksum::new();
    for slot in dest {
        let byte = serial.read_byte();
        *slot = byte;
        sum.update(byte);
    }
    sum
}

#[cfg(test)]
mod tests {
    use super::*;
    use boot_console::mock::ScriptedSerial;

    fn running_at(start: u64, len: u64) -> ImageExtent {
        ImageExtent::new(
            PhysicalAddress::new(start),
            PhysicalAddress::new(start + len - 1),
            PhysicalAddress::new(start),
        )
    }

    #[test]
    fn checksum_wraps() {
        let mut bytes: Vec<u8> = (1..=255).collect();
        bytes.extend([0, 1]);
        assert_eq!(Checksum::of(&bytes).value(), 129);

        bytes.reverse();
        assert_eq!(Checksum::of(&bytes).value(), 129);
    }

    #[test]
    fn checksum_display() {
        assert_eq!(Checksum::of(&[1, 2, 3, 4]).to_string(), "10 (0x0A)");
        assert_eq!(Checksum::new().to_string(), "0 (0x00)");
    }

    #[test]
    fn receive_stores_and_sums() {
        let mut serial = ScriptedSerial::with_input(&[1, 2, 3, 4, 99]);
        let mut dest = [0u8; 4];
        let sum = receive(&mut serial, &mut dest);
        assert_eq!(dest, [1, 2, 3, 4]);
        assert_eq!(sum.value(), 10);
        assert_eq!(serial.remaining_input(), 1);
        assert!(serial.output().is_empty());
    }

    #[test]
    fn plan_bounds() {
        let cfg = BootConfig::rpi3();
        let relocated = running_at(0x3000_0000, 0x4000);

        let plan = LoadPlan::new(4, &cfg, &relocated).unwrap();
        assert_eq!(plan.entry(), PhysicalAddress::new(0x8_0000));
        assert_eq!(plan.target().len(), 4);

        assert_eq!(LoadPlan::new(0, &cfg, &relocated), Err(CommandError::EmptyImage));
        assert!(LoadPlan::new(cfg.kernel_load.len(), &cfg, &relocated).is_ok());
        assert!(matches!(
            LoadPlan::new(cfg.kernel_load.len() + 1, &cfg, &relocated),
            Err(CommandError::ImageTooLarge { .. })
        ));
    }

    #[test]
    fn plan_refuses_to_overwrite_the_running_image() {
        let cfg = BootConfig::rpi3();
        let unrelocated = running_at(0x8_0000, 0x4000);
        assert!(matches!(
            LoadPlan::new(16, &cfg, &unrelocated),
            Err(CommandError::Memory(MemoryError::OverlapsImage { .. }))
        ));
    }
}
