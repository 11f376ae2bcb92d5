//! # Self-Relocation
//!
//! Relocation happens in two phases:
//!
//! 1. [`RelocationPlan::execute`] copies the image, `[start, last]` with both
//!    ends included, byte for byte in increasing address order. This phase
//!    is plain memory access and fully testable.
//! 2. The returned entry address (`dest + (entry - start)`) is handed to the
//!    board's control-transfer primitive, which never returns.
//!
//! The forward copy is only correct when source and destination do not
//! overlap, so a plan that would overlap the running image is refused. The
//! destination must also keep the image's page alignment: code addresses
//! its data PC-relative at page granularity (`adrp`).
//!
//! Overlap of the copy, or of the stack it sets up below its new base, with
//! the archive, the kernel load region, the running stack or the firmware
//! page is the operator's call; it is logged, not refused.

use crate::error::{CommandError, MemoryError};
use crate::platform::{ImageExtent, PhysicalMemory};
use boot_addresses::{MemoryRegion, PhysicalAddress, RegionError};
use boot_info::BootConfig;
use boot_info::memory::{BOOT_STACK_SIZE, IMAGE_ALIGNMENT, RAM_START};
use core::fmt;

/// Bytes moved per step of [`copy_forward`].
const BOUNCE_LEN: usize = 256;

/// Copy `src` to `dest`, lowest address first.
///
/// Both ranges are checked before the first byte is written, so a refused
/// copy leaves memory untouched.
///
/// # Errors
/// Either range is not accessible memory.
pub fn copy_forward<M: PhysicalMemory + ?Sized>(
    memory: &mut M,
    src: MemoryRegion,
    dest: PhysicalAddress,
) -> Result<(), MemoryError> {
    let target = src.moved_to(dest)?;
    memory.memory(src)?;
    memory.memory_mut(target)?;

    let mut bounce = [0u8; BOUNCE_LEN];
    let mut done = 0;
    while done < src.len() {
        let step = (src.len() - done).min(BOUNCE_LEN as u64);
        #[allow(clippy::cast_possible_truncation)]
        let chunk = &mut bounce[..step as usize];

        let from = MemoryRegion::new(src.start() + done, step)?;
        chunk.copy_from_slice(memory.memory(from)?);

        let to = MemoryRegion::new(dest + done, step)?;
        memory.memory_mut(to)?.copy_from_slice(chunk);

        done += step;
    }

    Ok(())
}

/// The stack `_start` sets up below an image placed at `base`.
fn stack_below(base: PhysicalAddress) -> Option<MemoryRegion> {
    let len = base.as_u64().min(BOOT_STACK_SIZE);
    MemoryRegion::new(PhysicalAddress::new(base.as_u64() - len), len).ok()
}

/// Which part of the relocated copy an [`Overlap`] concerns.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Footprint {
    Image,
    Stack,
}

impl fmt::Display for Footprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Image => "image",
            Self::Stack => "stack",
        })
    }
}

/// A reserved region hit by the relocated copy.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Overlap {
    pub footprint: Footprint,
    pub reserved: &'static str,
    pub region: MemoryRegion,
}

impl Overlap {
    fn check(
        footprint: Footprint,
        covered: MemoryRegion,
        reserved: &'static str,
        region: MemoryRegion,
    ) -> Option<Self> {
        covered.overlaps(&region).then_some(Self {
            footprint,
            reserved,
            region,
        })
    }
}

/// A checked relocation of the running image to a new base.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct RelocationPlan {
    source: MemoryRegion,
    target: MemoryRegion,
    entry: PhysicalAddress,
}

impl RelocationPlan {
    /// Plan moving `image` to `dest`.
    ///
    /// # Errors
    /// * [`CommandError::Misaligned`] if `dest` breaks the image alignment
    /// * [`MemoryError::OverlapsImage`] if the copy would overwrite itself
    /// * [`MemoryError::Region`] if the target wraps around or the entry
    ///   point lies below the image
    pub fn new(image: &ImageExtent, dest: PhysicalAddress) -> Result<Self, CommandError> {
        if !dest.is_aligned(IMAGE_ALIGNMENT) {
            return Err(CommandError::Misaligned {
                dest,
                align: IMAGE_ALIGNMENT,
            });
        }

        let source = image.region()?;
        let target = source.moved_to(dest)?;
        if target.overlaps(&source) {
            return Err(MemoryError::OverlapsImage {
                region: target,
                image: source,
            }
            .into());
        }

        let offset = image.entry_offset().ok_or(RegionError::Inverted {
            start: image.start(),
            end: image.entry(),
        })?;
        let entry = dest.checked_add(offset).ok_or(RegionError::Overflow {
            start: dest,
            len: offset,
        })?;

        Ok(Self {
            source,
            target,
            entry,
        })
    }

    #[must_use]
    pub const fn target(&self) -> MemoryRegion {
        self.target
    }

    /// Entry point of the relocated image.
    #[must_use]
    pub const fn entry(&self) -> PhysicalAddress {
        self.entry
    }

    /// Reserved regions the relocated copy would overwrite, either with
    /// its image or with the stack it sets up below its new base.
    pub fn reserved_overlaps(
        &self,
        config: &BootConfig,
    ) -> impl Iterator<Item = Overlap> + use<> {
        let image = self.target;
        let stack = stack_below(self.target.start());
        let running_stack = stack_below(self.source.start());
        let firmware = MemoryRegion::new(PhysicalAddress::zero(), RAM_START).ok();

        let image_hits = [
            ("archive", Some(config.archive)),
            ("kernel load region", Some(config.kernel_load)),
            ("running stack", running_stack),
        ]
        .into_iter()
        .filter_map(move |(name, region)| {
            Overlap::check(Footprint::Image, image, name, region?)
        });

        let stack_hits = [
            ("archive", Some(config.archive)),
            ("kernel load region", Some(config.kernel_load)),
            ("firmware page", firmware),
        ]
        .into_iter()
        .filter_map(move |(name, region)| {
            Overlap::check(Footprint::Stack, stack?, name, region?)
        });

        image_hits.chain(stack_hits)
    }

    /// Phase one: copy the image. Returns the entry point to transfer
    /// control to.
    ///
    /// # Errors
    /// Source or target is not accessible memory; nothing was written.
    pub fn execute<M: PhysicalMemory + ?Sized>(
        &self,
        memory: &mut M,
    ) -> Result<PhysicalAddress, MemoryError> {
        log::info!(
            "relocating {} to {}, entry {}",
            self.source,
            self.target,
            self.entry
        );
        copy_forward(memory, self.source, self.target.start())?;
        Ok(self.entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::SandboxRam;

    fn image(start: u64, len: u64, entry: u64) -> ImageExtent {
        ImageExtent::new(
            PhysicalAddress::new(start),
            PhysicalAddress::new(start + len - 1),
            PhysicalAddress::new(entry),
        )
    }

    #[test]
    fn copies_every_byte_including_the_last() {
        let mut ram = SandboxRam::new(0x1_0000, 0x1_0000);
        let src = MemoryRegion::new(PhysicalAddress::new(0x1_0000), 0x301).unwrap();
        let pattern: Vec<u8> = (0..0x301u32).map(|i| (i * 7) as u8).collect();
        ram.fill(src.start(), &pattern);

        copy_forward(&mut ram, src, PhysicalAddress::new(0x1_8000)).unwrap();

        assert_eq!(ram.read(PhysicalAddress::new(0x1_8000), 0x301), pattern);
        assert_eq!(ram.read(PhysicalAddress::new(0x1_8301), 1), [0]);
    }

    #[test]
    fn refused_copy_writes_nothing() {
        let mut ram = SandboxRam::new(0x1_0000, 0x1000);
        let src = MemoryRegion::new(PhysicalAddress::new(0x1_0000), 0x100).unwrap();
        ram.fill(src.start(), &[0xAA; 0x100]);

        let err = copy_forward(&mut ram, src, PhysicalAddress::new(0x1_0F80)).unwrap_err();
        assert!(matches!(err, MemoryError::Unmapped { .. }));
        assert_eq!(ram.read(PhysicalAddress::new(0x1_0F80), 0x80), [0; 0x80]);
    }

    #[test]
    fn entry_keeps_its_offset() {
        let img = image(0x8_0000, 0x4000, 0x8_0340);
        let plan = RelocationPlan::new(&img, PhysicalAddress::new(0x1000_0000)).unwrap();
        assert_eq!(plan.entry(), PhysicalAddress::new(0x1000_0340));
        assert_eq!(plan.target().len(), 0x4000);
    }

    #[test]
    fn overlapping_target_is_refused() {
        let img = image(0x8_0000, 0x4000, 0x8_0000);
        for dest in [0x7_E000, 0x8_0000, 0x8_3000] {
            let err = RelocationPlan::new(&img, PhysicalAddress::new(dest)).unwrap_err();
            assert!(matches!(
                err,
                CommandError::Memory(MemoryError::OverlapsImage { .. })
            ));
        }
        // Adjacent on either side is fine.
        assert!(RelocationPlan::new(&img, PhysicalAddress::new(0x7_C000)).is_ok());
        assert!(RelocationPlan::new(&img, PhysicalAddress::new(0x8_4000)).is_ok());
    }

    #[test]
    fn misaligned_target_is_refused() {
        let img = image(0x8_0000, 0x100, 0x8_0000);
        let err = RelocationPlan::new(&img, PhysicalAddress::new(0x1000_0004)).unwrap_err();
        assert_eq!(
            err,
            CommandError::Misaligned {
                dest: PhysicalAddress::new(0x1000_0004),
                align: IMAGE_ALIGNMENT
            }
        );
    }

    #[test]
    fn entry_below_image_is_refused() {
        let img = ImageExtent::new(
            PhysicalAddress::new(0x8_0000),
            PhysicalAddress::new(0x8_3FFF),
            PhysicalAddress::new(0x7_F000),
        );
        let err = RelocationPlan::new(&img, PhysicalAddress::new(0x1000_0000)).unwrap_err();
        assert!(matches!(
            err,
            CommandError::Memory(MemoryError::Region(RegionError::Inverted { .. }))
        ));
    }

    fn hits(dest: u64) -> Vec<(Footprint, &'static str)> {
        let img = image(0x8_0000, 0x4000, 0x8_0000);
        let plan = RelocationPlan::new(&img, PhysicalAddress::new(dest)).unwrap();
        plan.reserved_overlaps(&BootConfig::rpi3())
            .map(|o| (o.footprint, o.reserved))
            .collect()
    }

    #[test]
    fn reports_reserved_overlaps() {
        assert_eq!(
            hits(0x2000_0000),
            [
                (Footprint::Image, "archive"),
                (Footprint::Stack, "kernel load region")
            ]
        );
        assert!(hits(0x3000_0000).is_empty());
        assert_eq!(hits(0x7_C000), [(Footprint::Image, "running stack")]);
    }

    #[test]
    fn reports_new_stack_overlapping_archive() {
        // Image lands just past the archive, its stack on the archive's tail.
        assert_eq!(hits(0x2100_0000), [(Footprint::Stack, "archive")]);
    }

    #[test]
    fn reports_new_stack_reaching_firmware_page() {
        assert_eq!(hits(0x1000), [(Footprint::Stack, "firmware page")]);
    }
}
