//! # Physical Addresses and Memory Regions
//!
//! Strongly typed wrappers for the raw physical addresses the bootloader
//! works with: the archive base, the kernel load address, the device tree
//! pointer and the extent of the running bootloader image.
//!
//! ## Overview
//!
//! There is no MMU translation in play while the bootloader runs; every
//! address is physical. The types here still keep "an address" and "a length"
//! apart, and make every derived address go through checked arithmetic so
//! that operator-supplied values cannot silently wrap around.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`PhysicalAddress`] | A raw 64-bit physical address. |
//! | [`MemoryRegion`] | A half-open range `[start, start + len)` of physical memory. |
//!
//! ## Alignment
//!
//! [`align_up`] and [`checked_align_up`] round a value up to the next
//! multiple of a power-of-two alignment. The archive reader uses them to step
//! over the 4-byte padding between `newc` records.
//!
//! ```rust
//! # use boot_addresses::*;
//! let region = MemoryRegion::new(PhysicalAddress::new(0x8_0000), 0x1000).unwrap();
//! assert!(region.contains(PhysicalAddress::new(0x8_0fff)));
//! assert!(!region.contains(region.end()));
//!
//! assert_eq!(align_up(0x8_0001, 4), 0x8_0004);
//! assert_eq!(align_up(0x8_0004, 4), 0x8_0004);
//! ```

#![cfg_attr(not(any(test, doctest)), no_std)]
#![allow(clippy::inline_always)]

mod memory_region;
mod physical_address;

pub use memory_region::{MemoryRegion, RegionError};
pub use physical_address::PhysicalAddress;

/// Round `value` up to the next multiple of `align`.
///
/// `align` must be a power of two. Wraps on overflow; use
/// [`checked_align_up`] for untrusted input.
#[inline]
#[must_use]
pub const fn align_up(value: u64, align: u64) -> u64 {
    debug_assert!(align.is_power_of_two());
    let mask = align - 1;
    value.wrapping_add(mask) & !mask
}

/// Round `value` up to the next multiple of `align`, or `None` if that
/// would overflow `usize` or `align` is not a power of two.
#[inline]
#[must_use]
pub const fn checked_align_up(value: usize, align: usize) -> Option<usize> {
    if !align.is_power_of_two() {
        return None;
    }
    let mask = align - 1;
    match value.checked_add(mask) {
        Some(v) => Some(v & !mask),
        None => None,
    }
}
