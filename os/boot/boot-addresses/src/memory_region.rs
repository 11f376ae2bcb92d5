use crate::PhysicalAddress;
use core::fmt;

#[derive(Debug, Copy, Clone, Eq, PartialEq, thiserror::Error)]
pub enum RegionError {
    #[error("region at {start} with length {len:#x} wraps around the address space")]
    Overflow { start: PhysicalAddress, len: u64 },
    #[error("region end {end} lies below its start {start}")]
    Inverted {
        start: PhysicalAddress,
        end: PhysicalAddress,
    },
}

/// A half-open range `[start, start + len)` of physical memory.
///
/// The end is guaranteed not to wrap, so [`end`](Self::end) never overflows.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct MemoryRegion {
    start: PhysicalAddress,
    len: u64,
}

impl MemoryRegion {
    /// Create a region of `len` bytes starting at `start`.
    ///
    /// # Errors
    /// [`RegionError::Overflow`] if `start + len` does not fit in 64 bits.
    pub const fn new(start: PhysicalAddress, len: u64) -> Result<Self, RegionError> {
        if start.checked_add(len).is_none() {
            return Err(RegionError::Overflow { start, len });
        }
        Ok(Self { start, len })
    }

    /// Create the region covering `[start, last]`, both ends included.
    ///
    /// # Errors
    /// [`RegionError::Inverted`] if `last < start`, [`RegionError::Overflow`]
    /// if `last` is the very last addressable byte.
    pub const fn from_inclusive(
        start: PhysicalAddress,
        last: PhysicalAddress,
    ) -> Result<Self, RegionError> {
        let Some(span) = last.offset_from(start) else {
            return Err(RegionError::Inverted { start, end: last });
        };
        let Some(len) = span.checked_add(1) else {
            return Err(RegionError::Overflow { start, len: span });
        };
        Self::new(start, len)
    }

    #[inline]
    #[must_use]
    pub const fn start(&self) -> PhysicalAddress {
        self.start
    }

    #[inline]
    #[must_use]
    pub const fn len(&self) -> u64 {
        self.len
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// First address past the region.
    #[inline]
    #[must_use]
    pub const fn end(&self) -> PhysicalAddress {
        PhysicalAddress::new(self.start.as_u64() + self.len)
    }

    #[inline]
    #[must_use]
    pub const fn contains(&self, addr: PhysicalAddress) -> bool {
        addr.as_u64() >= self.start.as_u64() && addr.as_u64() < self.end().as_u64()
    }

    /// Whether `other` lies entirely within `self`.
    #[inline]
    #[must_use]
    pub const fn contains_region(&self, other: &Self) -> bool {
        other.start.as_u64() >= self.start.as_u64() && other.end().as_u64() <= self.end().as_u64()
    }

    /// Whether the two regions share at least one byte.
    #[inline]
    #[must_use]
    pub const fn overlaps(&self, other: &Self) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        self.start.as_u64() < other.end().as_u64() && other.start.as_u64() < self.end().as_u64()
    }

    /// Same length, different start.
    ///
    /// # Errors
    /// [`RegionError::Overflow`] if the moved region would wrap.
    pub const fn moved_to(&self, start: PhysicalAddress) -> Result<Self, RegionError> {
        Self::new(start, self.len)
    }
}

impl fmt::Debug for MemoryRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}..{})", self.start, self.end())
    }
}

impl fmt::Display for MemoryRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region(start: u64, len: u64) -> MemoryRegion {
        MemoryRegion::new(PhysicalAddress::new(start), len).unwrap()
    }

    #[test]
    fn new_rejects_wraparound() {
        assert_eq!(
            MemoryRegion::new(PhysicalAddress::new(u64::MAX), 2),
            Err(RegionError::Overflow {
                start: PhysicalAddress::new(u64::MAX),
                len: 2
            })
        );
        assert!(MemoryRegion::new(PhysicalAddress::new(u64::MAX), 0).is_ok());
    }

    #[test]
    fn inclusive_extent_counts_both_ends() {
        let r = MemoryRegion::from_inclusive(
            PhysicalAddress::new(0x8_0000),
            PhysicalAddress::new(0x8_00ff),
        )
        .unwrap();
        assert_eq!(r.len(), 0x100);
        assert!(r.contains(PhysicalAddress::new(0x8_00ff)));

        assert!(matches!(
            MemoryRegion::from_inclusive(PhysicalAddress::new(2), PhysicalAddress::new(1)),
            Err(RegionError::Inverted { .. })
        ));
    }

    #[test]
    fn overlap_is_symmetric_and_half_open() {
        let a = region(0x1000, 0x100);
        let b = region(0x1100, 0x100);
        let c = region(0x10ff, 2);
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
        assert!(a.overlaps(&c));
        assert!(c.overlaps(&b));
        assert!(!a.overlaps(&region(0x1050, 0)));
    }

    #[test]
    fn containment() {
        let ram = region(0, 0x3F00_0000);
        assert!(ram.contains_region(&region(0x2000_0000, 0x100)));
        assert!(!ram.contains_region(&region(0x3EFF_FFFF, 2)));
        assert!(ram.contains_region(&region(0x3EFF_FFFF, 1)));
    }
}
