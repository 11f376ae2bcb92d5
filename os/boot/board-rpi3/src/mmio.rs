//! # Memory-Mapped Registers
//!
//! Every peripheral register used here is 32 bits wide and lives at a fixed
//! offset from its block's base. A register type names its offset once and
//! is then loaded and stored by type:
//!
//! ```rust,ignore
//! let lsr: AuxMuLsr = unsafe { aux.load() };
//! if lsr.transmitter_empty() { ... }
//! ```

use boot_addresses::PhysicalAddress;

/// A 32-bit device register.
pub trait Register: Copy {
    /// Byte offset from the start of the register block.
    const OFFSET: u64;

    fn from_raw(raw: u32) -> Self;

    fn into_raw(self) -> u32;
}

/// Implements [`Register`] for a `#[bitfield(u32)]` type.
macro_rules! register {
    ($ty:ty, $offset:expr) => {
        impl $crate::mmio::Register for $ty {
            const OFFSET: u64 = $offset;

            #[inline]
            fn from_raw(raw: u32) -> Self {
                Self::from_bits(raw)
            }

            #[inline]
            fn into_raw(self) -> u32 {
                self.into_bits()
            }
        }
    };
}

pub(crate) use register;

/// Base address of a peripheral's registers.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct RegisterBlock {
    base: PhysicalAddress,
}

impl RegisterBlock {
    /// # Safety
    /// `base` must be the identity-mapped address of a device whose register
    /// layout matches the [`Register`] types later used with this block.
    #[must_use]
    pub const unsafe fn new(base: PhysicalAddress) -> Self {
        Self { base }
    }

    #[inline]
    fn pointer<R: Register>(&self) -> *mut u32 {
        // Identity mapped, MMU off.
        #[allow(clippy::cast_possible_truncation)]
        let addr = (self.base.as_u64() + R::OFFSET) as usize;
        core::ptr::with_exposed_provenance_mut(addr)
    }

    /// # Safety
    /// Reading may have side effects on the device (e.g. popping a FIFO).
    #[inline]
    #[must_use]
    pub unsafe fn load<R: Register>(&self) -> R {
        R::from_raw(unsafe { core::ptr::read_volatile(self.pointer::<R>()) })
    }

    /// # Safety
    /// Writing reconfigures the device.
    #[inline]
    pub unsafe fn store<R: Register>(&self, value: R) {
        unsafe { core::ptr::write_volatile(self.pointer::<R>(), value.into_raw()) }
    }

    /// Read, modify and write back a register.
    ///
    /// # Safety
    /// See [`load`](Self::load) and [`store`](Self::store).
    #[inline]
    pub unsafe fn update<R: Register>(&self, f: impl FnOnce(R) -> R) {
        unsafe {
            let value = self.load::<R>();
            self.store(f(value));
        }
    }
}
