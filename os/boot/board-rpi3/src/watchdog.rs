//! # Power-Management Watchdog
//!
//! Writing a full-reset configuration to `PM_RSTC` and a tick count to
//! `PM_WDOG` resets the board once the watchdog counts down. Every write to
//! the PM block must carry the password `0x5A` in its top byte or it is
//! ignored by the hardware.

use crate::mmio::{RegisterBlock, register};
use crate::peripheral;
use bitfield_struct::bitfield;

/// Offset of the power-management block from the peripheral base.
pub const PM_OFFSET: u64 = 0x0010_0000;

/// Value of the password byte (bits 24..32 of every PM register write).
pub const PM_PASSWORD: u8 = 0x5A;

/// Reset configuration in `PM_RSTC.WRCFG`.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[repr(u8)]
pub enum ResetConfig {
    Clear = 0b00,
    Set = 0b01,
    FullReset = 0b10,
    Reserved = 0b11,
}

impl ResetConfig {
    #[must_use]
    pub const fn into_bits(self) -> u8 {
        self as u8
    }

    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0b00 => Self::Clear,
            0b01 => Self::Set,
            0b10 => Self::FullReset,
            _ => Self::Reserved,
        }
    }
}

/// `PM_RSTC`: reset control.
#[bitfield(u32)]
pub struct PmRstc {
    #[bits(4)]
    _reserved_0_3: u8,

    #[bits(2)]
    pub wrcfg: ResetConfig,

    #[bits(18)]
    _reserved_6_23: u32,

    #[bits(8, default = PM_PASSWORD)]
    pub password: u8,
}

register!(PmRstc, 0x1C);

impl PmRstc {
    /// `self` with the reset configuration replaced, reserved bits kept.
    #[must_use]
    pub const fn configured(self, wrcfg: ResetConfig) -> Self {
        self.with_password(PM_PASSWORD).with_wrcfg(wrcfg)
    }
}

/// `PM_WDOG`: watchdog countdown, in ticks of roughly 16 µs.
#[bitfield(u32)]
pub struct PmWdog {
    #[bits(20)]
    pub ticks: u32,

    #[bits(4, default = 0)]
    _reserved_20_23: u8,

    #[bits(8, default = PM_PASSWORD)]
    pub password: u8,
}

register!(PmWdog, 0x24);

impl PmWdog {
    pub const MAX_TICKS: u32 = (1 << 20) - 1;
}

pub struct Watchdog {
    regs: RegisterBlock,
}

impl Watchdog {
    /// # Safety
    /// Must only be called on the board.
    #[must_use]
    pub const unsafe fn new() -> Self {
        Self {
            regs: unsafe { RegisterBlock::new(peripheral(PM_OFFSET)) },
        }
    }

    /// Arm a full reset after `ticks` watchdog ticks (clamped to the 20-bit
    /// counter).
    pub fn reset(&mut self, ticks: u32) {
        log::info!("watchdog reset armed, {ticks} ticks");
        unsafe {
            self.regs
                .update::<PmRstc>(|r| r.configured(ResetConfig::FullReset));
            self.regs
                .store(PmWdog::new().with_ticks(ticks.min(PmWdog::MAX_TICKS)));
        }
    }

    /// Disarm a pending reset, e.g. one left armed by a previous stage.
    pub fn cancel(&mut self) {
        log::debug!("watchdog reset cancelled");
        unsafe {
            self.regs
                .update::<PmRstc>(|r| r.configured(ResetConfig::Clear));
        }
    }
}
