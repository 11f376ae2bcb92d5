//! # GPIO Function Select and Pull Control
//!
//! Only what is needed to hand GPIO 14/15 to the mini UART.

use crate::cpu::wait_cycles;
use crate::mmio::{RegisterBlock, register};
use crate::peripheral;
use bitfield_struct::bitfield;

/// Offset of the GPIO block from the peripheral base.
pub const GPIO_OFFSET: u64 = 0x0020_0000;

/// Alternate function of a pin (3-bit `FSELn` encoding).
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[repr(u8)]
pub enum Function {
    Input = 0b000,
    Output = 0b001,
    Alt0 = 0b100,
    Alt1 = 0b101,
    Alt2 = 0b110,
    Alt3 = 0b111,
    Alt4 = 0b011,
    Alt5 = 0b010,
}

impl Function {
    #[must_use]
    pub const fn into_bits(self) -> u8 {
        self as u8
    }

    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0b111 {
            0b000 => Self::Input,
            0b001 => Self::Output,
            0b100 => Self::Alt0,
            0b101 => Self::Alt1,
            0b110 => Self::Alt2,
            0b111 => Self::Alt3,
            0b011 => Self::Alt4,
            _ => Self::Alt5,
        }
    }
}

/// `GPFSEL1`: function select for GPIO 10 to 19.
#[bitfield(u32)]
pub struct GpFsel1 {
    /// GPIO 10 to 13.
    #[bits(12)]
    _fsel10_13: u16,

    /// GPIO 14, `TXD1` in [`Function::Alt5`].
    #[bits(3)]
    pub fsel14: Function,

    /// GPIO 15, `RXD1` in [`Function::Alt5`].
    #[bits(3)]
    pub fsel15: Function,

    /// GPIO 16 to 19.
    #[bits(12)]
    _fsel16_19: u16,

    #[bits(2, default = 0)]
    _reserved_30_31: u8,
}

register!(GpFsel1, 0x04);

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[repr(u8)]
pub enum Pull {
    Off = 0b00,
    Down = 0b01,
    Up = 0b10,
}

impl Pull {
    #[must_use]
    pub const fn into_bits(self) -> u8 {
        self as u8
    }

    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0b01 => Self::Down,
            0b10 => Self::Up,
            _ => Self::Off,
        }
    }
}

/// `GPPUD`: pull-up/down control applied by the next clock pulse.
#[bitfield(u32)]
pub struct GpPud {
    #[bits(2)]
    pub pud: Pull,

    #[bits(30, default = 0)]
    _reserved: u32,
}

register!(GpPud, 0x94);

/// `GPPUDCLK0`: latches [`GpPud`] into the selected pins.
#[bitfield(u32)]
pub struct GpPudClk0 {
    #[bits(14)]
    _pins0_13: u16,

    pub pin14: bool,

    pub pin15: bool,

    #[bits(16)]
    _pins16_31: u16,
}

register!(GpPudClk0, 0x98);

/// Cycles the pull-control sequence needs between steps.
const PULL_SETUP_CYCLES: u32 = 150;

pub struct Gpio {
    regs: RegisterBlock,
}

impl Gpio {
    /// # Safety
    /// Must only be called on the board, by one owner at a time.
    #[must_use]
    pub const unsafe fn new() -> Self {
        Self {
            regs: unsafe { RegisterBlock::new(peripheral(GPIO_OFFSET)) },
        }
    }

    /// Route GPIO 14/15 to the mini UART with pulls disabled.
    pub fn route_mini_uart(&mut self) {
        unsafe {
            self.regs.update::<GpFsel1>(|r| {
                r.with_fsel14(Function::Alt5).with_fsel15(Function::Alt5)
            });

            self.regs.store(GpPud::new().with_pud(Pull::Off));
            wait_cycles(PULL_SETUP_CYCLES);
            self.regs
                .store(GpPudClk0::new().with_pin14(true).with_pin15(true));
            wait_cycles(PULL_SETUP_CYCLES);
            self.regs.store(GpPudClk0::new());
        }
    }
}
