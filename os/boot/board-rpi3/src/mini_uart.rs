//! # Mini UART
//!
//! The auxiliary UART (`UART1`) on GPIO 14/15. Its baud rate derives from
//! the core clock, which the firmware pins to 250 MHz when `enable_uart=1`
//! (`core_freq=250` in `config.txt`).
//!
//! Transmit and receive are polled; there is no interrupt handling and no
//! timeout, matching the blocking [`Serial`] contract.

use crate::gpio::Gpio;
use crate::mmio::{RegisterBlock, register};
use crate::peripheral;
use bitfield_struct::bitfield;
use boot_console::Serial;

/// Offset of the AUX block from the peripheral base.
pub const AUX_OFFSET: u64 = 0x0021_5000;

/// Core clock feeding the mini UART baud generator.
pub const CORE_CLOCK_HZ: u32 = 250_000_000;

pub const DEFAULT_BAUD: u32 = 115_200;

/// `AUX_ENABLES`
#[bitfield(u32)]
pub struct AuxEnables {
    pub mini_uart: bool,
    pub spi1: bool,
    pub spi2: bool,
    #[bits(29)]
    _reserved: u32,
}

register!(AuxEnables, 0x04);

/// `AUX_MU_IO`: data register (FIFO access).
#[bitfield(u32)]
pub struct AuxMuIo {
    pub data: u8,
    #[bits(24, default = 0)]
    _reserved: u32,
}

register!(AuxMuIo, 0x40);

/// `AUX_MU_IER`
#[bitfield(u32)]
pub struct AuxMuIer {
    pub receive_interrupt: bool,
    pub transmit_interrupt: bool,
    #[bits(30, default = 0)]
    _reserved: u32,
}

register!(AuxMuIer, 0x44);

/// `AUX_MU_IIR`: on write, FIFO clear and enable bits.
#[bitfield(u32)]
pub struct AuxMuIir {
    pub interrupt_pending_n: bool,
    pub clear_receive_fifo: bool,
    pub clear_transmit_fifo: bool,
    #[bits(3, default = 0)]
    _reserved_3_5: u8,
    /// Both FIFO-enable bits read as set; written set for clarity.
    #[bits(2)]
    pub fifo_enables: u8,
    #[bits(24, default = 0)]
    _reserved_8_31: u32,
}

register!(AuxMuIir, 0x48);

/// `AUX_MU_LCR`
#[bitfield(u32)]
pub struct AuxMuLcr {
    /// `0b11` selects 8-bit mode (the datasheet wrongly documents bit 1 alone).
    #[bits(2)]
    pub data_size: u8,
    #[bits(4, default = 0)]
    _reserved_2_5: u8,
    pub send_break: bool,
    pub dlab_access: bool,
    #[bits(24, default = 0)]
    _reserved_8_31: u32,
}

register!(AuxMuLcr, 0x4C);

/// `AUX_MU_MCR`
#[bitfield(u32)]
pub struct AuxMuMcr {
    #[bits(default = false)]
    _reserved_0: bool,
    pub rts: bool,
    #[bits(30, default = 0)]
    _reserved_2_31: u32,
}

register!(AuxMuMcr, 0x50);

/// `AUX_MU_LSR`: line status.
#[bitfield(u32)]
pub struct AuxMuLsr {
    /// The receive FIFO holds at least one byte.
    pub data_ready: bool,
    pub receiver_overrun: bool,
    #[bits(3)]
    _reserved_2_4: u8,
    /// The transmit FIFO can accept at least one byte.
    pub transmitter_empty: bool,
    /// The transmit FIFO is empty and the transmitter is idle.
    pub transmitter_idle: bool,
    #[bits(25)]
    _reserved_7_31: u32,
}

register!(AuxMuLsr, 0x54);

/// `AUX_MU_CNTL`
#[bitfield(u32)]
pub struct AuxMuCntl {
    pub receiver_enable: bool,
    pub transmitter_enable: bool,
    #[bits(30, default = 0)]
    _reserved: u32,
}

register!(AuxMuCntl, 0x60);

/// `AUX_MU_BAUD`
#[bitfield(u32)]
pub struct AuxMuBaud {
    pub divisor: u16,
    #[bits(16, default = 0)]
    _reserved: u16,
}

register!(AuxMuBaud, 0x68);

/// Baud register value for `baud` at `clock_hz`:
/// `baud = clock / (8 * (divisor + 1))`.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub const fn baud_divisor(clock_hz: u32, baud: u32) -> u16 {
    let divisor = (clock_hz / (8 * baud)).saturating_sub(1);
    if divisor > 0xFFFF {
        u16::MAX
    } else {
        divisor as u16
    }
}

/// Polled mini UART, 8N1.
pub struct MiniUart {
    regs: RegisterBlock,
}

impl MiniUart {
    /// # Safety
    /// Must only be called on the board, and only once; the returned value
    /// owns the UART.
    #[must_use]
    pub const unsafe fn new() -> Self {
        Self {
            regs: unsafe { RegisterBlock::new(peripheral(AUX_OFFSET)) },
        }
    }

    /// Route the pins and bring the UART up at `baud`.
    pub fn init(&mut self, gpio: &mut Gpio, baud: u32) {
        gpio.route_mini_uart();

        unsafe {
            self.regs.update::<AuxEnables>(|r| r.with_mini_uart(true));
            self.regs.store(AuxMuCntl::new());
            self.regs.store(AuxMuIer::new());
            self.regs.store(AuxMuLcr::new().with_data_size(0b11));
            self.regs.store(AuxMuMcr::new());
            self.regs
                .store(AuxMuBaud::new().with_divisor(baud_divisor(CORE_CLOCK_HZ, baud)));
            self.regs.store(
                AuxMuIir::new()
                    .with_clear_receive_fifo(true)
                    .with_clear_transmit_fifo(true)
                    .with_fifo_enables(0b11),
            );
            self.regs.store(
                AuxMuCntl::new()
                    .with_receiver_enable(true)
                    .with_transmitter_enable(true),
            );
        }
    }

    #[inline]
    fn status(&self) -> AuxMuLsr {
        unsafe { self.regs.load() }
    }
}

impl Serial for MiniUart {
    fn read_byte(&mut self) -> u8 {
        while !self.status().data_ready() {
            core::hint::spin_loop();
        }
        unsafe { self.regs.load::<AuxMuIo>() }.data()
    }

    fn write_byte(&mut self, byte: u8) {
        while !self.status().transmitter_empty() {
            core::hint::spin_loop();
        }
        unsafe { self.regs.store(AuxMuIo::new().with_data(byte)) }
    }

    fn flush(&mut self) {
        while !self.status().transmitter_idle() {
            core::hint::spin_loop();
        }
    }
}
