//! # Raspberry Pi 3 Board Support
//!
//! Typed access to the few BCM2837 peripherals the bootloader needs:
//!
//! * [`MiniUart`]: the auxiliary UART on GPIO 14/15, the operator console
//! * [`Watchdog`]: power-management watchdog, used to reset the board
//! * [`cpu`]: core parking, busy waits and the control-transfer primitive
//!
//! Register layouts are modeled with `bitfield-struct`; raw MMIO goes through
//! [`mmio::RegisterBlock`].

#![cfg_attr(not(any(test, doctest)), no_std)]
#![allow(unsafe_code)]

pub mod cpu;
pub mod gpio;
pub mod mini_uart;
pub mod mmio;
pub mod watchdog;

pub use mini_uart::MiniUart;
pub use watchdog::Watchdog;

use boot_addresses::PhysicalAddress;
use boot_info::memory::PERIPHERAL_BASE;

/// Physical address of a peripheral block, given its offset from the
/// peripheral base.
#[must_use]
pub const fn peripheral(offset: u64) -> PhysicalAddress {
    PhysicalAddress::new(PERIPHERAL_BASE + offset)
}
