//! # Second-Stage Bootloader
//!
//! A serial-console shell that runs before any kernel. It reads one command
//! per line and works directly on physical memory:
//!
//! | Command   | Effect                                                   |
//! |-----------|----------------------------------------------------------|
//! | `help`    | list the commands                                        |
//! | `hello`   | print `Hello World!`                                     |
//! | `reboot`  | arm the watchdog for a full reset                        |
//! | `cat`     | print a file from the in-memory `newc` archive           |
//! | `ls`      | list the archive                                         |
//! | `relo`    | copy the bootloader to a new base and continue there     |
//! | `load`    | receive a kernel image over serial and jump to it        |
//! | `showmem` | dump raw memory                                          |
//! | `dtp`     | decode the device tree header                            |
//!
//! ## Structure
//!
//! The shell ([`Shell`]) is generic over the serial line
//! ([`boot_console::Serial`]) and the machine ([`Platform`]), and is
//! configured by an injected [`BootConfig`](boot_info::BootConfig). Nothing
//! in this crate dereferences a raw address: memory is borrowed through
//! [`PhysicalMemory`], which the board implements over identity-mapped RAM
//! and tests implement over a vector.
//!
//! Control transfer is the exception. `relo` and `load` end with a
//! [`Handoff`] that the board's entry code acts on:
//!
//! ```rust,ignore
//! let handoff = Shell::new(uart, board, config).run();
//! unsafe { transfer_control(handoff.entry(), handoff.device_tree().as_u64()) }
//! ```

#![cfg_attr(not(any(test, doctest)), no_std)]
#![deny(unsafe_code)]

pub mod commands;
pub mod dtb;
mod error;
pub mod input;
pub mod loader;
pub mod platform;
pub mod relocate;
pub mod shell;
#[cfg(test)]
mod testing;

pub use commands::Command;
pub use error::{CommandError, MemoryError};
pub use loader::Checksum;
pub use platform::{Handoff, ImageExtent, Platform, PhysicalMemory};
pub use shell::Shell;
