//! # Bootloader Configuration and Memory Layout
//!
//! This crate is the single source of truth for the physical memory layout
//! the bootloader relies on, and for the runtime configuration derived from
//! it.
//!
//! ## Physical Memory Layout
//!
//! ```text
//! 0x0000_0000 ┌─────────────────────────────────┐
//!             │  armstub, core spin tables      │
//! 0x0000_1000 ├─────────────────────────────────┤ RAM_START
//!             │  boot stack (grows down)        │
//! 0x0008_0000 ├─────────────────────────────────┤ KERNEL_LOAD_ADDRESS
//!             │  kernel8.img (this bootloader)  │
//!             │  ... received kernel image      │
//!             │      after `relo` + `load`      │
//! 0x2000_0000 ├─────────────────────────────────┤ INITRAMFS_BASE = KERNEL_LOAD_LIMIT
//!             │  newc archive (read-only)       │ INITRAMFS_SIZE_LIMIT
//! 0x2100_0000 ├─────────────────────────────────┤
//!             │  free RAM (relocation targets)  │
//! 0x3F00_0000 ├─────────────────────────────────┤ PERIPHERAL_BASE = RAM_END
//!             │  MMIO                           │
//!             └─────────────────────────────────┘
//! ```
//!
//! The firmware places the bootloader at `KERNEL_LOAD_ADDRESS`, the same
//! place a received kernel must be written to. The operator therefore relocates
//! the bootloader (`relo`) before loading (`load`); the shell refuses a load
//! that would overwrite the image it is currently executing from.
//!
//! ## Usage
//!
//! ```rust
//! use boot_info::{BootConfig, memory};
//!
//! let cfg = BootConfig::rpi3();
//! assert_eq!(cfg.archive.start().as_u64(), memory::INITRAMFS_BASE);
//! ```

#![cfg_attr(not(any(test, doctest)), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod memory;

pub use config::BootConfig;
