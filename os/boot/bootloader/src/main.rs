//! # Bootloader Entry Point
//!
//! On `aarch64-unknown-none` this is the `kernel8.img` the firmware starts.
//! Build and flatten it with:
//!
//! ```text
//! cargo build -p bootloader --release --target aarch64-unknown-none
//! rust-objcopy -O binary target/aarch64-unknown-none/release/bootloader kernel8.img
//! ```
//!
//! Host builds only produce a stub, so that the workspace still builds and
//! tests on the development machine.

#![cfg_attr(target_os = "none", no_std, no_main)]
#![allow(unsafe_code)]

#[cfg(target_os = "none")]
mod rpi3;

#[cfg(not(target_os = "none"))]
fn main() {
    eprintln!("bootloader: build with --target aarch64-unknown-none to get a bootable image");
    std::process::exit(1);
}
