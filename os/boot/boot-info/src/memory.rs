//! # Memory Layout
//!
//! Fixed physical addresses of the Raspberry Pi 3 boot environment. These
//! are part of the contract with the firmware (`config.txt`) and with the
//! host-side tooling, and must not drift.

/// Where the firmware places `kernel8.img`, i.e. this bootloader, and where
/// the bootloader in turn loads the next kernel image.
///
/// # Bootloader Build
/// This information is sourced in the bootloader's `build.rs` to configure
/// the linker.
pub const KERNEL_LOAD_ADDRESS: u64 = 0x0008_0000;

/// End (exclusive) of the region a received kernel image may occupy.
pub const KERNEL_LOAD_LIMIT: u64 = INITRAMFS_BASE;

/// Where the firmware places the `newc` archive (`initramfs ... 0x20000000`
/// in `config.txt`).
pub const INITRAMFS_BASE: u64 = 0x2000_0000;

/// Upper bound on the archive size. Traversal never reads past
/// `INITRAMFS_BASE + INITRAMFS_SIZE_LIMIT`, even for a corrupt archive.
pub const INITRAMFS_SIZE_LIMIT: u64 = 0x0100_0000; // 16 MiB

/// Device tree address used when the firmware did not hand one over in `x0`.
pub const DEVICE_TREE_BASE: u64 = 0x0008_0000;

/// Start of the RAM the bootloader may read or write. The page below holds
/// the firmware's armstub and the spin tables of the parked cores.
pub const RAM_START: u64 = 0x0000_1000;

/// Start of the memory-mapped peripherals; ARM-visible RAM ends here.
pub const PERIPHERAL_BASE: u64 = 0x3F00_0000;

/// End (exclusive) of the RAM the bootloader may read or write.
pub const RAM_END: u64 = PERIPHERAL_BASE;

/// Stack reserved below the running image; `sp` starts at the image base.
pub const BOOT_STACK_SIZE: u64 = 0x1_0000;

/// Alignment the bootloader image is linked with; relocation targets must
/// keep it so that PC-relative address materialization stays valid.
pub const IMAGE_ALIGNMENT: u64 = 0x1000;

const _: () = {
    assert!(KERNEL_LOAD_ADDRESS.is_multiple_of(IMAGE_ALIGNMENT));
    assert!(KERNEL_LOAD_LIMIT > KERNEL_LOAD_ADDRESS);
    assert!(RAM_START <= KERNEL_LOAD_ADDRESS);
    assert!(RAM_START + BOOT_STACK_SIZE <= KERNEL_LOAD_ADDRESS);
    assert!(INITRAMFS_BASE + INITRAMFS_SIZE_LIMIT <= RAM_END);
    assert!(INITRAMFS_BASE.is_multiple_of(4));
};
