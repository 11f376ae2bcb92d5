//! # CPU Primitives
//!
//! The instruction sequences only exist for `aarch64`; on any other
//! architecture (host-side builds) the functions that cannot be emulated
//! panic.

use boot_addresses::PhysicalAddress;

/// Busy-wait for roughly `cycles` instructions.
#[inline]
pub fn wait_cycles(cycles: u32) {
    for _ in 0..cycles {
        #[cfg(target_arch = "aarch64")]
        unsafe {
            core::arch::asm!("nop", options(nomem, nostack, preserves_flags));
        }
        #[cfg(not(target_arch = "aarch64"))]
        core::hint::spin_loop();
    }
}

/// Stop the current core for good.
pub fn park() -> ! {
    loop {
        #[cfg(target_arch = "aarch64")]
        unsafe {
            core::arch::asm!("wfe", options(nomem, nostack, preserves_flags));
        }
        #[cfg(not(target_arch = "aarch64"))]
        core::hint::spin_loop();
    }
}

/// Branch to `entry` with `arg0` in `x0`. Never returns.
///
/// Outstanding memory writes are completed and the instruction cache is
/// invalidated first, so freshly copied code is fetched from memory.
///
/// # Safety
/// `entry` must hold valid code for the current exception level, expecting
/// at most one argument in `x0`. The current stack is abandoned.
///
/// # Panics
/// On architectures other than `aarch64`.
pub unsafe fn transfer_control(entry: PhysicalAddress, arg0: u64) -> ! {
    #[cfg(target_arch = "aarch64")]
    unsafe {
        core::arch::asm!(
            "dsb sy",
            "ic iallu",
            "dsb sy",
            "isb",
            "br {entry}",
            entry = in(reg) entry.as_u64(),
            in("x0") arg0,
            options(noreturn)
        );
    }

    #[cfg(not(target_arch = "aarch64"))]
    {
        let _ = arg0;
        panic!("cannot transfer control to {entry} on this architecture");
    }
}
