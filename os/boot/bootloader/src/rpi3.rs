//! Raspberry Pi 3 start-up and [`Platform`] implementation.

use board_rpi3::cpu::{park, transfer_control};
use board_rpi3::gpio::Gpio;
use board_rpi3::mini_uart::DEFAULT_BAUD;
use board_rpi3::{MiniUart, Watchdog};
use boot_addresses::{MemoryRegion, PhysicalAddress};
use boot_console::{ConsoleLogger, Serial};
use boot_info::BootConfig;
use bootloader::{ImageExtent, MemoryError, PhysicalMemory, Platform, Shell};
use core::fmt;
use core::panic::PanicInfo;

// Core 0 continues, the others sleep. The stack grows down from the start
// of the image. x0 carries the device tree pointer from the firmware and is
// kept in x19 until `boot_main`.
core::arch::global_asm!(
    r#"
    .section .text.boot, "ax"
    .global _start
_start:
    mrs     x1, mpidr_el1
    and     x1, x1, #3
    cbz     x1, 2f
1:  wfe
    b       1b

2:  mov     x19, x0
    adrp    x20, __start_begin
    add     x20, x20, :lo12:__start_begin
    mov     sp, x20

    // Zero .bss.
    adrp    x1, __bss_start
    add     x1, x1, :lo12:__bss_start
    adrp    x2, __bss_end_exclusive
    add     x2, x2, :lo12:__bss_end_exclusive
3:  cmp     x1, x2
    b.hs    4f
    stp     xzr, xzr, [x1], #16
    b       3b

    // Apply R_AARCH64_RELATIVE (1027) for the load base in x20.
4:  adrp    x1, __rela_start
    add     x1, x1, :lo12:__rela_start
    adrp    x2, __rela_end
    add     x2, x2, :lo12:__rela_end
5:  cmp     x1, x2
    b.hs    6f
    ldp     x3, x4, [x1], #16
    ldr     x5, [x1], #8
    cmp     x4, #1027
    b.ne    5b
    add     x5, x5, x20
    str     x5, [x3, x20]
    b       5b

6:  mov     x0, x19
    bl      boot_main
    b       1b
"#
);

unsafe extern "C" {
    fn _start();
    static __start_begin: u8;
    static __bss_end: u8;
}

#[unsafe(no_mangle)]
extern "C" fn boot_main(device_tree: u64) -> ! {
    let mut gpio = unsafe { Gpio::new() };
    let mut uart = unsafe { MiniUart::new() };
    uart.init(&mut gpio, DEFAULT_BAUD);

    let config = BootConfig::rpi3().with_device_tree(PhysicalAddress::new(device_tree));
    let _ = ConsoleLogger::new(config.log_level, log_to_uart).init();

    let mut board = Rpi3::new(config.ram);
    board.watchdog.cancel();
    log::info!(
        "running at {}, device tree at {}",
        board.image().start(),
        config.device_tree
    );

    let handoff = Shell::new(uart, board, config).run();
    log::info!("handing off to {}", handoff.entry());
    unsafe { transfer_control(handoff.entry(), handoff.device_tree().as_u64()) }
}

/// Log sink: a second handle on the UART. Records are written between
/// operator output, never during it.
fn log_to_uart(args: fmt::Arguments<'_>) {
    let mut uart = unsafe { MiniUart::new() };
    uart.write_fmt(args);
}

#[panic_handler]
fn panic(info: &PanicInfo) -> ! {
    let mut uart = unsafe { MiniUart::new() };
    write!(uart, "\r\npanic: {info}\r\n");
    uart.flush();
    park()
}

/// Identity-mapped RAM, the linker-provided image extent and the watchdog.
struct Rpi3 {
    ram: MemoryRegion,
    watchdog: Watchdog,
}

impl Rpi3 {
    fn new(ram: MemoryRegion) -> Self {
        Self {
            ram,
            watchdog: unsafe { Watchdog::new() },
        }
    }

    /// Pointer and length of `region`, if it lies in RAM.
    fn checked(&self, region: MemoryRegion) -> Result<(*mut u8, usize), MemoryError> {
        let unmapped = MemoryError::Unmapped { region };
        if !self.ram.contains_region(&region) {
            return Err(unmapped);
        }
        let addr = region.start().as_usize().ok_or(unmapped)?;
        let len = usize::try_from(region.len()).map_err(|_| unmapped)?;
        Ok((core::ptr::with_exposed_provenance_mut(addr), len))
    }
}

impl PhysicalMemory for Rpi3 {
    fn memory(&self, region: MemoryRegion) -> Result<&[u8], MemoryError> {
        let (ptr, len) = self.checked(region)?;
        // RAM starts above the null page and nothing else runs concurrently.
        Ok(unsafe { core::slice::from_raw_parts(ptr, len) })
    }

    fn memory_mut(&mut self, region: MemoryRegion) -> Result<&mut [u8], MemoryError> {
        let (ptr, len) = self.checked(region)?;
        Ok(unsafe { core::slice::from_raw_parts_mut(ptr, len) })
    }
}

impl Platform for Rpi3 {
    fn image(&self) -> ImageExtent {
        ImageExtent::new(
            PhysicalAddress::from_ptr(&raw const __start_begin),
            PhysicalAddress::from_ptr(&raw const __bss_end),
            PhysicalAddress::from_ptr(_start as *const ()),
        )
    }

    fn reset(&mut self, ticks: u32) {
        self.watchdog.reset(ticks);
    }
}
