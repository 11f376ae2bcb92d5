use boot_info::memory;
use std::{env, path::PathBuf};

fn main() {
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap());
    let ld = manifest_dir.join("boot.ld");

    println!("cargo:rerun-if-changed={}", ld.display());

    // Host builds (tests, the host stub binary) use the default layout.
    if env::var("CARGO_CFG_TARGET_OS").as_deref() != Ok("none") {
        return;
    }

    // Sanity checks (fail fast during build)
    let load_address = memory::KERNEL_LOAD_ADDRESS;
    let load_limit = memory::KERNEL_LOAD_LIMIT;
    assert_eq!(
        load_address % memory::IMAGE_ALIGNMENT,
        0,
        "KERNEL_LOAD_ADDRESS must keep the image alignment (got {load_address:#x})"
    );
    assert!(
        load_limit > load_address,
        "KERNEL_LOAD_LIMIT must lie above KERNEL_LOAD_ADDRESS"
    );

    // Linker script
    println!("cargo:rustc-link-arg-bins=-T{}", ld.display());

    // Provide symbols to the linker script
    println!("cargo:rustc-link-arg-bins=--defsym=__load_address={load_address:#x}");
    println!("cargo:rustc-link-arg-bins=--defsym=__load_limit={load_limit:#x}");
}
