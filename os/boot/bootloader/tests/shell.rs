mod common;

use boot_addresses::PhysicalAddress;
use bootloader::Handoff;
use bootloader::dtb::FDT_MAGIC;
use common::{
    ARCHIVE_BASE, DEVICE_TREE, IMAGE_BASE, IMAGE_LEN, LOAD_BASE, LOAD_LEN, output, shell,
    shell_with,
};
use cpio_newc::ArchiveBuilder;

const PROMPT: &str = "user@rpi3:~$ ";

fn archive() -> Vec<u8> {
    ArchiveBuilder::new()
        .file("hello.txt", b"hi\n")
        .directory("docs")
        .file("docs/empty", b"")
        .finish()
}

#[test]
fn cat_prints_file_contents() {
    let mut sh = shell(&archive(), b"cat\rhello.txt\r");
    assert_eq!(sh.step(), None);
    assert_eq!(
        output(&sh),
        "user@rpi3:~$ cat\r\nPlease enter file path: hello.txt\r\nhi\n\r\n"
    );
}

#[test]
fn cat_reports_missing_file() {
    let mut sh = shell(&archive(), b"cat\rmissing.txt\r");
    assert_eq!(sh.step(), None);
    assert!(
        output(&sh).ends_with("missing.txt\r\ncat: missing.txt: No such file or directory\r\n")
    );
}

#[test]
fn cat_of_empty_file_prints_nothing() {
    let mut sh = shell(&archive(), b"cat\rdocs/empty\r");
    sh.step();
    assert!(output(&sh).ends_with("Please enter file path: docs/empty\r\n"));
}

#[test]
fn ls_lists_names_in_archive_order() {
    let mut sh = shell(&archive(), b"ls\r");
    sh.step();
    assert_eq!(
        output(&sh),
        "user@rpi3:~$ ls\r\nhello.txt\r\ndocs\r\ndocs/empty\r\n"
    );
}

#[test]
fn ls_prints_one_name_per_line() {
    let blob = ArchiveBuilder::new()
        .file("a", b"1")
        .file("b", b"22")
        .file("c", b"")
        .finish();
    let mut sh = shell(&blob, b"ls\r");
    sh.step();
    assert_eq!(output(&sh), format!("{PROMPT}ls\r\na\r\nb\r\nc\r\n"));
}

#[test]
fn ls_reports_corrupt_archive_after_listing_valid_prefix() {
    let blob = ArchiveBuilder::new()
        .file("a", b"1")
        .finish_without_trailer();
    let mut sh = shell(&blob, b"ls\r");
    sh.step();

    let out = output(&sh);
    assert!(out.contains("ls\r\na\r\n"), "{out}");
    assert!(out.contains("ls: corrupt archive: "), "{out}");
}

#[test]
fn empty_line_prompts_again() {
    let mut sh = shell(&archive(), b"\rhello\r");
    assert_eq!(sh.step(), None);
    assert_eq!(sh.step(), None);
    assert_eq!(
        output(&sh),
        format!("{PROMPT}\r\n{PROMPT}hello\r\nHello World!\r\n")
    );
}

#[test]
fn unknown_command_is_reported() {
    let mut sh = shell(&archive(), b"foo\r");
    sh.step();
    assert!(output(&sh).ends_with("Command 'foo' not found\r\n"));
}

#[test]
fn command_with_trailing_text_is_unknown() {
    let mut sh = shell(&archive(), b"hello world\r");
    sh.step();
    assert!(output(&sh).ends_with("Command 'hello world' not found\r\n"));
}

#[test]
fn help_lists_every_command() {
    let mut sh = shell(&archive(), b"help\r");
    sh.step();

    let out = output(&sh);
    let body = out.strip_prefix("user@rpi3:~$ help\r\n").unwrap();
    let lines: Vec<_> = body.split_terminator("\r\n").collect();
    assert_eq!(lines.len(), 9);
    assert_eq!(lines[0], "help    : list all commands");
    assert!(lines.iter().any(|l| l.starts_with("dtp     : ")));
}

#[test]
fn backspace_edits_the_command_line() {
    let mut sh = shell(&archive(), b"helx\x08lo\r");
    sh.step();
    assert!(output(&sh).ends_with("Hello World!\r\n"));
}

#[test]
fn reboot_arms_the_watchdog() {
    let mut sh = shell(&archive(), b"reboot\r");
    assert_eq!(sh.step(), None);
    assert!(output(&sh).ends_with("Rebooting...\r\n"));

    let (_, board) = sh.into_parts();
    assert_eq!(board.resets, [1]);
}

#[test]
fn load_receives_image_and_hands_off_to_kernel() {
    let mut sh = shell(&archive(), b"load\r4\r\x01\x02\x03\x04");
    let handoff = sh.step().expect("load hands off");

    assert_eq!(
        handoff,
        Handoff::Kernel {
            entry: PhysicalAddress::new(LOAD_BASE),
            device_tree: PhysicalAddress::new(DEVICE_TREE),
        }
    );

    let out = output(&sh);
    assert!(out.contains("Please enter size of kernel8.img: 4\r\n"), "{out}");
    assert!(out.contains("You can start sending kernel8.img now...\r\n"), "{out}");
    assert!(out.contains("Checksum: 10 (0x0A)\r\n"), "{out}");
    assert!(out.ends_with("Receiving complete!\r\nPrepare to jump to kernel...\r\n"), "{out}");

    let (serial, board) = sh.into_parts();
    assert_eq!(serial.remaining_input(), 0);
    assert_eq!(board.read(LOAD_BASE, 4), [1, 2, 3, 4]);
}

#[test]
fn load_refuses_image_larger_than_load_region() {
    let input = format!("load\r{}\r", LOAD_LEN + 1);
    let mut sh = shell(&archive(), input.as_bytes());
    assert_eq!(sh.step(), None);

    let out = output(&sh);
    assert!(out.contains("load: image of "), "{out}");
    assert!(!out.contains("start sending"), "{out}");
}

#[test]
fn load_refuses_empty_image() {
    let mut sh = shell(&archive(), b"load\r0\r");
    assert_eq!(sh.step(), None);
    assert!(output(&sh).ends_with("load: refusing to load an empty image\r\n"));
}

#[test]
fn load_rejects_non_decimal_size() {
    let mut sh = shell(&archive(), b"load\r12x\r");
    assert_eq!(sh.step(), None);
    assert!(output(&sh).contains("load: invalid number: "));
}

#[test]
fn relocation_copies_image_and_enters_the_copy() {
    let pattern: Vec<u8> = (0..IMAGE_LEN).map(|i| (i * 7) as u8).collect();
    let mut sh = shell_with(b"relo\r120000\r", |board| board.fill(IMAGE_BASE, &pattern));

    let handoff = sh.step().expect("relo hands off");
    assert_eq!(
        handoff,
        Handoff::Relocated {
            entry: PhysicalAddress::new(0x12_0040),
            device_tree: PhysicalAddress::new(DEVICE_TREE),
        }
    );
    assert!(output(&sh).ends_with(
        "Start relocating...\r\nRelocation complete!\r\nPrepare to jump to new bootloader...\r\n"
    ));

    let (_, board) = sh.into_parts();
    assert_eq!(board.read(0x12_0000, IMAGE_LEN as usize), pattern.as_slice());
    assert_eq!(board.read(IMAGE_BASE, IMAGE_LEN as usize), pattern.as_slice());
}

#[test]
fn relocation_refuses_misaligned_target() {
    let mut sh = shell(&archive(), b"relo\r120010\r");
    assert_eq!(sh.step(), None);
    assert!(output(&sh).ends_with(
        "relo: relocation target 0x00120010 is not aligned to 0x1000 bytes\r\n"
    ));
}

#[test]
fn relocation_refuses_target_overlapping_itself() {
    let mut sh = shell(&archive(), b"relo\r100000\r");
    assert_eq!(sh.step(), None);
    let out = output(&sh);
    assert!(out.contains("relo: "), "{out}");
    assert!(out.contains("overlaps the running bootloader"), "{out}");
    assert!(!out.contains("Start relocating"), "{out}");
}

#[test]
fn relocation_outside_ram_is_refused() {
    let mut sh = shell(&archive(), b"relo\r300000\r");
    assert_eq!(sh.step(), None);
    let out = output(&sh);
    assert!(out.contains("is outside accessible memory"), "{out}");
}

#[test]
fn showmem_dumps_raw_bytes() {
    let mut sh = shell_with(b"showmem\r150000\r4\r", |board| board.fill(0x15_0000, b"ABCD"));
    sh.step();
    assert!(output(&sh).ends_with("Please enter length: 4\r\nABCD\r\n"));
}

#[test]
fn showmem_reads_archive_through_same_view() {
    let mut sh = shell(&archive(), format!("showmem\r{ARCHIVE_BASE:x}\r6\r").as_bytes());
    sh.step();
    assert!(output(&sh).ends_with("\r\n070701\r\n"));
}

#[test]
fn showmem_rejects_unmapped_range() {
    let mut sh = shell(&archive(), b"showmem\r3F0000\r4\r");
    sh.step();
    assert!(output(&sh).contains("showmem: "));
    assert!(output(&sh).ends_with("is outside accessible memory\r\n"));
}

fn device_tree_header(magic: u32, version: u32) -> Vec<u8> {
    [magic, 0x6A1B, 0x38, 0x6720, 0x28, version, 16, 0, 0x3FB, 0x66E8]
        .iter()
        .flat_map(|w| w.to_be_bytes())
        .collect()
}

#[test]
fn dtp_prints_device_tree_header() {
    let mut sh = shell_with(b"dtp\r", |board| {
        board.fill(DEVICE_TREE, &device_tree_header(FDT_MAGIC, 17));
    });
    sh.step();

    let out = output(&sh);
    assert!(out.contains("magic             : 0xd00dfeed\r\n"), "{out}");
    assert!(out.contains("version           : 0x00000011\r\n"), "{out}");
    assert!(out.ends_with("size_dt_struct    : 0x000066e8\r\n"), "{out}");
}

#[test]
fn dtp_rejects_bad_magic() {
    let mut sh = shell(&archive(), b"dtp\r");
    sh.step();
    assert!(
        output(&sh)
            .ends_with("dtp: bad device tree: magic is 0x00000000, expected 0xd00dfeed\r\n")
    );
}

#[test]
fn run_greets_then_serves_until_handoff() {
    let mut sh = shell(&archive(), b"hello\rload\r1\r\x2A");
    let handoff = sh.run();

    assert_eq!(handoff.entry(), PhysicalAddress::new(LOAD_BASE));
    let out = output(&sh);
    assert!(out.starts_with("Welcome to RPI3-OS\r\nuser@rpi3:~$ hello\r\nHello World!\r\n"));
    assert!(out.contains("Checksum: 42 (0x2A)\r\n"), "{out}");
}
