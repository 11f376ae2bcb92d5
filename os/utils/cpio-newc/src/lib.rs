//! # SVR4 `newc` cpio Archives
//!
//! The firmware places a `newc` archive in memory before the bootloader
//! runs. This crate reads such an archive straight out of a byte slice, and
//! (feature `pack`) writes one on the host.
//!
//! ## Record Layout
//!
//! ```text
//! offset  size  field
//!      0     6  magic      "070701" (or "070702")
//!      6     8  ino        \
//!     14     8  mode        |
//!     22     8  uid         |
//!     30     8  gid         |
//!     38     8  nlink       |  ASCII hexadecimal,
//!     46     8  mtime       |  8 digits each
//!     54     8  filesize    |
//!     62     8  devmajor    |
//!     70     8  devminor    |
//!     78     8  rdevmajor   |
//!     86     8  rdevminor   |
//!     94     8  namesize    |  includes the terminating NUL
//!    102     8  check      /
//!    110        name, NUL-terminated, padded to a multiple of 4
//!               file data (filesize bytes), padded to a multiple of 4
//! ```
//!
//! The archive ends with a record named [`TRAILER`]. There is no record
//! count; a reader relies on the trailer alone, so every offset derived from
//! a header is checked against the slice before it is used.
//!
//! ## Usage
//!
//! ```rust
//! # #[cfg(feature = "pack")] {
//! use cpio_newc::{Archive, ArchiveBuilder};
//!
//! let blob = ArchiveBuilder::new().file("hello.txt", b"hi\n").finish();
//! let archive = Archive::new(&blob);
//! let entry = archive.find(b"hello.txt").unwrap().unwrap();
//! assert_eq!(entry.data(), b"hi\n");
//! assert!(archive.find(b"missing.txt").unwrap().is_none());
//! # }
//! ```

#![cfg_attr(not(any(test, doctest)), no_std)]

mod header;
mod hex;
#[cfg(any(test, feature = "pack"))]
mod pack;
#[cfg(feature = "read")]
mod reader;

pub use header::{FileType, Header, Magic, Mode};
pub use hex::{HexError, decode_hex};
#[cfg(any(test, feature = "pack"))]
pub use pack::ArchiveBuilder;
#[cfg(feature = "read")]
pub use reader::{Archive, ArchiveError, Entries, Entry};

/// Size of the fixed part of a record header.
pub const HEADER_LEN: usize = 110;

/// Records, names and file data all start on this boundary.
pub const ALIGNMENT: usize = 4;

/// Name of the record that terminates an archive.
pub const TRAILER: &[u8] = b"TRAILER!!!";
