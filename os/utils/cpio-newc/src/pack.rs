//! # Archive Writer
//!
//! Produces archives in the layout the reader expects, with uppercase hex
//! fields (as `gen_init_cpio` writes them).

extern crate alloc;

use crate::header::{Header, Magic, Mode};
use crate::{ALIGNMENT, TRAILER};
use alloc::vec::Vec;

/// Incrementally builds a `newc` archive in memory.
#[derive(Debug, Clone)]
pub struct ArchiveBuilder {
    out: Vec<u8>,
    next_ino: u32,
    mtime: u32,
}

impl Default for ArchiveBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ArchiveBuilder {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            out: Vec::new(),
            next_ino: 1,
            mtime: 0,
        }
    }

    /// Modification time stamped on subsequently added records.
    #[must_use]
    pub const fn mtime(mut self, mtime: u32) -> Self {
        self.mtime = mtime;
        self
    }

    /// Append a regular file (`0644`).
    ///
    /// # Panics
    /// If `name` or `data` is longer than the 32-bit header fields allow.
    #[must_use]
    pub fn file(mut self, name: &str, data: &[u8]) -> Self {
        self.push(Mode::regular(0o644), 1, name.as_bytes(), data);
        self
    }

    /// Append a directory (`0755`).
    #[must_use]
    pub fn directory(mut self, name: &str) -> Self {
        self.push(Mode::directory(0o755), 2, name.as_bytes(), &[]);
        self
    }

    /// Append the trailer record and return the archive bytes.
    #[must_use]
    pub fn finish(mut self) -> Vec<u8> {
        self.push(Mode::new(), 1, TRAILER, &[]);
        self.out
    }

    /// Return the archive bytes without a trailer; for exercising readers
    /// against truncated archives.
    #[must_use]
    pub fn finish_without_trailer(self) -> Vec<u8> {
        self.out
    }

    fn push(&mut self, mode: Mode, nlink: u32, name: &[u8], data: &[u8]) {
        let is_trailer = name == TRAILER;
        let ino = if is_trailer { 0 } else { self.next_ino };
        if !is_trailer {
            self.next_ino += 1;
        }

        let header = Header {
            magic: Magic::Newc,
            ino,
            mode,
            uid: 0,
            gid: 0,
            nlink,
            mtime: if is_trailer { 0 } else { self.mtime },
            filesize: u32::try_from(data.len()).expect("file larger than 4 GiB"),
            devmajor: 0,
            devminor: 0,
            rdevmajor: 0,
            rdevminor: 0,
            namesize: u32::try_from(name.len() + 1).expect("name longer than 4 GiB"),
            check: 0,
        };

        self.out.extend_from_slice(&header.encode());
        self.out.extend_from_slice(name);
        self.out.push(0);
        self.pad();
        self.out.extend_from_slice(data);
        self.pad();
    }

    fn pad(&mut self) {
        while !self.out.len().is_multiple_of(ALIGNMENT) {
            self.out.push(0);
        }
    }
}
