//! # Record Header

use crate::HEADER_LEN;
use crate::hex::{HexError, decode_hex};
use bitfield_struct::bitfield;

/// Names of the thirteen hex fields following the magic, in archive order.
const FIELD_NAMES: [&str; 13] = [
    "ino",
    "mode",
    "uid",
    "gid",
    "nlink",
    "mtime",
    "filesize",
    "devmajor",
    "devminor",
    "rdevmajor",
    "rdevminor",
    "namesize",
    "check",
];

const MAGIC_LEN: usize = 6;
const FIELD_LEN: usize = 8;

const _: () = assert!(MAGIC_LEN + FIELD_NAMES.len() * FIELD_LEN == HEADER_LEN);

/// The two `newc` flavors. They share the layout; `070702` additionally
/// carries a checksum of the file data in `check`, which is not verified.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Magic {
    /// `070701`
    Newc,
    /// `070702`
    NewcCrc,
}

impl Magic {
    #[must_use]
    pub const fn as_bytes(self) -> &'static [u8; MAGIC_LEN] {
        match self {
            Self::Newc => b"070701",
            Self::NewcCrc => b"070702",
        }
    }

    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        match bytes {
            b"070701" => Some(Self::Newc),
            b"070702" => Some(Self::NewcCrc),
            _ => None,
        }
    }
}

/// `st_mode` as stored in the `mode` field.
///
/// Layout (LSB→MSB):
/// - bits 0..12: permission bits (`rwxrwxrwx` plus setuid/setgid/sticky)
/// - bits 12..16: file type (`S_IFMT >> 12`)
/// - bits 16..32: unused
#[bitfield(u32)]
#[derive(Eq, PartialEq)]
pub struct Mode {
    #[bits(12)]
    pub permissions: u16,
    #[bits(4)]
    pub file_type_bits: u8,
    #[bits(16)]
    __: u16,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FileType {
    Fifo,
    CharDevice,
    Directory,
    BlockDevice,
    Regular,
    Symlink,
    Socket,
    Unknown(u8),
}

impl Mode {
    #[must_use]
    pub const fn file_type(self) -> FileType {
        match self.file_type_bits() {
            0o01 => FileType::Fifo,
            0o02 => FileType::CharDevice,
            0o04 => FileType::Directory,
            0o06 => FileType::BlockDevice,
            0o10 => FileType::Regular,
            0o12 => FileType::Symlink,
            0o14 => FileType::Socket,
            other => FileType::Unknown(other),
        }
    }

    #[must_use]
    pub const fn regular(permissions: u16) -> Self {
        Self::new().with_file_type_bits(0o10).with_permissions(permissions)
    }

    #[must_use]
    pub const fn directory(permissions: u16) -> Self {
        Self::new().with_file_type_bits(0o04).with_permissions(permissions)
    }
}

/// Why the fixed part of a header could not be decoded.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) enum HeaderError {
    Truncated,
    BadMagic,
    InvalidField {
        field: &'static str,
        source: HexError,
    },
}

/// Decoded fixed part of a record header.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Header {
    pub magic: Magic,
    pub ino: u32,
    pub mode: Mode,
    pub uid: u32,
    pub gid: u32,
    pub nlink: u32,
    pub mtime: u32,
    pub filesize: u32,
    pub devmajor: u32,
    pub devminor: u32,
    pub rdevmajor: u32,
    pub rdevminor: u32,
    /// Length of the name including its NUL terminator.
    pub namesize: u32,
    pub check: u32,
}

impl Header {
    /// Decode the first [`HEADER_LEN`] bytes of `bytes`.
    pub(crate) fn parse(bytes: &[u8]) -> Result<Self, HeaderError> {
        let bytes = bytes.get(..HEADER_LEN).ok_or(HeaderError::Truncated)?;
        let magic = Magic::from_bytes(&bytes[..MAGIC_LEN]).ok_or(HeaderError::BadMagic)?;

        let mut fields = [0u32; FIELD_NAMES.len()];
        for (i, (value, field)) in fields.iter_mut().zip(FIELD_NAMES).enumerate() {
            let start = MAGIC_LEN + i * FIELD_LEN;
            *value = decode_hex(&bytes[start..start + FIELD_LEN])
                .map_err(|source| HeaderError::InvalidField { field, source })?;
        }

        let [
            ino,
            mode,
            uid,
            gid,
            nlink,
            mtime,
            filesize,
            devmajor,
            devminor,
            rdevmajor,
            rdevminor,
            namesize,
            check,
        ] = fields;

        Ok(Self {
            magic,
            ino,
            mode: Mode::from_bits(mode),
            uid,
            gid,
            nlink,
            mtime,
            filesize,
            devmajor,
            devminor,
            rdevmajor,
            rdevminor,
            namesize,
            check,
        })
    }

    /// Encode as the fixed part of a record, with uppercase hex digits.
    #[cfg(any(test, feature = "pack"))]
    pub(crate) fn encode(&self) -> [u8; HEADER_LEN] {
        let fields = [
            self.ino,
            self.mode.into_bits(),
            self.uid,
            self.gid,
            self.nlink,
            self.mtime,
            self.filesize,
            self.devmajor,
            self.devminor,
            self.rdevmajor,
            self.rdevminor,
            self.namesize,
            self.check,
        ];

        let mut out = [0u8; HEADER_LEN];
        out[..MAGIC_LEN].copy_from_slice(self.magic.as_bytes());
        for (i, value) in fields.into_iter().enumerate() {
            let start = MAGIC_LEN + i * FIELD_LEN;
            encode_hex(value, &mut out[start..start + FIELD_LEN]);
        }
        out
    }
}

#[cfg(any(test, feature = "pack"))]
fn encode_hex(value: u32, out: &mut [u8]) {
    const DIGITS: &[u8; 16] = b"0123456789ABCDEF";
    for (i, slot) in out.iter_mut().rev().enumerate() {
        *slot = DIGITS[((value >> (4 * i)) & 0xF) as usize];
    }
}
