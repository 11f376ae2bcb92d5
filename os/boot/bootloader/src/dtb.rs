//! # Flattened Device Tree Header
//!
//! The firmware passes a flattened device tree (`.dtb`) in `x0`. Only its
//! fixed 40-byte header is decoded here: ten big-endian `u32` fields.

use core::fmt;

pub const FDT_MAGIC: u32 = 0xD00D_FEED;

pub const FDT_HEADER_LEN: usize = 40;

#[derive(Debug, Copy, Clone, Eq, PartialEq, thiserror::Error)]
pub enum FdtError {
    #[error("header needs {FDT_HEADER_LEN} bytes, got {len}")]
    Truncated { len: usize },
    #[error("magic is {magic:#010x}, expected {FDT_MAGIC:#010x}")]
    BadMagic { magic: u32 },
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct FdtHeader {
    pub magic: u32,
    /// Size of the whole blob.
    pub totalsize: u32,
    pub off_dt_struct: u32,
    pub off_dt_strings: u32,
    pub off_mem_rsvmap: u32,
    pub version: u32,
    pub last_comp_version: u32,
    pub boot_cpuid_phys: u32,
    pub size_dt_strings: u32,
    pub size_dt_struct: u32,
}

impl FdtHeader {
    /// Decode the header at the start of `bytes`.
    ///
    /// # Errors
    /// Fewer than [`FDT_HEADER_LEN`] bytes, or a wrong magic.
    pub fn parse(bytes: &[u8]) -> Result<Self, FdtError> {
        let Some(header) = bytes.first_chunk::<FDT_HEADER_LEN>() else {
            return Err(FdtError::Truncated { len: bytes.len() });
        };

        let mut words = header
            .chunks_exact(4)
            .map(|w| u32::from_be_bytes([w[0], w[1], w[2], w[3]]));
        let mut next = || words.next().unwrap_or_default();

        let header = Self {
            magic: next(),
            totalsize: next(),
            off_dt_struct: next(),
            off_dt_strings: next(),
            off_mem_rsvmap: next(),
            version: next(),
            last_comp_version: next(),
            boot_cpuid_phys: next(),
            size_dt_strings: next(),
            size_dt_struct: next(),
        };

        if header.magic != FDT_MAGIC {
            return Err(FdtError::BadMagic {
                magic: header.magic,
            });
        }
        Ok(header)
    }

    /// Field names and values in header order.
    #[must_use]
    pub const fn fields(&self) -> [(&'static str, u32); 10] {
        [
            ("magic", self.magic),
            ("totalsize", self.totalsize),
            ("off_dt_struct", self.off_dt_struct),
            ("off_dt_strings", self.off_dt_strings),
            ("off_mem_rsvmap", self.off_mem_rsvmap),
            ("version", self.version),
            ("last_comp_version", self.last_comp_version),
            ("boot_cpuid_phys", self.boot_cpuid_phys),
            ("size_dt_strings", self.size_dt_strings),
            ("size_dt_struct", self.size_dt_struct),
        ]
    }
}

/// One field per line, `name : 0x........`, console line endings.
impl fmt::Display for FdtHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, value) in self.fields() {
            write!(f, "{name:<17} : {value:#010x}\r\n")?;
        }
        Ok(())
    }
}
