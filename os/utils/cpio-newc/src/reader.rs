//! # Archive Reader
//!
//! [`Archive`] is a view over a bounded byte slice. Iteration is lazy and
//! restartable: every call to [`Archive::entries`] walks from the first
//! record again, and stops at the trailer or at the first corrupt record.

use crate::header::{Header, HeaderError};
use crate::hex::HexError;
use crate::{ALIGNMENT, HEADER_LEN, TRAILER};
use boot_addresses::checked_align_up;

/// The archive is corrupt. `offset` is the start of the offending record,
/// relative to the start of the archive.
#[derive(Debug, Copy, Clone, Eq, PartialEq, thiserror::Error)]
pub enum ArchiveError {
    #[error("record at {offset:#x} is cut off by the end of the archive region")]
    Truncated { offset: usize },
    #[error("no trailer record before the end of the archive region at {offset:#x}")]
    MissingTrailer { offset: usize },
    #[error("record at {offset:#x} has no newc magic")]
    BadMagic { offset: usize },
    #[error("record at {offset:#x}: field `{field}`: {source}")]
    InvalidField {
        offset: usize,
        field: &'static str,
        #[source]
        source: HexError,
    },
    #[error("record at {offset:#x} has an empty name")]
    EmptyName { offset: usize },
    #[error("record at {offset:#x} has a name without NUL terminator")]
    NameNotTerminated { offset: usize },
    #[error("record at {offset:#x} extends past the end of the archive region")]
    OutOfBounds { offset: usize },
}

/// One file record. The trailer is never yielded as an entry.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Entry<'a> {
    offset: usize,
    header: Header,
    name: &'a [u8],
    data: &'a [u8],
}

impl<'a> Entry<'a> {
    /// File name, without the NUL terminator.
    #[must_use]
    pub const fn name(&self) -> &'a [u8] {
        self.name
    }

    /// File content; empty for directories and empty files.
    #[must_use]
    pub const fn data(&self) -> &'a [u8] {
        self.data
    }

    #[must_use]
    pub const fn header(&self) -> &Header {
        &self.header
    }

    /// Offset of the record header within the archive.
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.offset
    }
}

/// Parsed archive view over an in-memory blob.
#[derive(Debug, Copy, Clone)]
pub struct Archive<'a> {
    blob: &'a [u8],
}

/// Iterator over the records of an [`Archive`]; yields `Result` per entry
/// and is fused after the trailer or the first error.
#[derive(Debug, Clone)]
pub struct Entries<'a> {
    blob: &'a [u8],
    offset: usize,
    done: bool,
}

/// A decoded record plus the offset of the record following it.
struct Record<'a> {
    entry: Entry<'a>,
    next: usize,
}

impl<'a> Archive<'a> {
    /// View `blob` as an archive. `blob` bounds every read: its length is
    /// the size of the archive region, not necessarily of the archive.
    ///
    /// The start of `blob` must be 4-byte aligned in memory for the
    /// padding to match what the writer produced.
    #[must_use]
    pub const fn new(blob: &'a [u8]) -> Self {
        Self { blob }
    }

    #[must_use]
    pub const fn entries(&self) -> Entries<'a> {
        Entries {
            blob: self.blob,
            offset: 0,
            done: false,
        }
    }

    /// Find a file by exact name; the first match wins.
    ///
    /// `Ok(None)` means the trailer was reached without a match. An empty
    /// file is `Ok(Some(entry))` with empty [`Entry::data`].
    ///
    /// # Errors
    /// The archive is corrupt before a match or the trailer was found.
    pub fn find(&self, name: &[u8]) -> Result<Option<Entry<'a>>, ArchiveError> {
        for entry in self.entries() {
            let entry = entry?;
            if entry.name() == name {
                return Ok(Some(entry));
            }
        }
        Ok(None)
    }

    /// All file names in archive order.
    pub fn names(&self) -> impl Iterator<Item = Result<&'a [u8], ArchiveError>> + use<'a> {
        self.entries().map(|entry| entry.map(|e| e.name()))
    }

    /// Walk the whole archive and return the number of entries.
    ///
    /// # Errors
    /// The first corruption encountered.
    pub fn validate(&self) -> Result<usize, ArchiveError> {
        self.entries().try_fold(0, |count, entry| entry.map(|_| count + 1))
    }
}

impl<'a> Entries<'a> {
    fn parse_record(&self) -> Result<Option<Record<'a>>, ArchiveError> {
        use ArchiveError::{
            BadMagic, EmptyName, InvalidField, MissingTrailer, NameNotTerminated, OutOfBounds,
            Truncated,
        };
        let offset = self.offset;
        let blob = self.blob;

        if offset >= blob.len() {
            return Err(MissingTrailer { offset });
        }

        let header = Header::parse(&blob[offset..]).map_err(|e| match e {
            HeaderError::Truncated => Truncated { offset },
            HeaderError::BadMagic => BadMagic { offset },
            HeaderError::InvalidField { field, source } => InvalidField {
                offset,
                field,
                source,
            },
        })?;

        // Name: right after the header, NUL-terminated within namesize.
        let namesize = header.namesize as usize;
        if namesize == 0 {
            return Err(EmptyName { offset });
        }
        let name_start = offset + HEADER_LEN;
        let name_end = name_start.checked_add(namesize).ok_or(OutOfBounds { offset })?;
        let raw_name = blob.get(name_start..name_end).ok_or(OutOfBounds { offset })?;
        let nul = raw_name
            .iter()
            .position(|&b| b == 0)
            .ok_or(NameNotTerminated { offset })?;
        let name = &raw_name[..nul];

        if name == TRAILER {
            return Ok(None);
        }

        // Data: after the name, aligned up.
        let data_start = checked_align_up(name_end, ALIGNMENT).ok_or(OutOfBounds { offset })?;
        let data_end = data_start
            .checked_add(header.filesize as usize)
            .ok_or(OutOfBounds { offset })?;
        let data = blob.get(data_start..data_end).ok_or(OutOfBounds { offset })?;

        let next = checked_align_up(data_end, ALIGNMENT).ok_or(OutOfBounds { offset })?;

        Ok(Some(Record {
            entry: Entry {
                offset,
                header,
                name,
                data,
            },
            next,
        }))
    }
}

impl<'a> Iterator for Entries<'a> {
    type Item = Result<Entry<'a>, ArchiveError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match self.parse_record() {
            Ok(Some(record)) => {
                self.offset = record.next;
                Some(Ok(record.entry))
            }
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

impl core::iter::FusedIterator for Entries<'_> {}
