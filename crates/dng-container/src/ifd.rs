//! Image file directories

use crate::FieldType;
use dng_bitstream::ByteScanner;
use dng_core::DngResult;

/// Size of one directory entry in bytes
pub const ENTRY_LEN: usize = 12;

/// One directory entry; its value is resolved lazily
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagEntry {
    pub tag: u16,
    pub field_type: u16,
    pub value_count: u32,
    /// Absolute offset of the 4-byte value slot inside the entry
    pub inline_offset: usize,
    /// The value slot interpreted as an absolute offset
    pub value_offset: u32,
}

impl TagEntry {
    pub fn field_type(&self) -> FieldType {
        FieldType::from_code(self.field_type)
    }

    /// Total byte length of the value, `None` for unknown types or overflow
    pub fn byte_len(&self) -> Option<usize> {
        self.field_type()
            .size()?
            .checked_mul(self.value_count as usize)
    }

    /// Where the value bytes start: inline when they fit in four bytes
    pub fn value_position(&self) -> Option<usize> {
        let len = self.byte_len()?;
        Some(if len <= 4 {
            self.inline_offset
        } else {
            self.value_offset as usize
        })
    }
}

/// A directory of tagged entries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ifd {
    pub entries: Vec<TagEntry>,
    /// Offset of the next sibling directory, 0 when none
    pub next_directory: u32,
    pub own_offset: u32,
    /// Offset of the directory whose SubIFDs listed this one
    pub parent_offset: Option<u32>,
}

impl Ifd {
    /// Read the directory at `offset`
    pub fn read(scanner: &ByteScanner<'_>, offset: u32, parent_offset: Option<u32>) -> DngResult<Self> {
        let mut s = scanner.clone();
        s.seek(offset as usize);

        let entry_count = s.u16()?;
        let mut entries = Vec::with_capacity(entry_count as usize);
        for _ in 0..entry_count {
            let tag = s.u16()?;
            let field_type = s.u16()?;
            let value_count = s.u32()?;
            let inline_offset = s.offset();
            let value_offset = s.u32()?;
            entries.push(TagEntry {
                tag,
                field_type,
                value_count,
                inline_offset,
                value_offset,
            });
        }
        let next_directory = s.u32()?;

        Ok(Self {
            entries,
            next_directory,
            own_offset: offset,
            parent_offset,
        })
    }

    /// First entry with `tag`
    pub fn entry(&self, tag: u16) -> Option<&TagEntry> {
        self.entries.iter().find(|e| e.tag == tag)
    }

    pub fn has(&self, tag: u16) -> bool {
        self.entry(tag).is_some()
    }
}
