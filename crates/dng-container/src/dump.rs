//! Human-readable tag dumps

use crate::{tags, FieldType, TagEntry, TiffContainer};
use dng_core::consts::{DUMP_MAX_INTS, DUMP_MAX_REALS};
use std::fmt;

#[cfg(feature = "serde")]
use serde::Serialize;

/// A decoded entry value
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum TagValue {
    Ascii(String),
    Ints(Vec<i64>),
    Reals(Vec<f64>),
    Bytes(Vec<u8>),
    /// Unknown field type; the value is not decoded
    Opaque,
    /// The value could not be read
    Unreadable(String),
}

impl TagValue {
    fn read(container: &TiffContainer<'_>, entry: &TagEntry) -> Self {
        let result = match entry.field_type() {
            FieldType::Ascii => container.read_ascii(entry).map(|v| v.map(TagValue::Ascii)),
            FieldType::Undefined => container.read_bytes(entry).map(|v| v.map(TagValue::Bytes)),
            t if t.is_int() => container.read_ints(entry).map(|v| v.map(TagValue::Ints)),
            t if t.is_real() => container.read_reals(entry).map(|v| v.map(TagValue::Reals)),
            _ => Ok(None),
        };
        match result {
            Ok(Some(value)) => value,
            Ok(None) => TagValue::Opaque,
            Err(err) => TagValue::Unreadable(err.to_string()),
        }
    }
}

fn write_truncated<T: fmt::Display>(f: &mut fmt::Formatter<'_>, values: &[T], max: usize) -> fmt::Result {
    write!(f, "[")?;
    for (i, v) in values.iter().take(max).enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{v}")?;
    }
    if values.len() > max {
        write!(f, ", ... ({} more)", values.len() - max)?;
    }
    write!(f, "]")
}

impl fmt::Display for TagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagValue::Ascii(s) => write!(f, "{s:?}"),
            TagValue::Ints(v) => write_truncated(f, v, DUMP_MAX_INTS),
            TagValue::Reals(v) => write_truncated(f, v, DUMP_MAX_REALS),
            TagValue::Bytes(v) => {
                let hex: Vec<String> = v.iter().map(|b| format!("{b:02x}")).collect();
                write_truncated(f, &hex, DUMP_MAX_INTS)
            }
            TagValue::Opaque => write!(f, "<opaque>"),
            TagValue::Unreadable(err) => write!(f, "<unreadable: {err}>"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct EntryDump {
    pub tag: u16,
    pub name: Option<&'static str>,
    pub field_type: &'static str,
    pub count: u32,
    pub value: TagValue,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct DirectoryDump {
    pub index: usize,
    pub offset: u32,
    pub parent_offset: Option<u32>,
    /// `NewSubfileType == 0`
    pub is_raw: bool,
    pub entries: Vec<EntryDump>,
}

impl TiffContainer<'_> {
    /// Decode every entry of every directory
    pub fn dump(&self) -> Vec<DirectoryDump> {
        self.directories
            .iter()
            .enumerate()
            .map(|(index, ifd)| DirectoryDump {
                index,
                offset: ifd.own_offset,
                parent_offset: ifd.parent_offset,
                is_raw: self.view(index).map(|v| v.is_raw()).unwrap_or(false),
                entries: ifd
                    .entries
                    .iter()
                    .map(|entry| EntryDump {
                        tag: entry.tag,
                        name: tags::tag_name(entry.tag),
                        field_type: entry.field_type().name(),
                        count: entry.value_count,
                        value: TagValue::read(self, entry),
                    })
                    .collect(),
            })
            .collect()
    }
}

impl fmt::Display for EntryDump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name {
            Some(name) => write!(f, "{name} ({})", self.tag)?,
            None => write!(f, "Unknown ({})", self.tag)?,
        }
        write!(f, ": {} x{} = {}", self.field_type, self.count, self.value)
    }
}

impl fmt::Display for DirectoryDump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IFD #{} @ {}", self.index, self.offset)?;
        if let Some(parent) = self.parent_offset {
            write!(f, " (child of {parent})")?;
        }
        if self.is_raw {
            write!(f, " [raw]")?;
        }
        writeln!(f)?;
        for entry in &self.entries {
            writeln!(f, "  {entry}")?;
        }
        Ok(())
    }
}
