//! TIFF-EP / DNG container parsing
//!
//! A DNG file is a TIFF file whose directories form a forest: the root chain
//! is linked through each directory's next offset, and the `SubIFDs` tag
//! points at child directories (the raw image usually lives in one of them).
//!
//! Parsing is lenient about the header and the directory walk: a bad
//! byte-order mark, an unexpected version, an unreadable directory, or too
//! many directories are recorded in [`TiffContainer::problems`] and parsing
//! carries on. Missing or malformed tags are reported when they are read.

pub mod area;
pub mod dump;
pub mod field;
pub mod ifd;
pub mod segments;
pub mod tags;

pub use area::{active_area, cfa_pattern, repeat_dim};
pub use dump::{DirectoryDump, EntryDump, TagValue};
pub use field::FieldType;
pub use ifd::{Ifd, TagEntry};
pub use segments::{read_image_segments, ImageSegment};

use dng_bitstream::ByteScanner;
use dng_core::consts::{MAX_DIRECTORIES, TIFF_VERSION};
use dng_core::{ByteOrder, DngError, DngResult};
use std::collections::VecDeque;
use tracing::{debug, warn};

/// Options for [`TiffContainer::parse_with`]
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Byte order assumed when the byte-order mark is unrecognized
    pub fallback_byte_order: ByteOrder,
    /// Upper bound on the number of directories walked
    pub max_directories: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            fallback_byte_order: ByteOrder::LittleEndian,
            max_directories: MAX_DIRECTORIES,
        }
    }
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fallback_byte_order(mut self, byte_order: ByteOrder) -> Self {
        self.fallback_byte_order = byte_order;
        self
    }

    pub fn max_directories(mut self, max: usize) -> Self {
        self.max_directories = max.max(1);
        self
    }
}

/// A parsed TIFF container
#[derive(Debug, Clone)]
pub struct TiffContainer<'a> {
    pub byte_order: ByteOrder,
    /// Directories in breadth-first order
    pub directories: Vec<Ifd>,
    /// Recoverable problems found while parsing
    pub problems: Vec<String>,
    pub scanner: ByteScanner<'a>,
}

impl<'a> TiffContainer<'a> {
    pub fn parse(data: &'a [u8]) -> DngResult<Self> {
        Self::parse_with(data, ParseOptions::default())
    }

    pub fn parse_with(data: &'a [u8], options: ParseOptions) -> DngResult<Self> {
        let mut problems = Vec::new();
        let mut scanner = ByteScanner::new(data);

        let mark = [scanner.u8()?, scanner.u8()?];
        let byte_order = match ByteOrder::from_mark(mark) {
            Some(order) => order,
            None => {
                let fallback = options.fallback_byte_order;
                problems.push(format!(
                    "invalid byte-order mark at offset 0: {:#04x} {:#04x} (expected II or MM); falling back to {:?}",
                    mark[0], mark[1], fallback
                ));
                fallback
            }
        };
        scanner.set_byte_order(byte_order);

        let version = scanner.u16()?;
        if version != TIFF_VERSION {
            problems.push(format!(
                "unexpected TIFF version at offset 2: {version} (expected {TIFF_VERSION})"
            ));
        }

        let first_offset = scanner.u32()?;
        let directories = walk_directories(&scanner, first_offset, options.max_directories, &mut problems);

        for problem in &problems {
            warn!("{}", problem);
        }
        debug!(
            ?byte_order,
            directories = directories.len(),
            problems = problems.len(),
            "parsed TIFF container"
        );

        Ok(Self {
            byte_order,
            directories,
            problems,
            scanner,
        })
    }

    /// A view of directory `index` for typed tag queries
    pub fn view(&self, index: usize) -> Option<IfdView<'_, 'a>> {
        self.directories.get(index).map(|ifd| IfdView {
            container: self,
            ifd,
        })
    }

    /// Index of the last directory with `NewSubfileType == 0`
    pub fn raw_directory_index(&self) -> Option<usize> {
        (0..self.directories.len())
            .rev()
            .find(|&i| self.view(i).map(|v| v.is_raw()).unwrap_or(false))
    }

    fn value_scanner(&self, entry: &TagEntry) -> DngResult<Option<(FieldType, ByteScanner<'a>)>> {
        let field_type = entry.field_type();
        let (Some(len), Some(position)) = (entry.byte_len(), entry.value_position()) else {
            return Ok(None);
        };
        let view = self.scanner.slice(position, len)?;
        Ok(Some((field_type, view)))
    }

    /// Decode an ASCII value, dropping trailing NULs
    pub fn read_ascii(&self, entry: &TagEntry) -> DngResult<Option<String>> {
        if entry.field_type() != FieldType::Ascii {
            return Ok(None);
        }
        let Some((_, mut s)) = self.value_scanner(entry)? else {
            return Ok(None);
        };
        let bytes = s.bytes(entry.value_count as usize)?;
        let text = String::from_utf8_lossy(bytes);
        Ok(Some(text.trim_end_matches('\0').to_string()))
    }

    /// Decode integer values; `None` when the entry is not an integer type
    pub fn read_ints(&self, entry: &TagEntry) -> DngResult<Option<Vec<i64>>> {
        if !entry.field_type().is_int() {
            return Ok(None);
        }
        let Some((field_type, mut s)) = self.value_scanner(entry)? else {
            return Ok(None);
        };
        let mut out = Vec::with_capacity(entry.value_count as usize);
        for _ in 0..entry.value_count {
            out.push(read_int(&mut s, field_type)?);
        }
        Ok(Some(out))
    }

    /// Decode real values; integer types are accepted and widened
    pub fn read_reals(&self, entry: &TagEntry) -> DngResult<Option<Vec<f64>>> {
        let field_type = entry.field_type();
        if !field_type.is_real() && !field_type.is_int() {
            return Ok(None);
        }
        let Some((field_type, mut s)) = self.value_scanner(entry)? else {
            return Ok(None);
        };
        let mut out = Vec::with_capacity(entry.value_count as usize);
        for _ in 0..entry.value_count {
            let value = match field_type {
                FieldType::F32 => s.f32()? as f64,
                FieldType::F64 => s.f64()?,
                FieldType::Rational => {
                    let (n, d) = s.rational()?;
                    n as f64 / d as f64
                }
                FieldType::SRational => {
                    let (n, d) = s.srational()?;
                    n as f64 / d as f64
                }
                _ => read_int(&mut s, field_type)? as f64,
            };
            out.push(value);
        }
        Ok(Some(out))
    }

    /// Raw bytes of a `U8` or `Undefined` entry
    pub fn read_bytes(&self, entry: &TagEntry) -> DngResult<Option<Vec<u8>>> {
        if !matches!(entry.field_type(), FieldType::U8 | FieldType::Undefined) {
            return Ok(None);
        }
        let Some((_, mut s)) = self.value_scanner(entry)? else {
            return Ok(None);
        };
        Ok(Some(s.bytes(entry.value_count as usize)?.to_vec()))
    }
}

fn read_int(s: &mut ByteScanner<'_>, field_type: FieldType) -> DngResult<i64> {
    Ok(match field_type {
        FieldType::U8 => s.u8()? as i64,
        FieldType::I8 => s.i8()? as i64,
        FieldType::U16 => s.u16()? as i64,
        FieldType::I16 => s.i16()? as i64,
        FieldType::I32 => s.i32()? as i64,
        _ => s.u32()? as i64,
    })
}

/// Breadth-first walk over root siblings and SubIFDs children
///
/// The directory bound alone guarantees termination, including on cyclic
/// offsets.
fn walk_directories(
    scanner: &ByteScanner<'_>,
    first_offset: u32,
    max_directories: usize,
    problems: &mut Vec<String>,
) -> Vec<Ifd> {
    let mut directories: Vec<Ifd> = Vec::new();
    let mut queue: VecDeque<(u32, Option<u32>)> = VecDeque::new();
    if first_offset != 0 {
        queue.push_back((first_offset, None));
    }

    while let Some((offset, parent)) = queue.pop_front() {
        if directories.len() >= max_directories {
            problems.push(format!(
                "directory limit of {max_directories} reached; {} pending directories ignored",
                queue.len() + 1
            ));
            break;
        }

        let ifd = match Ifd::read(scanner, offset, parent) {
            Ok(ifd) => ifd,
            Err(err) => {
                problems.push(format!("unreadable directory at offset {offset}: {err}"));
                continue;
            }
        };

        if let Some(entry) = ifd.entry(tags::SUB_IFDS) {
            match sub_ifd_offsets(scanner, entry) {
                Ok(children) => {
                    for child in children.into_iter().filter(|&c| c != 0) {
                        queue.push_back((child, Some(offset)));
                    }
                }
                Err(err) => problems.push(format!(
                    "unreadable SubIFDs in directory at offset {offset}: {err}"
                )),
            }
        }
        if ifd.next_directory != 0 {
            queue.push_back((ifd.next_directory, parent));
        }

        directories.push(ifd);
    }

    directories
}

fn sub_ifd_offsets(scanner: &ByteScanner<'_>, entry: &TagEntry) -> DngResult<Vec<u32>> {
    let field_type = entry.field_type();
    if !matches!(field_type, FieldType::U32 | FieldType::Ifd | FieldType::U16) {
        return Err(DngError::invalid_tag(
            "SubIFDs",
            format!("unexpected field type {}", field_type.name()),
        ));
    }
    let (Some(len), Some(position)) = (entry.byte_len(), entry.value_position()) else {
        return Ok(Vec::new());
    };
    let mut s = scanner.slice(position, len)?;
    (0..entry.value_count)
        .map(|_| match field_type {
            FieldType::U16 => s.u16().map(u32::from),
            _ => s.u32(),
        })
        .collect()
}

/// Typed, tag-oriented access to one directory
///
/// Absent tags are `Ok(None)`; a tag present with an unusable type or count
/// is an error naming the tag.
#[derive(Debug, Clone, Copy)]
pub struct IfdView<'c, 'a> {
    pub container: &'c TiffContainer<'a>,
    pub ifd: &'c Ifd,
}

impl<'c, 'a> IfdView<'c, 'a> {
    pub fn has(&self, tag: u16) -> bool {
        self.ifd.has(tag)
    }

    pub fn is_raw(&self) -> bool {
        matches!(self.int(tags::NEW_SUBFILE_TYPE), Ok(Some(tags::SUBFILE_RAW)))
    }

    pub fn ascii(&self, tag: u16) -> DngResult<Option<String>> {
        let Some(entry) = self.ifd.entry(tag) else {
            return Ok(None);
        };
        match self.container.read_ascii(entry) {
            Ok(Some(text)) => Ok(Some(text)),
            Ok(None) => Err(wrong_type(tag, entry)),
            Err(err) => Err(err.for_tag(tags::display_name(tag))),
        }
    }

    pub fn ints(&self, tag: u16) -> DngResult<Option<Vec<i64>>> {
        let Some(entry) = self.ifd.entry(tag) else {
            return Ok(None);
        };
        match self.container.read_ints(entry) {
            Ok(Some(values)) => Ok(Some(values)),
            Ok(None) => Err(wrong_type(tag, entry)),
            Err(err) => Err(err.for_tag(tags::display_name(tag))),
        }
    }

    pub fn reals(&self, tag: u16) -> DngResult<Option<Vec<f64>>> {
        let Some(entry) = self.ifd.entry(tag) else {
            return Ok(None);
        };
        match self.container.read_reals(entry) {
            Ok(Some(values)) => Ok(Some(values)),
            Ok(None) => Err(wrong_type(tag, entry)),
            Err(err) => Err(err.for_tag(tags::display_name(tag))),
        }
    }

    /// Integer values, also accepting `Undefined` bytes (as in CFAPattern)
    pub fn ints_or_bytes(&self, tag: u16) -> DngResult<Option<Vec<i64>>> {
        let Some(entry) = self.ifd.entry(tag) else {
            return Ok(None);
        };
        if entry.field_type() == FieldType::Undefined {
            return match self.container.read_bytes(entry) {
                Ok(bytes) => Ok(bytes.map(|b| b.into_iter().map(i64::from).collect())),
                Err(err) => Err(err.for_tag(tags::display_name(tag))),
            };
        }
        self.ints(tag)
    }

    /// First integer value
    pub fn int(&self, tag: u16) -> DngResult<Option<i64>> {
        match self.ints(tag)? {
            None => Ok(None),
            Some(values) => values
                .first()
                .copied()
                .map(Some)
                .ok_or_else(|| DngError::invalid_tag(tags::display_name(tag), "no values")),
        }
    }

    pub fn required_int(&self, tag: u16) -> DngResult<i64> {
        self.int(tag)?
            .ok_or_else(|| DngError::missing_tag(tags::display_name(tag)))
    }

    pub fn required_ints(&self, tag: u16) -> DngResult<Vec<i64>> {
        self.ints(tag)?
            .ok_or_else(|| DngError::missing_tag(tags::display_name(tag)))
    }

    /// Real values that must number exactly `count` when present
    pub fn reals_exact(&self, tag: u16, count: usize) -> DngResult<Option<Vec<f64>>> {
        match self.reals(tag)? {
            Some(values) if values.len() != count => Err(DngError::invalid_tag(
                tags::display_name(tag),
                format!("expected {count} values, found {}", values.len()),
            )),
            other => Ok(other),
        }
    }
}

fn wrong_type(tag: u16, entry: &TagEntry) -> DngError {
    DngError::invalid_tag(
        tags::display_name(tag),
        format!("unexpected field type {}", entry.field_type().name()),
    )
}
