//! Bounds-checked byte scanner

use byteorder::{BigEndian, ByteOrder as EndianRead, LittleEndian};
use dng_core::{ByteOrder, DngError, DngResult};

/// A cursor over a borrowed byte buffer
///
/// Every read checks `offset + width <= len` before touching the buffer and
/// advances the cursor on success. Multi-byte reads need a byte order.
/// Cloning yields an independent cursor over the same buffer.
#[derive(Debug, Clone)]
pub struct ByteScanner<'a> {
    data: &'a [u8],
    offset: usize,
    byte_order: Option<ByteOrder>,
}

impl<'a> ByteScanner<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            offset: 0,
            byte_order: None,
        }
    }

    pub fn with_byte_order(data: &'a [u8], byte_order: ByteOrder) -> Self {
        Self {
            data,
            offset: 0,
            byte_order: Some(byte_order),
        }
    }

    pub fn byte_order(&self) -> Option<ByteOrder> {
        self.byte_order
    }

    pub fn set_byte_order(&mut self, byte_order: ByteOrder) {
        self.byte_order = Some(byte_order);
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Move the cursor; the position is validated by the next read
    pub fn seek(&mut self, offset: usize) {
        self.offset = offset;
    }

    pub fn skip(&mut self, count: usize) {
        self.offset = self.offset.saturating_add(count);
    }

    fn take(&mut self, primitive: &'static str, width: usize) -> DngResult<&'a [u8]> {
        let end = match self.offset.checked_add(width) {
            Some(end) if end <= self.data.len() => end,
            _ => {
                return Err(DngError::ScannerOutOfBounds {
                    primitive,
                    offset: self.offset,
                    width,
                    len: self.data.len(),
                })
            }
        };
        let bytes = &self.data[self.offset..end];
        self.offset = end;
        Ok(bytes)
    }

    fn read_ordered<T>(
        &mut self,
        primitive: &'static str,
        width: usize,
        little: fn(&[u8]) -> T,
        big: fn(&[u8]) -> T,
    ) -> DngResult<T> {
        let order = self.byte_order.ok_or(DngError::UndefinedByteOrder {
            primitive,
            offset: self.offset,
        })?;
        let bytes = self.take(primitive, width)?;
        Ok(match order {
            ByteOrder::LittleEndian => little(bytes),
            ByteOrder::BigEndian => big(bytes),
        })
    }

    pub fn u8(&mut self) -> DngResult<u8> {
        Ok(self.take("u8", 1)?[0])
    }

    pub fn i8(&mut self) -> DngResult<i8> {
        Ok(self.take("i8", 1)?[0] as i8)
    }

    pub fn u16(&mut self) -> DngResult<u16> {
        self.read_ordered("u16", 2, LittleEndian::read_u16, BigEndian::read_u16)
    }

    pub fn i16(&mut self) -> DngResult<i16> {
        self.read_ordered("i16", 2, LittleEndian::read_i16, BigEndian::read_i16)
    }

    pub fn u32(&mut self) -> DngResult<u32> {
        self.read_ordered("u32", 4, LittleEndian::read_u32, BigEndian::read_u32)
    }

    pub fn i32(&mut self) -> DngResult<i32> {
        self.read_ordered("i32", 4, LittleEndian::read_i32, BigEndian::read_i32)
    }

    pub fn f32(&mut self) -> DngResult<f32> {
        self.read_ordered("f32", 4, LittleEndian::read_f32, BigEndian::read_f32)
    }

    pub fn f64(&mut self) -> DngResult<f64> {
        self.read_ordered("f64", 8, LittleEndian::read_f64, BigEndian::read_f64)
    }

    /// Unsigned rational as (numerator, denominator)
    pub fn rational(&mut self) -> DngResult<(u32, u32)> {
        let numerator = self.u32()?;
        let denominator = self.u32()?;
        Ok((numerator, denominator))
    }

    /// Signed rational as (numerator, denominator)
    pub fn srational(&mut self) -> DngResult<(i32, i32)> {
        let numerator = self.i32()?;
        let denominator = self.i32()?;
        Ok((numerator, denominator))
    }

    /// Read `count` raw bytes
    pub fn bytes(&mut self, count: usize) -> DngResult<&'a [u8]> {
        self.take("bytes", count)
    }

    /// A non-owning view of `byte_count` bytes at `offset`
    ///
    /// The view starts at its own offset 0 and keeps this scanner's byte
    /// order. This scanner's cursor is not moved.
    pub fn slice(&self, offset: usize, byte_count: usize) -> DngResult<ByteScanner<'a>> {
        let mut probe = self.clone();
        probe.seek(offset);
        let data = probe.take("slice", byte_count)?;
        Ok(ByteScanner {
            data,
            offset: 0,
            byte_order: self.byte_order,
        })
    }
}
