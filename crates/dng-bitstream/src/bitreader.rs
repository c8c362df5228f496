//! MSB-first bit reader with a 16-bit lookahead

use dng_core::{DngError, DngResult};

/// Value assumed for bytes past the end of the buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Padding {
    #[default]
    Ones,
    Zeros,
}

impl Padding {
    fn byte(self) -> u8 {
        match self {
            Padding::Ones => 0xFF,
            Padding::Zeros => 0x00,
        }
    }
}

/// A bit cursor over a borrowed byte buffer
///
/// Reads never fail at the end of the buffer; missing bytes read as padding.
/// Callers detect truncation by comparing [`BitReader::byte_offset`] with the
/// buffer length.
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    data: &'a [u8],
    byte_offset: usize,
    bit_offset: usize,
    padding: Padding,
}

impl<'a> BitReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self::with_padding(data, Padding::default())
    }

    pub fn with_padding(data: &'a [u8], padding: Padding) -> Self {
        Self {
            data,
            byte_offset: 0,
            bit_offset: 0,
            padding,
        }
    }

    pub fn byte_offset(&self) -> usize {
        self.byte_offset
    }

    /// Bit position inside the current byte, in `0..8`
    pub fn bit_offset(&self) -> usize {
        self.bit_offset
    }

    pub fn is_exhausted(&self) -> bool {
        self.byte_offset >= self.data.len()
    }

    #[inline]
    fn byte_at(&self, index: usize) -> u32 {
        self.data.get(index).copied().unwrap_or(self.padding.byte()) as u32
    }

    /// The next 16 bits, most significant first, without moving the cursor
    #[inline]
    pub fn peek16(&self) -> u16 {
        let window = (self.byte_at(self.byte_offset) << 16)
            | (self.byte_at(self.byte_offset + 1) << 8)
            | self.byte_at(self.byte_offset + 2);
        ((window >> (8 - self.bit_offset)) & 0xFFFF) as u16
    }

    #[inline]
    pub fn advance(&mut self, bits: usize) {
        let total = self.bit_offset + bits;
        self.byte_offset += total / 8;
        self.bit_offset = total % 8;
    }

    /// Read up to 16 bits
    pub fn read_bits(&mut self, num_bits: usize) -> DngResult<u16> {
        if num_bits > 16 {
            return Err(DngError::InvalidParameter(format!(
                "cannot read {num_bits} bits at once (max 16)"
            )));
        }
        if num_bits == 0 {
            return Ok(0);
        }
        let value = self.peek16() >> (16 - num_bits);
        self.advance(num_bits);
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STREAM: [u8; 5] = [0b10110000, 0b01011011, 0b11111111, 0b00100000, 0b00000000];

    #[test]
    fn test_peek_at_start() {
        let reader = BitReader::new(&STREAM);
        assert_eq!(reader.peek16(), 0b1011000001011011);
    }

    #[test]
    fn test_peek_after_one_bit() {
        let mut reader = BitReader::new(&STREAM);
        reader.advance(1);
        assert_eq!(reader.peek16(), 0b0110000010110111);
        assert_eq!((reader.byte_offset(), reader.bit_offset()), (0, 1));
    }

    #[test]
    fn test_peek_across_bytes() {
        let mut reader = BitReader::new(&STREAM);
        reader.advance(8);
        assert_eq!(reader.peek16(), 0b0101101111111111);
        reader.advance(12);
        assert_eq!((reader.byte_offset(), reader.bit_offset()), (2, 4));
        assert_eq!(reader.peek16(), 0b1111001000000000);
    }

    #[test]
    fn test_padding_past_end() {
        let mut ones = BitReader::new(&STREAM);
        ones.advance(32);
        assert_eq!(ones.peek16(), 0b0000000011111111);
        ones.advance(8);
        assert!(ones.is_exhausted());
        assert_eq!(ones.peek16(), 0xFFFF);

        let mut zeros = BitReader::with_padding(&STREAM, Padding::Zeros);
        zeros.advance(40);
        assert_eq!(zeros.peek16(), 0);
    }

    #[test]
    fn test_read_bits() {
        let mut reader = BitReader::new(&STREAM);
        assert_eq!(reader.read_bits(3).unwrap(), 0b101);
        assert_eq!(reader.read_bits(5).unwrap(), 0b10000);
        assert_eq!(reader.read_bits(0).unwrap(), 0);
        assert_eq!(reader.read_bits(16).unwrap(), 0b0101101111111111);
        assert!(reader.read_bits(17).is_err());
    }
}
