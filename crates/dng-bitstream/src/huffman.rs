//! Canonical Huffman tables for lossless JPEG

use crate::BitReader;
use dng_core::{DngError, DngResult};

/// A single code, stored left-aligned in 16 bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HuffmanCode<T> {
    pub msb_aligned_code: u16,
    pub msb_aligned_mask: u16,
    pub bit_length: u8,
    pub value: T,
}

/// An ordered list of codes decoded by first match against the lookahead
#[derive(Debug, Clone)]
pub struct HuffmanTable<T> {
    codes: Vec<HuffmanCode<T>>,
}

impl<T: Copy> HuffmanTable<T> {
    /// Build a table from explicit `(code, bit_length, value)` triples
    pub fn from_codes<I>(codes: I) -> DngResult<Self>
    where
        I: IntoIterator<Item = (u16, u8, T)>,
    {
        let mut table = Vec::new();
        for (code, bit_length, value) in codes {
            if !(1..=16).contains(&bit_length) {
                return Err(DngError::InvalidParameter(format!(
                    "Huffman code length {bit_length} outside 1..=16"
                )));
            }
            if (code as u32) >> bit_length != 0 {
                return Err(DngError::InvalidParameter(format!(
                    "Huffman code {code:#b} does not fit in {bit_length} bits"
                )));
            }
            table.push(HuffmanCode {
                msb_aligned_code: ((code as u32) << (16 - bit_length)) as u16,
                msb_aligned_mask: ((((1u32 << bit_length) - 1) << (16 - bit_length)) & 0xFFFF)
                    as u16,
                bit_length,
                value,
            });
        }
        Ok(Self { codes: table })
    }

    /// Assign canonical codes from per-length counts (JPEG Annex C)
    ///
    /// `counts[i]` is the number of codes of length `i + 1`; `values` lists
    /// the symbols in code order.
    ///
    /// An over-subscribed table is rejected as soon as a code no longer fits
    /// its length: such a code would overflow into the next length and
    /// alias an earlier prefix, so every decode through it would be wrong.
    /// Under-subscribed tables are accepted; their unused codes fail at
    /// decode time.
    pub fn canonical(counts: &[u8; 16], values: &[T]) -> DngResult<Self> {
        let total: usize = counts.iter().map(|&n| n as usize).sum();
        if total != values.len() {
            return Err(DngError::InvalidParameter(format!(
                "Huffman counts sum to {total} but {} values were given",
                values.len()
            )));
        }

        let mut triples = Vec::with_capacity(total);
        let mut code: u32 = 0;
        let mut next_value = values.iter();
        for (i, &count) in counts.iter().enumerate() {
            let bit_length = (i + 1) as u8;
            if count as u32 > 1u32 << bit_length {
                return Err(DngError::InvalidParameter(format!(
                    "{count} Huffman codes of length {bit_length} exceed {}",
                    1u32 << bit_length
                )));
            }
            for _ in 0..count {
                if code >> bit_length != 0 {
                    return Err(DngError::InvalidParameter(format!(
                        "Huffman code space exhausted at length {bit_length}"
                    )));
                }
                // Counts sum to values.len(), so the iterator cannot run dry
                if let Some(&value) = next_value.next() {
                    triples.push((code as u16, bit_length, value));
                }
                code += 1;
            }
            code <<= 1;
        }

        Self::from_codes(triples)
    }

    pub fn codes(&self) -> &[HuffmanCode<T>] {
        &self.codes
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Decode one value and advance the reader past its code
    pub fn decode(&self, reader: &mut BitReader<'_>) -> DngResult<T> {
        let lookahead = reader.peek16();
        for code in &self.codes {
            if (lookahead ^ code.msb_aligned_code) & code.msb_aligned_mask == 0 {
                reader.advance(code.bit_length as usize);
                return Ok(code.value);
            }
        }
        Err(DngError::InvalidHuffmanCode {
            byte_offset: reader.byte_offset(),
            bit_offset: reader.bit_offset(),
            lookahead,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(lengths: &[(usize, u8)]) -> [u8; 16] {
        let mut c = [0u8; 16];
        for &(len, n) in lengths {
            c[len - 1] = n;
        }
        c
    }

    #[test]
    fn test_canonical_assignment() {
        // Two codes of length 2, three of length 3
        let table = HuffmanTable::canonical(&counts(&[(2, 2), (3, 3)]), &[0u8, 1, 2, 3, 4]).unwrap();
        let assigned: Vec<(u16, u8)> = table
            .codes()
            .iter()
            .map(|c| (c.msb_aligned_code >> (16 - c.bit_length), c.bit_length))
            .collect();
        assert_eq!(assigned, vec![(0b00, 2), (0b01, 2), (0b100, 3), (0b101, 3), (0b110, 3)]);
    }

    #[test]
    fn test_dng_style_table() {
        // One code per length 1..=9, as written by common raw converters
        let values = [0u8, 2, 3, 1, 4, 11, 10, 5, 15];
        let table = HuffmanTable::canonical(&counts(&[
            (1, 1),
            (2, 1),
            (3, 1),
            (4, 1),
            (5, 1),
            (6, 1),
            (7, 1),
            (8, 1),
            (9, 1),
        ]), &values)
        .unwrap();

        // 0 -> value 0, 10 -> value 2, 110 -> value 3
        let data = [0b0101_1000, 0b0000_0000];
        let mut reader = BitReader::new(&data);
        assert_eq!(table.decode(&mut reader).unwrap(), 0);
        assert_eq!(table.decode(&mut reader).unwrap(), 2);
        assert_eq!(table.decode(&mut reader).unwrap(), 3);
        assert_eq!((reader.byte_offset(), reader.bit_offset()), (0, 6));
    }

    #[test]
    fn test_too_many_codes_for_length() {
        assert!(HuffmanTable::canonical(&counts(&[(1, 3)]), &[0u8, 1, 2]).is_err());
    }

    #[test]
    fn test_over_subscribed_table() {
        // Both one-bit codes are taken, so no two-bit code is left
        let err = HuffmanTable::canonical(&counts(&[(1, 2), (2, 1)]), &[0u8, 1, 2]).unwrap_err();
        assert!(err.to_string().contains("exhausted at length 2"));
        // Leaving code space unused is fine
        assert!(HuffmanTable::canonical(&counts(&[(1, 1), (2, 1)]), &[0u8, 1]).is_ok());
    }

    #[test]
    fn test_count_value_mismatch() {
        assert!(HuffmanTable::canonical(&counts(&[(2, 2)]), &[0u8]).is_err());
    }

    #[test]
    fn test_sixteen_bit_code() {
        let table = HuffmanTable::from_codes([(0xFFFEu16, 16u8, 7u8)]).unwrap();
        let data = [0xFF, 0xFE];
        let mut reader = BitReader::new(&data);
        assert_eq!(table.decode(&mut reader).unwrap(), 7);
        assert_eq!(reader.byte_offset(), 2);
    }

    #[test]
    fn test_no_match_reports_position() {
        let table = HuffmanTable::from_codes([(0b0u16, 1u8, 1u8)]).unwrap();
        let data = [0b0111_1111];
        let mut reader = BitReader::new(&data);
        assert_eq!(table.decode(&mut reader).unwrap(), 1);
        match table.decode(&mut reader) {
            Err(DngError::InvalidHuffmanCode {
                byte_offset,
                bit_offset,
                lookahead,
            }) => {
                assert_eq!((byte_offset, bit_offset), (0, 1));
                assert_eq!(lookahead, 0xFFFF);
            }
            other => panic!("expected InvalidHuffmanCode, got {:?}", other),
        }
    }
}
