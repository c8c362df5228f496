//! DHT segments

use dng_bitstream::HuffmanTable;
use dng_core::consts::MAX_HUFFMAN_TABLES;
use dng_core::{DngError, DngResult};
use tracing::debug;

/// DC Huffman table slots filled by DHT segments
///
/// Values are magnitude categories (SSSS) in `0..=16`.
#[derive(Debug, Clone, Default)]
pub struct HuffmanTables {
    slots: [Option<HuffmanTable<u8>>; MAX_HUFFMAN_TABLES],
}

impl HuffmanTables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: u8) -> Option<&HuffmanTable<u8>> {
        self.slots.get(id as usize).and_then(|slot| slot.as_ref())
    }

    /// Parse every table in a DHT body; later definitions replace earlier ones
    pub fn read_segment(&mut self, body: &[u8]) -> DngResult<()> {
        let invalid = |reason: String| DngError::invalid_header("DHT", reason);
        let mut pos = 0;

        if body.is_empty() {
            return Err(invalid("empty segment".to_string()));
        }
        while pos < body.len() {
            let class = body[pos] >> 4;
            let id = body[pos] & 0x0F;
            if class != 0 {
                return Err(invalid(format!("table class {class} (lossless uses class 0)")));
            }
            if id as usize >= MAX_HUFFMAN_TABLES {
                return Err(invalid(format!("table id {id} outside 0..=3")));
            }

            let counts: [u8; 16] = body
                .get(pos + 1..pos + 17)
                .and_then(|c| c.try_into().ok())
                .ok_or_else(|| invalid(format!("table {id} code counts truncated")))?;
            let total: usize = counts.iter().map(|&n| n as usize).sum();
            let values = body
                .get(pos + 17..pos + 17 + total)
                .ok_or_else(|| invalid(format!("table {id} declares {total} values past the segment end")))?;
            if let Some(&bad) = values.iter().find(|&&v| v > 16) {
                return Err(invalid(format!("table {id} value {bad} exceeds 16")));
            }

            let table = HuffmanTable::canonical(&counts, values)
                .map_err(|err| invalid(format!("table {id}: {err}")))?;
            debug!(id, codes = table.len(), "Huffman table");
            self.slots[id as usize] = Some(table);

            pos += 17 + total;
        }
        Ok(())
    }
}
