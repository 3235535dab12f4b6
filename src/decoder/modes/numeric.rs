/// Numeric mode decoder (Mode 0001)
use crate::decoder::bitstream::BitReader;
use crate::error::SymbolError;

/// Groups of 3 digits = 10 bits, 2 digits = 7 bits, 1 digit = 4 bits
pub struct NumericDecoder;

impl NumericDecoder {
    /// Decode `character_count` digits as ASCII bytes
    pub fn decode(reader: &mut BitReader, character_count: usize) -> Result<Vec<u8>, SymbolError> {
        let mut result = Vec::with_capacity(character_count);
        let mut chars_remaining = character_count;

        while chars_remaining > 0 {
            let group_size = chars_remaining.min(3);
            let (bits_needed, limit) = match group_size {
                3 => (10, 1000),
                2 => (7, 100),
                _ => (4, 10),
            };

            let value = reader.read_bits(bits_needed)?;
            if value >= limit {
                return Err(SymbolError::InvalidBitstream("numeric group out of range"));
            }

            let digits = format!("{:0width$}", value, width = group_size);
            result.extend_from_slice(digits.as_bytes());
            chars_remaining -= group_size;
        }

        Ok(result)
    }
}
