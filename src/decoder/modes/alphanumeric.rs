/// Alphanumeric mode decoder (Mode 0010)
use crate::decoder::bitstream::BitReader;
use crate::error::SymbolError;

/// Alphanumeric character set: 0-9, A-Z, space, $%*+-./:
const ALPHANUMERIC_TABLE: &[u8; 45] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ $%*+-./:";

/// Pairs = 11 bits, single = 6 bits
pub struct AlphanumericDecoder;

impl AlphanumericDecoder {
    /// Decode `character_count` characters as ASCII bytes
    pub fn decode(reader: &mut BitReader, character_count: usize) -> Result<Vec<u8>, SymbolError> {
        let mut result = Vec::with_capacity(character_count);
        let mut chars_remaining = character_count;

        while chars_remaining >= 2 {
            let value = reader.read_bits(11)? as usize;
            let (first, second) = (value / 45, value % 45);
            if first >= 45 {
                return Err(SymbolError::InvalidBitstream("alphanumeric pair out of range"));
            }
            result.push(ALPHANUMERIC_TABLE[first]);
            result.push(ALPHANUMERIC_TABLE[second]);
            chars_remaining -= 2;
        }

        if chars_remaining == 1 {
            let value = reader.read_bits(6)? as usize;
            let ch = ALPHANUMERIC_TABLE
                .get(value)
                .ok_or(SymbolError::InvalidBitstream("alphanumeric value out of range"))?;
            result.push(*ch);
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alphanumeric_decode() {
        // "A1" = 10 * 45 + 1 = 451 = 0b00111000011, then "-" = 41 = 0b101001
        let data = [0b0011_1000, 0b0111_0100, 0b1000_0000];
        let mut reader = BitReader::new(&data);
        let decoded = AlphanumericDecoder::decode(&mut reader, 3).unwrap();
        assert_eq!(decoded, b"A1-");
        assert_eq!(reader.position(), 17);
    }

    #[test]
    fn test_pair_out_of_range() {
        // 2047 / 45 = 45
        let data = [0xFF, 0xE0];
        let mut reader = BitReader::new(&data);
        assert!(matches!(
            AlphanumericDecoder::decode(&mut reader, 2),
            Err(SymbolError::InvalidBitstream(_))
        ));
    }

    #[test]
    fn test_single_out_of_range() {
        // 63 has no character
        let data = [0b1111_1100];
        let mut reader = BitReader::new(&data);
        assert!(AlphanumericDecoder::decode(&mut reader, 1).is_err());
    }
}
