/// Kanji mode decoder (Mode 1000)
use crate::decoder::bitstream::BitReader;
use crate::error::SymbolError;

/// Each character is 13 bits, expanded back to a two-byte Shift JIS code
pub struct KanjiDecoder;

impl KanjiDecoder {
    /// Decode `character_count` characters into Shift JIS bytes
    pub fn decode(reader: &mut BitReader, character_count: usize) -> Result<Vec<u8>, SymbolError> {
        if character_count * 13 > reader.remaining() {
            return Err(SymbolError::TruncatedStream);
        }
        let mut result = Vec::with_capacity(character_count * 2);

        for _ in 0..character_count {
            let value = reader.read_bits(13)?;
            let mut code = ((value / 0xC0) << 8) | (value % 0xC0);
            if code + 0x8140 <= 0x9FFC {
                code += 0x8140;
            } else {
                code += 0xC140;
            }
            result.push((code >> 8) as u8);
            result.push((code & 0xFF) as u8);
        }

        Ok(result)
    }
}
