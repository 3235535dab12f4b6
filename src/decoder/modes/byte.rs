/// Byte mode decoder (Mode 0100) for 8-bit data
use crate::decoder::bitstream::BitReader;
use crate::error::SymbolError;

/// Raw bytes are kept as-is; text interpretation happens later
pub struct ByteDecoder;

impl ByteDecoder {
    /// Read `character_count` bytes
    pub fn decode(reader: &mut BitReader, character_count: usize) -> Result<Vec<u8>, SymbolError> {
        if character_count * 8 > reader.remaining() {
            return Err(SymbolError::TruncatedStream);
        }
        (0..character_count)
            .map(|_| reader.read_bits(8).map(|b| b as u8))
            .collect()
    }
}
