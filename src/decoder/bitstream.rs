/// Bitstream extraction from QR code matrix
use crate::decoder::function_mask::FunctionMask;
use crate::decoder::tables::raw_data_modules;
use crate::error::SymbolError;
use crate::models::BitMatrix;

/// Extract raw codewords from the matrix following the zigzag placement order
pub struct BitstreamExtractor;

impl BitstreamExtractor {
    /// Data module coordinates (x, y) in placement order.
    ///
    /// Column pairs are walked right to left, alternating upward and
    /// downward, with the vertical timing column skipped.
    pub fn data_module_positions(func: &FunctionMask) -> Vec<(usize, usize)> {
        let size = func.size();
        let mut positions = Vec::with_capacity(func.data_modules_count());

        let mut right = size as isize - 1;
        while right >= 1 {
            if right == 6 {
                right = 5;
            }
            let upward = ((right + 1) & 2) == 0;
            for vert in 0..size {
                let y = if upward { size - 1 - vert } else { vert };
                for j in 0..2 {
                    let x = (right - j) as usize;
                    if !func.is_function(x, y) {
                        positions.push((x, y));
                    }
                }
            }
            right -= 2;
        }

        positions
    }

    /// Read all codewords (MSB first) from an unmasked matrix; remainder bits are dropped
    pub fn extract(matrix: &BitMatrix, func: &FunctionMask) -> Result<Vec<u8>, SymbolError> {
        let positions = Self::data_module_positions(func);
        if positions.len() != raw_data_modules(func.version().number()) {
            return Err(SymbolError::InvalidBitstream("data module count mismatch"));
        }

        let codewords = positions
            .chunks_exact(8)
            .map(|chunk| {
                chunk
                    .iter()
                    .fold(0u8, |byte, &(x, y)| (byte << 1) | matrix.get(x, y) as u8)
            })
            .collect();
        Ok(codewords)
    }
}

/// MSB-first reader over corrected data codewords
pub struct BitReader<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> BitReader<'a> {
    /// Reader positioned at the first bit
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// Bits not yet consumed
    pub fn remaining(&self) -> usize {
        self.data.len() * 8 - self.position
    }

    /// Bits consumed so far
    pub fn position(&self) -> usize {
        self.position
    }

    /// Read `count` bits (at most 32) as an unsigned value
    pub fn read_bits(&mut self, count: usize) -> Result<u32, SymbolError> {
        if count > 32 || count > self.remaining() {
            return Err(SymbolError::TruncatedStream);
        }
        let mut value = 0u32;
        for _ in 0..count {
            let byte = self.data[self.position / 8];
            let bit = (byte >> (7 - self.position % 8)) & 1;
            value = (value << 1) | bit as u32;
            self.position += 1;
        }
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Version;

    #[test]
    fn test_positions_cover_all_data_modules() {
        for n in [1u8, 2, 7, 14, 40] {
            let func = FunctionMask::new(Version::new(n).unwrap());
            let positions = BitstreamExtractor::data_module_positions(&func);
            assert_eq!(positions.len(), raw_data_modules(n));
            let mut seen = BitMatrix::new(func.size(), func.size());
            for &(x, y) in &positions {
                assert!(!seen.get(x, y), "({}, {}) visited twice", x, y);
                seen.set(x, y, true);
            }
        }
    }

    #[test]
    fn test_zigzag_starts_bottom_right() {
        let func = FunctionMask::new(Version::new(1).unwrap());
        let positions = BitstreamExtractor::data_module_positions(&func);
        assert_eq!(&positions[..4], &[(20, 20), (19, 20), (20, 19), (19, 19)]);
        // First downward pass starts at the top of columns 18/17
        let down = positions.iter().position(|&(x, _)| x == 18).unwrap();
        assert_eq!(positions[down], (18, 9));
    }

    #[test]
    fn test_extract_codeword_count() {
        let func = FunctionMask::new(Version::new(1).unwrap());
        let matrix = BitMatrix::new(21, 21);
        let codewords = BitstreamExtractor::extract(&matrix, &func).unwrap();
        assert_eq!(codewords.len(), 26);
        assert!(codewords.iter().all(|&c| c == 0));
    }

    #[test]
    fn test_bit_reader() {
        let data = [0b1010_0000, 0xFF];
        let mut reader = BitReader::new(&data);
        assert_eq!(reader.read_bits(4), Ok(0b1010));
        assert_eq!(reader.read_bits(8), Ok(0b0000_1111));
        assert_eq!(reader.remaining(), 4);
        assert_eq!(reader.read_bits(5), Err(SymbolError::TruncatedStream));
        assert_eq!(reader.read_bits(4), Ok(0b1111));
        assert_eq!(reader.position(), 16);
    }
}
