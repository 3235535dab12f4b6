/// Format information extraction from QR code
use crate::decoder::bch::{MAX_CORRECTABLE, format_codeword, nearest_format};
use crate::error::SymbolError;
use crate::models::{ECLevel, MaskPattern, ModuleMatrix};

/// Format info is 15 bits (5 data + 10 ECC), stored twice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatInfo {
    /// Error correction level
    pub ec_level: ECLevel,
    /// Data mask
    pub mask_pattern: MaskPattern,
}

/// Module (x, y) holding bit `i` (LSB first) of each format copy.
///
/// Copy one wraps the top-left finder; copy two is split between the
/// top-right and bottom-left finders.
pub fn format_bit_positions(size: usize, i: usize) -> [(usize, usize); 2] {
    let first = match i {
        0..=5 => (8, i),
        6 => (8, 7),
        7 => (8, 8),
        8 => (7, 8),
        _ => (14 - i, 8),
    };
    let second = if i < 8 {
        (size - 1 - i, 8)
    } else {
        (8, size - 15 + i)
    };
    [first, second]
}

impl FormatInfo {
    /// Read both copies and keep the one closest to a valid codeword
    pub fn extract(matrix: &ModuleMatrix) -> Result<Self, SymbolError> {
        let size = matrix.size();
        let mut copies = [0u16; 2];
        for i in 0..15 {
            for (copy, (x, y)) in copies.iter_mut().zip(format_bit_positions(size, i)) {
                if matrix.get(x, y) {
                    *copy |= 1 << i;
                }
            }
        }

        let (data, distance) = copies
            .iter()
            .map(|&word| nearest_format(word))
            .min_by_key(|&(_, d)| d)
            .ok_or(SymbolError::FormatInfoUnrecoverable)?;
        if distance > MAX_CORRECTABLE {
            log::trace!(
                "format copies {:015b}/{:015b} too damaged (distance {})",
                copies[0],
                copies[1],
                distance
            );
            return Err(SymbolError::FormatInfoUnrecoverable);
        }
        Ok(Self::from_data(data))
    }

    /// Interpret the 5 data bits
    pub fn from_data(data: u8) -> Self {
        Self {
            ec_level: ECLevel::from_bits(data >> 3),
            mask_pattern: MaskPattern::from_bits(data),
        }
    }

    /// Masked 15-bit codeword carrying this format
    pub fn codeword(&self) -> u16 {
        format_codeword((self.ec_level.to_bits() << 3) | self.mask_pattern.to_bits())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BitMatrix, Version};

    fn matrix_with_format(info: FormatInfo, flips: &[(usize, usize)]) -> ModuleMatrix {
        let version = Version::new(1).unwrap();
        let size = version.size();
        let mut bits = BitMatrix::new(size, size);
        let cw = info.codeword();
        for i in 0..15 {
            for (x, y) in format_bit_positions(size, i) {
                bits.set(x, y, (cw >> i) & 1 == 1);
            }
        }
        for &(x, y) in flips {
            bits.toggle(x, y);
        }
        ModuleMatrix::new(version, bits).unwrap()
    }

    #[test]
    fn test_format_round_trip_all_combinations() {
        for data in 0..32u8 {
            let info = FormatInfo::from_data(data);
            let m = matrix_with_format(info, &[]);
            assert_eq!(FormatInfo::extract(&m), Ok(info));
        }
    }

    #[test]
    fn test_one_copy_destroyed() {
        let info = FormatInfo {
            ec_level: ECLevel::Q,
            mask_pattern: MaskPattern::Pattern5,
        };
        // Five errors in copy one, copy two intact
        let m = matrix_with_format(info, &[(8, 0), (8, 1), (8, 2), (8, 3), (8, 4)]);
        assert_eq!(FormatInfo::extract(&m), Ok(info));
    }

    #[test]
    fn test_both_copies_destroyed() {
        let info = FormatInfo {
            ec_level: ECLevel::H,
            mask_pattern: MaskPattern::Pattern2,
        };
        let mut flips = vec![(8, 0), (8, 1), (8, 2), (8, 3), (8, 4)];
        flips.extend([(20, 8), (19, 8), (18, 8), (17, 8), (16, 8)]);
        let m = matrix_with_format(info, &flips);
        // Five errors per copy: never the original format
        if let Ok(found) = FormatInfo::extract(&m) {
            assert_ne!(found, info);
        }
    }

    #[test]
    fn test_level_m_mask_0_codeword() {
        let info = FormatInfo {
            ec_level: ECLevel::M,
            mask_pattern: MaskPattern::Pattern0,
        };
        assert_eq!(info.codeword(), 0x5412);
    }
}
