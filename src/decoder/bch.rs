//! BCH codes protecting the format (15,5) and version (18,6) information.
//!
//! Both codes have minimum distance 7, so a read word is corrected to the
//! nearest valid codeword when it lies within Hamming distance 3.

/// Generator x^10 + x^8 + x^5 + x^4 + x^2 + x + 1
const FORMAT_GENERATOR: u32 = 0x537;
/// XOR mask applied to every format codeword
pub const FORMAT_MASK: u16 = 0x5412;
/// Generator x^12 + x^11 + x^10 + x^9 + x^8 + x^5 + x^2 + 1
const VERSION_GENERATOR: u32 = 0x1F25;

/// Largest correctable Hamming distance
pub const MAX_CORRECTABLE: u32 = 3;

const fn bch_remainder(data: u32, data_bits: u32, ecc_bits: u32, generator: u32) -> u32 {
    let mut rem = data << ecc_bits;
    let mut bit = data_bits + ecc_bits;
    while bit > ecc_bits {
        bit -= 1;
        if rem & (1 << bit) != 0 {
            rem ^= generator << (bit - ecc_bits);
        }
    }
    rem
}

/// Masked 15-bit format codeword for 5 data bits (level bits << 3 | mask)
pub const fn format_codeword(data: u8) -> u16 {
    let data = (data & 0x1F) as u32;
    (((data << 10) | bch_remainder(data, 5, 10, FORMAT_GENERATOR)) as u16) ^ FORMAT_MASK
}

/// 18-bit version codeword
pub const fn version_codeword(version: u8) -> u32 {
    let v = (version & 0x3F) as u32;
    (v << 12) | bch_remainder(v, 6, 12, VERSION_GENERATOR)
}

const fn build_format_table() -> [u16; 32] {
    let mut table = [0u16; 32];
    let mut i = 0;
    while i < 32 {
        table[i] = format_codeword(i as u8);
        i += 1;
    }
    table
}

const fn build_version_table() -> [u32; 34] {
    let mut table = [0u32; 34];
    let mut i = 0;
    while i < 34 {
        table[i] = version_codeword(i as u8 + 7);
        i += 1;
    }
    table
}

static FORMAT_CODEWORDS: [u16; 32] = build_format_table();
static VERSION_CODEWORDS: [u32; 34] = build_version_table();

/// Nearest format data (5 bits) and its distance from `word`
pub fn nearest_format(word: u16) -> (u8, u32) {
    let mut best = (0u8, u32::MAX);
    for (data, &cw) in FORMAT_CODEWORDS.iter().enumerate() {
        let d = ((word ^ cw) & 0x7FFF).count_ones();
        if d < best.1 {
            best = (data as u8, d);
        }
    }
    best
}

/// Nearest version number (7-40) and its distance from `word`
pub fn nearest_version(word: u32) -> (u8, u32) {
    let mut best = (7u8, u32::MAX);
    for (i, &cw) in VERSION_CODEWORDS.iter().enumerate() {
        let d = ((word ^ cw) & 0x3FFFF).count_ones();
        if d < best.1 {
            best = (i as u8 + 7, d);
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codewords() {
        // Level M (00), mask 0
        assert_eq!(format_codeword(0b00000), 0x5412);
        // Level L (01), mask 0
        assert_eq!(format_codeword(0b01000), 0x77C4);
        assert_eq!(version_codeword(7), 0x07C94);
        assert_eq!(version_codeword(40), 0x28C69);
    }

    #[test]
    fn test_format_correction_up_to_three_bits() {
        for data in 0..32u8 {
            let cw = format_codeword(data);
            assert_eq!(nearest_format(cw), (data, 0));
            let damaged = cw ^ 0b100_0000_0100_0001;
            assert_eq!(nearest_format(damaged), (data, 3));
        }
    }

    #[test]
    fn test_version_correction() {
        for v in 7..=40u8 {
            let cw = version_codeword(v);
            assert_eq!(nearest_version(cw), (v, 0));
            assert_eq!(nearest_version(cw ^ 0b10_0000_0001_0000_0100), (v, 3));
        }
    }

    #[test]
    fn test_codewords_are_far_apart() {
        for a in 0..32 {
            for b in (a + 1)..32 {
                assert!((FORMAT_CODEWORDS[a] ^ FORMAT_CODEWORDS[b]).count_ones() >= 7);
            }
        }
    }
}
