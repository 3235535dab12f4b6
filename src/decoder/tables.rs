use crate::models::{ECLevel, Version};

/// Block structure of one (version, level) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EcBlockInfo {
    /// Number of Reed-Solomon blocks
    pub num_blocks: usize,
    /// ECC codewords in each block
    pub ecc_per_block: usize,
    /// All codewords in the symbol, data and ECC
    pub total_codewords: usize,
}

impl EcBlockInfo {
    /// Data codewords across all blocks
    pub fn data_codewords(&self) -> usize {
        self.total_codewords - self.num_blocks * self.ecc_per_block
    }

    /// Blocks carrying the shorter data length; they come first
    pub fn num_short_blocks(&self) -> usize {
        self.num_blocks - self.total_codewords % self.num_blocks
    }

    /// Codewords (data + ECC) in a short block
    pub fn short_block_len(&self) -> usize {
        self.total_codewords / self.num_blocks
    }

    /// Data codewords in block `index`
    pub fn block_data_len(&self, index: usize) -> usize {
        let short = self.short_block_len() - self.ecc_per_block;
        if index < self.num_short_blocks() {
            short
        } else {
            short + 1
        }
    }
}

// Index: [ec_level][version], levels in L, M, Q, H order
const ECC_CODEWORDS_PER_BLOCK: [[u8; 41]; 4] = [
    [
        0, 7, 10, 15, 20, 26, 18, 20, 24, 30, 18, 20, 24, 26, 30, 22, 24, 28, 30, 28, 28, 28, 28,
        30, 30, 26, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ],
    [
        0, 10, 16, 26, 18, 24, 16, 18, 22, 22, 26, 30, 22, 22, 24, 24, 28, 28, 26, 26, 26, 26, 28,
        28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28,
    ],
    [
        0, 13, 22, 18, 26, 18, 24, 18, 22, 20, 24, 28, 26, 24, 20, 30, 24, 28, 28, 26, 30, 28, 30,
        30, 30, 30, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ],
    [
        0, 17, 28, 22, 16, 22, 28, 26, 26, 24, 28, 24, 28, 22, 24, 24, 30, 28, 28, 26, 28, 30, 24,
        30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ],
];

const NUM_ERROR_CORRECTION_BLOCKS: [[u8; 41]; 4] = [
    [
        0, 1, 1, 1, 1, 1, 2, 2, 2, 2, 4, 4, 4, 4, 4, 6, 6, 6, 6, 7, 8, 8, 9, 9, 10, 12, 12, 12, 13,
        14, 15, 16, 17, 18, 19, 19, 20, 21, 22, 24, 25,
    ],
    [
        0, 1, 1, 1, 2, 2, 4, 4, 4, 5, 5, 5, 8, 9, 9, 10, 10, 11, 13, 14, 16, 17, 17, 18, 20, 21,
        23, 25, 26, 28, 29, 31, 33, 35, 37, 38, 40, 43, 45, 47, 49,
    ],
    [
        0, 1, 1, 2, 2, 4, 4, 6, 6, 8, 8, 8, 10, 12, 16, 12, 17, 16, 18, 21, 20, 23, 23, 25, 27,
        29, 34, 34, 35, 38, 40, 43, 45, 48, 51, 53, 56, 59, 62, 65, 68,
    ],
    [
        0, 1, 1, 2, 4, 4, 4, 5, 6, 8, 8, 11, 11, 16, 16, 18, 16, 19, 21, 25, 25, 25, 34, 30, 32,
        35, 37, 40, 42, 45, 48, 51, 54, 57, 60, 63, 66, 70, 74, 77, 81,
    ],
];

/// Modules available for data and ECC bits, remainder bits included
pub const fn raw_data_modules(version: u8) -> usize {
    let v = version as usize;
    let mut result = (16 * v + 128) * v + 64;
    if v >= 2 {
        let num_align = v / 7 + 2;
        result -= (25 * num_align - 10) * num_align - 55;
        if v >= 7 {
            result -= 36;
        }
    }
    result
}

/// Block layout for a version and level
pub fn ec_block_info(version: Version, ec_level: ECLevel) -> EcBlockInfo {
    let v = version.number() as usize;
    let idx = ec_level.index();
    EcBlockInfo {
        num_blocks: NUM_ERROR_CORRECTION_BLOCKS[idx][v] as usize,
        ecc_per_block: ECC_CODEWORDS_PER_BLOCK[idx][v] as usize,
        total_codewords: raw_data_modules(version.number()) / 8,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_data_modules() {
        assert_eq!(raw_data_modules(1), 208);
        assert_eq!(raw_data_modules(2), 359);
        assert_eq!(raw_data_modules(7), 1568);
        assert_eq!(raw_data_modules(40), 29648);
    }

    #[test]
    fn test_known_capacities() {
        let v = |n| Version::new(n).unwrap();
        // 1-M: 16 data codewords in one block
        let info = ec_block_info(v(1), ECLevel::M);
        assert_eq!(info.data_codewords(), 16);
        assert_eq!(info.num_blocks, 1);
        // 5-Q: 2 blocks of 15 and 2 blocks of 16 data codewords
        let info = ec_block_info(v(5), ECLevel::Q);
        assert_eq!(info.num_short_blocks(), 2);
        assert_eq!(info.block_data_len(0), 15);
        assert_eq!(info.block_data_len(3), 16);
        assert_eq!(info.data_codewords(), 62);
        // 40-L: 2956 data codewords
        assert_eq!(ec_block_info(v(40), ECLevel::L).data_codewords(), 2956);
    }

    #[test]
    fn test_every_layout_is_consistent() {
        for n in 1..=40 {
            let version = Version::new(n).unwrap();
            for level in [ECLevel::L, ECLevel::M, ECLevel::Q, ECLevel::H] {
                let info = ec_block_info(version, level);
                let sum: usize = (0..info.num_blocks).map(|b| info.block_data_len(b)).sum();
                assert_eq!(sum, info.data_codewords(), "v{} {:?}", n, level);
                assert!(info.ecc_per_block >= 7);
            }
        }
    }
}
