use super::Version;
use crate::error::SymbolError;

/// Compact bit matrix for storing binary data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitMatrix {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl BitMatrix {
    /// Create a new bit matrix with given dimensions
    pub fn new(width: usize, height: usize) -> Self {
        let bytes_needed = (width * height).div_ceil(8);
        Self {
            width,
            height,
            data: vec![0; bytes_needed],
        }
    }

    /// Get matrix width
    pub fn width(&self) -> usize {
        self.width
    }

    /// Get matrix height
    pub fn height(&self) -> usize {
        self.height
    }

    /// Get bit at (x, y); out-of-range reads are `false`
    pub fn get(&self, x: usize, y: usize) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let index = y * self.width + x;
        (self.data[index / 8] >> (index % 8)) & 1 == 1
    }

    /// Set bit at (x, y)
    pub fn set(&mut self, x: usize, y: usize, value: bool) {
        if x >= self.width || y >= self.height {
            return;
        }
        let index = y * self.width + x;
        let bit = 1 << (index % 8);
        if value {
            self.data[index / 8] |= bit;
        } else {
            self.data[index / 8] &= !bit;
        }
    }

    /// Toggle bit at (x, y)
    pub fn toggle(&mut self, x: usize, y: usize) {
        if x >= self.width || y >= self.height {
            return;
        }
        let index = y * self.width + x;
        self.data[index / 8] ^= 1 << (index % 8);
    }

    /// Number of set bits
    pub fn count_ones(&self) -> usize {
        self.data.iter().map(|b| b.count_ones() as usize).sum()
    }
}

impl Default for BitMatrix {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

/// Sampled module grid of one symbol (`true` = dark)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleMatrix {
    version: Version,
    modules: BitMatrix,
}

impl ModuleMatrix {
    /// Wrap a sampled grid; its side must be `17 + 4 * version`
    pub fn new(version: Version, modules: BitMatrix) -> Result<Self, SymbolError> {
        let size = version.size();
        if modules.width() != size || modules.height() != size {
            return Err(SymbolError::UnknownSizeClass);
        }
        Ok(Self { version, modules })
    }

    /// Version this grid was sampled for
    pub fn version(&self) -> Version {
        self.version
    }

    /// Side length in modules
    pub fn size(&self) -> usize {
        self.modules.width()
    }

    /// Module at column `x`, row `y`
    pub fn get(&self, x: usize, y: usize) -> bool {
        self.modules.get(x, y)
    }

    /// Underlying bits
    pub fn bits(&self) -> &BitMatrix {
        &self.modules
    }

    /// Mutable access for unmasking
    pub fn bits_mut(&mut self) -> &mut BitMatrix {
        &mut self.modules
    }
}
