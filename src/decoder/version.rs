/// Version information extraction for QR codes v7+
use crate::decoder::bch::{MAX_CORRECTABLE, nearest_version};
use crate::error::SymbolError;
use crate::models::{ModuleMatrix, Version};

/// Version info is 18 bits (6 data + 12 ECC) for versions 7-40
pub struct VersionInfo;

/// Module (x, y) holding bit `i` (LSB first) of each version copy:
/// the 6x3 block left of the top-right finder and its transpose.
pub fn version_bit_positions(size: usize, i: usize) -> [(usize, usize); 2] {
    let a = size - 11 + i % 3;
    let b = i / 3;
    [(a, b), (b, a)]
}

impl VersionInfo {
    /// Decode the version blocks of a grid sampled at 45 modules or more.
    ///
    /// Smaller grids carry no version blocks and yield their geometric version.
    pub fn extract(matrix: &ModuleMatrix) -> Result<Version, SymbolError> {
        let size = matrix.size();
        if size < 45 {
            return Ok(matrix.version());
        }

        let mut copies = [0u32; 2];
        for i in 0..18 {
            for (copy, (x, y)) in copies.iter_mut().zip(version_bit_positions(size, i)) {
                if matrix.get(x, y) {
                    *copy |= 1 << i;
                }
            }
        }

        let (number, distance) = copies
            .iter()
            .map(|&word| nearest_version(word))
            .min_by_key(|&(_, d)| d)
            .ok_or(SymbolError::UnknownSizeClass)?;
        if distance > MAX_CORRECTABLE {
            log::trace!(
                "version copies {:018b}/{:018b} too damaged (distance {})",
                copies[0],
                copies[1],
                distance
            );
            return Err(SymbolError::UnknownSizeClass);
        }
        Version::new(number).ok_or(SymbolError::UnknownSizeClass)
    }
}
