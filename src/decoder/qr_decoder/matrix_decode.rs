use crate::decoder::bitstream::BitstreamExtractor;
use crate::decoder::codewords::recover_data;
use crate::decoder::format::FormatInfo;
use crate::decoder::function_mask::FunctionMask;
use crate::decoder::segments::{ParsedData, parse_segments};
use crate::decoder::unmask::unmask;
use crate::error::SymbolError;
use crate::models::ModuleMatrix;

/// Everything read from one module grid
pub(super) struct GridContents {
    pub format: FormatInfo,
    pub data: ParsedData,
    pub corrected: usize,
}

/// Format, unmask, codewords, error correction and segments for a sampled grid
pub(super) fn decode_grid(matrix: &ModuleMatrix) -> Result<GridContents, SymbolError> {
    let version = matrix.version();
    let format = FormatInfo::extract(matrix)?;
    log::trace!(
        "version {} format {:?}/{:?}",
        version.number(),
        format.ec_level,
        format.mask_pattern
    );

    let func = FunctionMask::new(version);
    let mut unmasked = matrix.bits().clone();
    unmask(&mut unmasked, format.mask_pattern, &func);

    let codewords = BitstreamExtractor::extract(&unmasked, &func)?;
    let (data, corrected) = recover_data(&codewords, version, format.ec_level)?;
    let data = parse_segments(&data, version)?;

    Ok(GridContents {
        format,
        data,
        corrected,
    })
}
