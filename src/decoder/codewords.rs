/// Block de-interleaving and per-block Reed-Solomon correction
use crate::decoder::reed_solomon::ReedSolomonDecoder;
use crate::decoder::tables::ec_block_info;
use crate::error::SymbolError;
use crate::models::{ECLevel, Version};

/// One error-correction block: data codewords followed by its ECC codewords
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EcBlock {
    /// Block position in the symbol
    pub index: usize,
    /// Leading data codewords in `codewords`
    pub data_len: usize,
    /// Data then ECC codewords
    pub codewords: Vec<u8>,
}

/// Split the interleaved codeword stream into its blocks.
///
/// Data codewords are interleaved column by column, short blocks first and
/// missing the final column; ECC codewords follow, also column by column.
pub fn deinterleave(
    codewords: &[u8],
    version: Version,
    ec_level: ECLevel,
) -> Result<Vec<EcBlock>, SymbolError> {
    let info = ec_block_info(version, ec_level);
    if codewords.len() != info.total_codewords {
        return Err(SymbolError::InvalidBitstream("codeword count mismatch"));
    }

    let mut blocks: Vec<EcBlock> = (0..info.num_blocks)
        .map(|index| {
            let data_len = info.block_data_len(index);
            EcBlock {
                index,
                data_len,
                codewords: Vec::with_capacity(data_len + info.ecc_per_block),
            }
        })
        .collect();

    let mut stream = codewords.iter().copied();
    let longest = info.block_data_len(info.num_blocks - 1);
    for column in 0..longest {
        for block in blocks.iter_mut().filter(|b| column < b.data_len) {
            block.codewords.extend(stream.next());
        }
    }
    for _ in 0..info.ecc_per_block {
        for block in blocks.iter_mut() {
            block.codewords.extend(stream.next());
        }
    }

    Ok(blocks)
}

/// Correct every block in place and concatenate the data codewords.
///
/// Returns the data and the total number of repaired codewords; the first
/// uncorrectable block voids the symbol.
pub fn correct_blocks(
    blocks: &mut [EcBlock],
    ecc_per_block: usize,
) -> Result<(Vec<u8>, usize), SymbolError> {
    let rs = ReedSolomonDecoder::new(ecc_per_block);
    let mut data = Vec::with_capacity(blocks.iter().map(|b| b.data_len).sum());
    let mut corrected = 0;

    for block in blocks.iter_mut() {
        match rs.decode(&mut block.codewords) {
            Ok(n) => corrected += n,
            Err(err) => {
                log::trace!("block {} rejected: {}", block.index, err);
                return Err(SymbolError::ReedSolomonUncorrectable { block: block.index });
            }
        }
        data.extend_from_slice(&block.codewords[..block.data_len]);
    }

    Ok((data, corrected))
}

/// De-interleave, correct and return the data codewords of a symbol
pub fn recover_data(
    codewords: &[u8],
    version: Version,
    ec_level: ECLevel,
) -> Result<(Vec<u8>, usize), SymbolError> {
    let mut blocks = deinterleave(codewords, version, ec_level)?;
    correct_blocks(&mut blocks, ec_block_info(version, ec_level).ecc_per_block)
}
