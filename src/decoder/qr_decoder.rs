/// Main QR code decoder - wires geometry, sampling and payload decoding together
use crate::detector::grouping::FinderTriple;
use crate::detector::timing::timing_agreement;
use crate::detector::transform::GridSampler;
use crate::decoder::version::VersionInfo;
use crate::error::SymbolError;
use crate::models::{BitMatrix, DecodedSymbol, ModuleMatrix, Point, Version};

mod geometry;
mod matrix_decode;

pub use geometry::{
    SymbolCandidate, estimate_pitch, estimate_version, pitch_along, run_length,
    version_candidates,
};
use matrix_decode::{GridContents, decode_grid};

/// Main QR decoder that processes a detected finder triple
pub struct QrDecoder;

impl QrDecoder {
    /// Decode the symbol framed by `triple` in the binary image.
    ///
    /// The size estimate and its neighbours are each sampled; grids whose
    /// timing patterns agree best are decoded first.
    pub fn decode(binary: &BitMatrix, triple: &FinderTriple) -> Result<DecodedSymbol, SymbolError> {
        let pitch = estimate_pitch(binary, triple)?;
        let estimate = estimate_version(triple.mean_leg(), pitch)?;
        log::trace!(
            "triple {:?}: pitch {:.2}, version estimate {}",
            triple.indices,
            pitch,
            estimate.number()
        );

        let sampler = GridSampler::new(binary);
        let mut sample_error = None;
        let mut attempts = Vec::new();
        for version in version_candidates(estimate) {
            match Self::sample(&sampler, binary, triple, version) {
                Ok((candidate, grid)) => {
                    attempts.push((timing_agreement(grid.bits()), candidate, grid))
                }
                Err(err) => {
                    sample_error.get_or_insert(err);
                }
            }
        }
        attempts.sort_by(|a, b| b.0.total_cmp(&a.0));

        let mut decode_error = None;
        for (_, candidate, grid) in attempts {
            match Self::decode_candidate(&sampler, binary, candidate, grid) {
                Ok(symbol) => return Ok(symbol),
                Err(err) => {
                    log::trace!("version {} failed: {}", candidate.version.number(), err);
                    decode_error.get_or_insert(err);
                }
            }
        }

        Err(decode_error
            .or(sample_error)
            .unwrap_or(SymbolError::GeometryDegenerate))
    }

    /// Decode an already sampled module grid; positions are in module units
    pub fn decode_grid(matrix: &ModuleMatrix) -> Result<DecodedSymbol, SymbolError> {
        let declared = VersionInfo::extract(matrix)?;
        if declared != matrix.version() {
            return Err(SymbolError::UnknownSizeClass);
        }
        let contents = decode_grid(matrix)?;
        let d = matrix.size() as f32;
        let position = [
            Point::new(0.0, 0.0),
            Point::new(d, 0.0),
            Point::new(d, d),
            Point::new(0.0, d),
        ];
        Ok(Self::build_symbol(matrix.version(), contents, position))
    }

    fn sample(
        sampler: &GridSampler,
        binary: &BitMatrix,
        triple: &FinderTriple,
        version: Version,
    ) -> Result<(SymbolCandidate, ModuleMatrix), SymbolError> {
        let candidate = SymbolCandidate::resolve(binary, triple, version)?;
        let pitch = triple.mean_leg() / (version.size() as f32 - 7.0);
        let bits = sampler.sample(&candidate.transform, version.size(), pitch)?;
        Ok((candidate, ModuleMatrix::new(version, bits)?))
    }

    fn decode_candidate(
        sampler: &GridSampler,
        binary: &BitMatrix,
        candidate: SymbolCandidate,
        grid: ModuleMatrix,
    ) -> Result<DecodedSymbol, SymbolError> {
        // Large symbols state their version; resample once if it disagrees
        let declared = VersionInfo::extract(&grid)?;
        let (candidate, grid) = if declared != candidate.version {
            log::trace!(
                "version blocks say {}, sampled as {}",
                declared.number(),
                candidate.version.number()
            );
            Self::sample(sampler, binary, &candidate.triple, declared)?
        } else {
            (candidate, grid)
        };

        let contents = decode_grid(&grid)?;
        Ok(Self::build_symbol(candidate.version, contents, candidate.corners()?))
    }

    fn build_symbol(version: Version, contents: GridContents, position: [Point; 4]) -> DecodedSymbol {
        DecodedSymbol {
            payload: contents.data.payload,
            version,
            error_correction: contents.format.ec_level,
            mask_pattern: contents.format.mask_pattern,
            segments: contents.data.segments,
            eci: contents.data.eci,
            structured_append: contents.data.structured_append,
            corrected_errors: contents.corrected,
            position,
        }
    }
}
