/// Errors that abort a whole decode call.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Zero-area raster or a pixel buffer whose length disagrees with the dimensions
    #[error("invalid image (width={width}, height={height}, buffer length={len})")]
    InvalidImage {
        /// Declared width in pixels
        width: usize,
        /// Declared height in pixels
        height: usize,
        /// Actual buffer length in bytes
        len: usize,
    },
}

/// Failures local to one candidate symbol.
///
/// These never escape [`crate::decode_image`]; the coordinator records them
/// and moves on to the next candidate.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolError {
    /// No finder pattern survived the cross-checks
    #[error("no finder patterns found")]
    NoFinderPatternsFound,
    /// Some finder patterns were found, but not three
    #[error("fewer than three finder patterns found ({found})")]
    InsufficientFinderPatterns {
        /// Number of detections
        found: usize,
    },
    /// Triple rejected or transform fit failed
    #[error("finder triple does not form a usable symbol geometry")]
    GeometryDegenerate,
    /// Version estimate or version information unusable
    #[error("symbol size class could not be determined")]
    UnknownSizeClass,
    /// Neither format copy is within correction distance
    #[error("format information unrecoverable")]
    FormatInfoUnrecoverable,
    /// A module centre maps outside the raster
    #[error("module sample falls outside the image")]
    MatrixSampleOutOfBounds,
    /// A codeword block had more errors than it can correct
    #[error("reed-solomon block {block} uncorrectable")]
    ReedSolomonUncorrectable {
        /// Index of the failing block
        block: usize,
    },
    /// Malformed segment data
    #[error("invalid bitstream: {0}")]
    InvalidBitstream(&'static str),
    /// Segment length exceeds the remaining bits
    #[error("segment runs past the end of the data stream")]
    TruncatedStream,
}
