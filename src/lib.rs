//! qrscan - QR code detection and decoding
//!
//! Finds QR (Model 2) symbols in a grayscale raster and recovers their
//! payload bytes: adaptive binarization, finder-pattern scanning, perspective
//! sampling, format/version recovery, Reed-Solomon correction and segment
//! parsing. Each image or video frame is decoded independently.
//!
//! ```no_run
//! let img = image::open("code.png").unwrap();
//! let raster = qrscan::RasterImage::from_dynamic(&img);
//! for symbol in qrscan::decode_image(&raster).unwrap() {
//!     println!("{}", symbol.text());
//! }
//! ```

#![warn(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

/// Decoder limits and environment overrides
pub mod config;
/// QR code decoding modules (error correction, format extraction, data modes)
pub mod decoder;
/// QR code detection modules (finder patterns, grouping, alignment, sampling)
pub mod detector;
/// Fatal and per-candidate error types
pub mod error;
/// Core data structures (DecodedSymbol, BitMatrix, Point, etc.)
pub mod models;
/// Multi-symbol coordinator and decode telemetry
pub mod pipeline;
/// Payload to text conversion
pub mod text;
/// Utility functions (grayscale, binarization, geometry)
pub mod utils;

pub use config::DecoderConfig;
pub use error::{DecodeError, SymbolError};
pub use models::{
    BitMatrix, DecodedSymbol, ECLevel, MaskPattern, ModuleMatrix, Point, RasterImage, Segment,
    SegmentMode, StructuredAppend, Version,
};
pub use pipeline::{Binarizer, CandidateOutcome, DecodeReport};
pub use text::{TextEncoding, format_payloads, payload_to_text};

use rayon::prelude::*;

/// Crate version string
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Decode every QR symbol in a grayscale raster with the default configuration.
///
/// Returns an empty list when nothing is found; only a malformed raster is an
/// error.
pub fn decode_image(image: &RasterImage) -> Result<Vec<DecodedSymbol>, DecodeError> {
    Decoder::default().decode(image)
}

/// Decode QR codes in an RGB image
///
/// # Arguments
/// * `pixels` - Raw RGB bytes (3 bytes per pixel)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
pub fn decode_rgb(
    pixels: &[u8],
    width: usize,
    height: usize,
) -> Result<Vec<DecodedSymbol>, DecodeError> {
    decode_image(&RasterImage::from_rgb(pixels, width, height)?)
}

/// Decode a batch of independent frames in parallel
pub fn decode_frames(frames: &[RasterImage]) -> Vec<Result<Vec<DecodedSymbol>, DecodeError>> {
    Decoder::default().decode_frames(frames)
}

/// Reusable decoder holding a [`DecoderConfig`]
#[derive(Debug, Clone, Default)]
pub struct Decoder {
    config: DecoderConfig,
}

impl Decoder {
    /// Create a decoder with the given limits
    pub fn new(config: DecoderConfig) -> Self {
        Self { config }
    }

    /// Create a decoder configured from `QR_*` environment variables
    pub fn from_env() -> Self {
        Self::new(DecoderConfig::from_env())
    }

    /// Active configuration
    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Decode every symbol in the raster
    pub fn decode(&self, image: &RasterImage) -> Result<Vec<DecodedSymbol>, DecodeError> {
        self.decode_report(image).map(|report| report.symbols)
    }

    /// Decode and keep per-candidate diagnostics
    pub fn decode_report(&self, image: &RasterImage) -> Result<DecodeReport, DecodeError> {
        pipeline::decode_raster(image, &self.config)
    }

    /// Decode independent frames in parallel, results in input order
    pub fn decode_frames(
        &self,
        frames: &[RasterImage],
    ) -> Vec<Result<Vec<DecodedSymbol>, DecodeError>> {
        frames.par_iter().map(|frame| self.decode(frame)).collect()
    }
}
