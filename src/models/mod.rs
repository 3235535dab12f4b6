pub mod matrix;
pub mod point;
pub mod qr_code;
pub mod raster;

pub use matrix::{BitMatrix, ModuleMatrix};
pub use point::Point;
pub use qr_code::{
    DecodedSymbol, ECLevel, MaskPattern, Segment, SegmentMode, StructuredAppend, Version,
};
pub use raster::RasterImage;
