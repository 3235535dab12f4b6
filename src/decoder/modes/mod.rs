//! QR code data mode decoders
//!
//! Each decoder reads one segment body from a [`BitReader`](crate::decoder::bitstream::BitReader)
//! positioned just after the character-count field:
//! - Numeric: digits packed 3 per 10 bits
//! - Alphanumeric: 45-symbol set packed 2 per 11 bits
//! - Byte: raw 8-bit data
//! - Kanji: 13-bit values expanded to Shift JIS byte pairs

pub mod alphanumeric;
pub mod byte;
pub mod kanji;
pub mod numeric;
