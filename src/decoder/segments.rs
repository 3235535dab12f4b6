/// Segment parsing: turns corrected data codewords into payload bytes
use crate::decoder::bitstream::BitReader;
use crate::decoder::modes::{
    alphanumeric::AlphanumericDecoder, byte::ByteDecoder, kanji::KanjiDecoder,
    numeric::NumericDecoder,
};
use crate::error::SymbolError;
use crate::models::{Segment, SegmentMode, StructuredAppend, Version};

/// Everything recovered from one symbol's data stream
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedData {
    /// Concatenated segment bytes
    pub payload: Vec<u8>,
    /// Segments in stream order, header modes included
    pub segments: Vec<Segment>,
    /// First ECI designator seen
    pub eci: Option<u32>,
    /// Structured append header, if any
    pub structured_append: Option<StructuredAppend>,
}

/// Parse segments until the terminator, or until fewer than 4 bits remain
pub fn parse_segments(data: &[u8], version: Version) -> Result<ParsedData, SymbolError> {
    let mut reader = BitReader::new(data);
    let mut parsed = ParsedData::default();
    let mut current_eci = None;

    while reader.remaining() >= 4 {
        let start = reader.position();
        let indicator = reader.read_bits(4)?;
        if indicator == 0 {
            break;
        }
        let mode = SegmentMode::from_indicator(indicator)
            .ok_or(SymbolError::InvalidBitstream("unknown mode indicator"))?;

        let mut char_count = 0;
        let bytes = match mode {
            SegmentMode::Eci => {
                let designator = read_eci_designator(&mut reader)?;
                current_eci = Some(designator);
                parsed.eci.get_or_insert(designator);
                Vec::new()
            }
            SegmentMode::StructuredAppend => {
                let index = reader.read_bits(4)? as u8;
                let total = reader.read_bits(4)? as u8 + 1;
                let parity = reader.read_bits(8)? as u8;
                parsed.structured_append.get_or_insert(StructuredAppend {
                    index,
                    total,
                    parity,
                });
                Vec::new()
            }
            SegmentMode::Fnc1First => Vec::new(),
            SegmentMode::Fnc1Second => {
                // Application indicator
                reader.read_bits(8)?;
                Vec::new()
            }
            SegmentMode::Numeric
            | SegmentMode::Alphanumeric
            | SegmentMode::Byte
            | SegmentMode::Kanji => {
                let count_bits = mode
                    .count_bits(version)
                    .ok_or(SymbolError::InvalidBitstream("mode has no count field"))?;
                char_count = reader.read_bits(count_bits)? as usize;
                match mode {
                    SegmentMode::Numeric => NumericDecoder::decode(&mut reader, char_count)?,
                    SegmentMode::Alphanumeric => {
                        AlphanumericDecoder::decode(&mut reader, char_count)?
                    }
                    SegmentMode::Byte => ByteDecoder::decode(&mut reader, char_count)?,
                    _ => KanjiDecoder::decode(&mut reader, char_count)?,
                }
            }
        };

        parsed.payload.extend_from_slice(&bytes);
        parsed.segments.push(Segment {
            mode,
            data: bytes,
            char_count,
            bit_len: reader.position() - start,
            eci: current_eci,
        });
    }

    log::trace!(
        "parsed {} segments, {} payload bytes",
        parsed.segments.len(),
        parsed.payload.len()
    );
    Ok(parsed)
}

/// ECI designator: 1, 2 or 3 bytes selected by the leading bits 0, 10, 110
fn read_eci_designator(reader: &mut BitReader) -> Result<u32, SymbolError> {
    let first = reader.read_bits(8)?;
    if first & 0x80 == 0 {
        Ok(first)
    } else if first & 0xC0 == 0x80 {
        Ok(((first & 0x3F) << 8) | reader.read_bits(8)?)
    } else if first & 0xE0 == 0xC0 {
        Ok(((first & 0x1F) << 16) | reader.read_bits(16)?)
    } else {
        Err(SymbolError::InvalidBitstream("invalid ECI designator"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// MSB-first bit writer for building test streams
    struct Bits(Vec<bool>);

    impl Bits {
        fn new() -> Self {
            Bits(Vec::new())
        }

        fn put(mut self, value: u32, count: usize) -> Self {
            for i in (0..count).rev() {
                self.0.push((value >> i) & 1 == 1);
            }
            self
        }

        fn bytes(&self) -> Vec<u8> {
            self.0
                .chunks(8)
                .map(|c| {
                    c.iter()
                        .enumerate()
                        .fold(0u8, |b, (i, &bit)| b | ((bit as u8) << (7 - i)))
                })
                .collect()
        }
    }

    fn v1() -> Version {
        Version::new(1).unwrap()
    }

    #[test]
    fn test_byte_segment_hello() {
        let mut bits = Bits::new().put(0b0100, 4).put(5, 8);
        for &b in b"HELLO" {
            bits = bits.put(b as u32, 8);
        }
        let bits = bits.put(0, 4);
        let parsed = parse_segments(&bits.bytes(), v1()).unwrap();
        assert_eq!(parsed.payload, b"HELLO");
        assert_eq!(parsed.segments.len(), 1);
        assert_eq!(parsed.segments[0].mode, SegmentMode::Byte);
        assert_eq!(parsed.segments[0].char_count, 5);
        assert_eq!(parsed.segments[0].bit_len, 4 + 8 + 40);
    }

    #[test]
    fn test_mixed_segments_concatenate() {
        // Numeric "12" then alphanumeric "AB"
        let bits = Bits::new()
            .put(0b0001, 4)
            .put(2, 10)
            .put(12, 7)
            .put(0b0010, 4)
            .put(2, 9)
            .put(10 * 45 + 11, 11)
            .put(0, 4);
        let parsed = parse_segments(&bits.bytes(), v1()).unwrap();
        assert_eq!(parsed.payload, b"12AB");
        assert_eq!(parsed.segments.len(), 2);
    }

    #[test]
    fn test_count_width_depends_on_version() {
        // Version 10 byte mode uses a 16-bit count
        let bits = Bits::new().put(0b0100, 4).put(1, 16).put(b'x' as u32, 8);
        let parsed = parse_segments(&bits.bytes(), Version::new(10).unwrap()).unwrap();
        assert_eq!(parsed.payload, b"x");
    }

    #[test]
    fn test_eci_applies_to_following_segments() {
        let bits = Bits::new()
            .put(0b0111, 4)
            .put(26, 8)
            .put(0b0100, 4)
            .put(1, 8)
            .put(0xC3, 8)
            .put(0, 4);
        let parsed = parse_segments(&bits.bytes(), v1()).unwrap();
        assert_eq!(parsed.eci, Some(26));
        assert_eq!(parsed.payload, vec![0xC3]);
        assert_eq!(parsed.segments[1].eci, Some(26));
    }

    #[test]
    fn test_two_byte_eci_designator() {
        let bits = Bits::new().put(0b0111, 4).put(0b10, 2).put(1000, 14);
        let parsed = parse_segments(&bits.bytes(), v1()).unwrap();
        assert_eq!(parsed.eci, Some(1000));
    }

    #[test]
    fn test_bad_eci_designator() {
        let bits = Bits::new().put(0b0111, 4).put(0xFF, 8);
        assert!(matches!(
            parse_segments(&bits.bytes(), v1()),
            Err(SymbolError::InvalidBitstream(_))
        ));
    }

    #[test]
    fn test_structured_append_header() {
        let bits = Bits::new()
            .put(0b0011, 4)
            .put(1, 4)
            .put(2, 4)
            .put(0x5A, 8)
            .put(0b0100, 4)
            .put(1, 8)
            .put(b'Z' as u32, 8);
        let parsed = parse_segments(&bits.bytes(), v1()).unwrap();
        assert_eq!(
            parsed.structured_append,
            Some(StructuredAppend {
                index: 1,
                total: 3,
                parity: 0x5A
            })
        );
        assert_eq!(parsed.payload, b"Z");
    }

    #[test]
    fn test_fnc1_modes_carry_no_payload() {
        let bits = Bits::new()
            .put(0b0101, 4)
            .put(0b1001, 4)
            .put(37, 8)
            .put(0b0100, 4)
            .put(1, 8)
            .put(b'9' as u32, 8);
        let parsed = parse_segments(&bits.bytes(), v1()).unwrap();
        assert_eq!(parsed.payload, b"9");
        assert_eq!(parsed.segments[0].mode, SegmentMode::Fnc1First);
        assert_eq!(parsed.segments[1].mode, SegmentMode::Fnc1Second);
    }

    #[test]
    fn test_unknown_mode() {
        let bits = Bits::new().put(0b0110, 4).put(0, 4);
        assert_eq!(
            parse_segments(&bits.bytes(), v1()),
            Err(SymbolError::InvalidBitstream("unknown mode indicator"))
        );
    }

    #[test]
    fn test_count_beyond_stream() {
        let bits = Bits::new().put(0b0100, 4).put(200, 8).put(0x41, 8);
        assert_eq!(
            parse_segments(&bits.bytes(), v1()),
            Err(SymbolError::TruncatedStream)
        );
    }

    #[test]
    fn test_short_tail_ends_stream() {
        // 21 bits of numeric segment leave three padding bits
        let bits = Bits::new().put(0b0001, 4).put(2, 10).put(42, 7);
        let bytes = bits.bytes();
        assert_eq!(bytes.len(), 3);
        let parsed = parse_segments(&bytes, v1()).unwrap();
        assert_eq!(parsed.payload, b"42");
    }

    #[test]
    fn test_empty_stream() {
        let parsed = parse_segments(&[0x00, 0xEC, 0x11], v1()).unwrap();
        assert!(parsed.payload.is_empty());
        assert!(parsed.segments.is_empty());
    }
}
