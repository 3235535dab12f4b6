use super::Point;

/// QR Code version (1-40, Model 2)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version(u8);

impl Version {
    /// Smallest version
    pub const MIN: Version = Version(1);
    /// Largest version
    pub const MAX: Version = Version(40);

    /// Create a version, `None` outside 1..=40
    pub fn new(number: u8) -> Option<Self> {
        (1..=40).contains(&number).then_some(Self(number))
    }

    /// Version for a symbol side length in modules (`17 + 4v`)
    pub fn from_size(size: usize) -> Option<Self> {
        if size < 21 || (size - 17) % 4 != 0 {
            return None;
        }
        u8::try_from((size - 17) / 4).ok().and_then(Self::new)
    }

    /// Get the version number
    pub fn number(&self) -> u8 {
        self.0
    }

    /// Get the size in modules (width = height)
    pub fn size(&self) -> usize {
        4 * self.0 as usize + 17
    }

    /// Character-count field width group: 0 for 1-9, 1 for 10-26, 2 for 27-40
    pub(crate) fn count_group(&self) -> usize {
        match self.0 {
            1..=9 => 0,
            10..=26 => 1,
            _ => 2,
        }
    }
}

/// Error correction level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ECLevel {
    /// Low (~7% recovery capacity)
    L,
    /// Medium (~15% recovery capacity)
    M,
    /// Quartile (~25% recovery capacity)
    Q,
    /// High (~30% recovery capacity)
    H,
}

impl ECLevel {
    /// Level from the two format-information bits (01=L, 00=M, 11=Q, 10=H)
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0x03 {
            0b01 => ECLevel::L,
            0b00 => ECLevel::M,
            0b11 => ECLevel::Q,
            _ => ECLevel::H,
        }
    }

    /// Two format-information bits for this level
    pub fn to_bits(self) -> u8 {
        match self {
            ECLevel::L => 0b01,
            ECLevel::M => 0b00,
            ECLevel::Q => 0b11,
            ECLevel::H => 0b10,
        }
    }

    /// Row index into the capacity tables (L, M, Q, H order)
    pub(crate) fn index(self) -> usize {
        match self {
            ECLevel::L => 0,
            ECLevel::M => 1,
            ECLevel::Q => 2,
            ECLevel::H => 3,
        }
    }
}

/// Mask pattern (0-7)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaskPattern {
    /// (i + j) % 2 == 0
    Pattern0 = 0,
    /// i % 2 == 0
    Pattern1 = 1,
    /// j % 3 == 0
    Pattern2 = 2,
    /// (i + j) % 3 == 0
    Pattern3 = 3,
    /// (i/2 + j/3) % 2 == 0
    Pattern4 = 4,
    /// (i*j)%2 + (i*j)%3 == 0
    Pattern5 = 5,
    /// ((i*j)%2 + (i*j)%3) % 2 == 0
    Pattern6 = 6,
    /// ((i+j)%2 + (i*j)%3) % 2 == 0
    Pattern7 = 7,
}

impl MaskPattern {
    /// All eight patterns in reference order
    pub const ALL: [MaskPattern; 8] = [
        MaskPattern::Pattern0,
        MaskPattern::Pattern1,
        MaskPattern::Pattern2,
        MaskPattern::Pattern3,
        MaskPattern::Pattern4,
        MaskPattern::Pattern5,
        MaskPattern::Pattern6,
        MaskPattern::Pattern7,
    ];

    /// Get mask pattern from the low three bits
    pub fn from_bits(bits: u8) -> Self {
        Self::ALL[(bits & 0x07) as usize]
    }

    /// Three format-information bits for this pattern
    pub fn to_bits(self) -> u8 {
        self as u8
    }

    /// Check if the module at row `i`, column `j` is inverted by this mask
    pub fn is_masked(&self, i: usize, j: usize) -> bool {
        match self {
            MaskPattern::Pattern0 => (i + j) % 2 == 0,
            MaskPattern::Pattern1 => i % 2 == 0,
            MaskPattern::Pattern2 => j % 3 == 0,
            MaskPattern::Pattern3 => (i + j) % 3 == 0,
            MaskPattern::Pattern4 => (i / 2 + j / 3) % 2 == 0,
            MaskPattern::Pattern5 => ((i * j) % 2 + (i * j) % 3) == 0,
            MaskPattern::Pattern6 => (((i * j) % 2) + ((i * j) % 3)) % 2 == 0,
            MaskPattern::Pattern7 => (((i + j) % 2) + ((i * j) % 3)) % 2 == 0,
        }
    }
}

/// Segment encoding mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentMode {
    /// Digits 0-9
    Numeric,
    /// 45-character uppercase set
    Alphanumeric,
    /// Raw 8-bit bytes
    Byte,
    /// 13-bit Shift JIS double-byte characters
    Kanji,
    /// Extended channel interpretation designator
    Eci,
    /// Structured append header
    StructuredAppend,
    /// FNC1 in first position (GS1)
    Fnc1First,
    /// FNC1 in second position (AIM application indicator)
    Fnc1Second,
}

impl SegmentMode {
    /// Mode from its 4-bit indicator; `None` for the terminator and unknown values
    pub fn from_indicator(bits: u32) -> Option<Self> {
        match bits {
            0b0001 => Some(SegmentMode::Numeric),
            0b0010 => Some(SegmentMode::Alphanumeric),
            0b0100 => Some(SegmentMode::Byte),
            0b1000 => Some(SegmentMode::Kanji),
            0b0111 => Some(SegmentMode::Eci),
            0b0011 => Some(SegmentMode::StructuredAppend),
            0b0101 => Some(SegmentMode::Fnc1First),
            0b1001 => Some(SegmentMode::Fnc1Second),
            _ => None,
        }
    }

    /// Width of the character-count field, for the data-carrying modes
    pub fn count_bits(self, version: Version) -> Option<usize> {
        let widths: [usize; 3] = match self {
            SegmentMode::Numeric => [10, 12, 14],
            SegmentMode::Alphanumeric => [9, 11, 13],
            SegmentMode::Byte => [8, 16, 16],
            SegmentMode::Kanji => [8, 10, 12],
            _ => return None,
        };
        Some(widths[version.count_group()])
    }
}

/// One decoded segment of a symbol's data stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// Encoding mode
    pub mode: SegmentMode,
    /// Decoded bytes contributed to the payload (empty for header modes)
    pub data: Vec<u8>,
    /// Character count from the segment header
    pub char_count: usize,
    /// Bits consumed, header included
    pub bit_len: usize,
    /// ECI designator in force for this segment
    pub eci: Option<u32>,
}

/// Structured append header carried by one symbol of a sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StructuredAppend {
    /// Position of this symbol in the sequence (0-based)
    pub index: u8,
    /// Number of symbols in the sequence
    pub total: u8,
    /// Parity byte of the whole message
    pub parity: u8,
}

/// A successfully decoded symbol
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedSymbol {
    /// Raw payload bytes, segments concatenated in order
    pub payload: Vec<u8>,
    /// QR code version
    pub version: Version,
    /// Error correction level
    pub error_correction: ECLevel,
    /// Mask pattern used
    pub mask_pattern: MaskPattern,
    /// Segments in stream order
    pub segments: Vec<Segment>,
    /// First ECI designator in the stream, if any
    pub eci: Option<u32>,
    /// Structured append header, if present
    pub structured_append: Option<StructuredAppend>,
    /// Codewords repaired by Reed-Solomon across all blocks
    pub corrected_errors: usize,
    /// Symbol corners in image coordinates: top-left, top-right, bottom-right, bottom-left
    pub position: [Point; 4],
}
