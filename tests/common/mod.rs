//! Test-only QR encoder and renderer
#![allow(dead_code)]

use qrscan::decoder::bch::{format_codeword, version_codeword};
use qrscan::decoder::bitstream::BitstreamExtractor;
use qrscan::decoder::format::format_bit_positions;
use qrscan::decoder::function_mask::{FunctionMask, alignment_pattern_centers};
use qrscan::decoder::reed_solomon::Gf256;
use qrscan::decoder::tables::ec_block_info;
use qrscan::decoder::unmask::mask;
use qrscan::decoder::version::version_bit_positions;
use qrscan::{BitMatrix, ECLevel, MaskPattern, SegmentMode, Version};

/// MSB-first bit buffer for building data streams
#[derive(Default)]
pub struct BitBuffer {
    bits: Vec<bool>,
}

impl BitBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, value: u32, count: usize) -> &mut Self {
        for i in (0..count).rev() {
            self.bits.push((value >> i) & 1 == 1);
        }
        self
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Byte-mode segment header and body
    pub fn byte_segment(&mut self, payload: &[u8], version: Version) -> &mut Self {
        let count_bits = SegmentMode::Byte.count_bits(version).unwrap();
        self.push(0b0100, 4).push(payload.len() as u32, count_bits);
        for &b in payload {
            self.push(b as u32, 8);
        }
        self
    }

    /// Numeric-mode segment for an ASCII digit string
    pub fn numeric_segment(&mut self, digits: &str, version: Version) -> &mut Self {
        let count_bits = SegmentMode::Numeric.count_bits(version).unwrap();
        self.push(0b0001, 4).push(digits.len() as u32, count_bits);
        for chunk in digits.as_bytes().chunks(3) {
            let value = chunk.iter().fold(0u32, |v, &d| v * 10 + (d - b'0') as u32);
            let bits = match chunk.len() {
                3 => 10,
                2 => 7,
                _ => 4,
            };
            self.push(value, bits);
        }
        self
    }

    /// Alphanumeric-mode segment
    pub fn alphanumeric_segment(&mut self, text: &str, version: Version) -> &mut Self {
        const TABLE: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ $%*+-./:";
        let count_bits = SegmentMode::Alphanumeric.count_bits(version).unwrap();
        self.push(0b0010, 4).push(text.len() as u32, count_bits);
        let values: Vec<u32> = text
            .bytes()
            .map(|c| TABLE.iter().position(|&t| t == c).unwrap() as u32)
            .collect();
        for pair in values.chunks(2) {
            match pair {
                [a, b] => self.push(a * 45 + b, 11),
                [a] => self.push(*a, 6),
                _ => unreachable!(),
            };
        }
        self
    }

    /// ECI designator below 128
    pub fn eci(&mut self, designator: u32) -> &mut Self {
        self.push(0b0111, 4).push(designator, 8)
    }

    /// Terminate, byte-align and pad to `capacity` codewords
    pub fn into_codewords(mut self, capacity: usize) -> Vec<u8> {
        let capacity_bits = capacity * 8;
        assert!(self.len() <= capacity_bits, "payload too long for symbol");
        let terminator = (capacity_bits - self.len()).min(4);
        self.push(0, terminator);
        while self.len() % 8 != 0 {
            self.bits.push(false);
        }
        let mut codewords: Vec<u8> = self
            .bits
            .chunks(8)
            .map(|c| c.iter().fold(0u8, |b, &bit| (b << 1) | bit as u8))
            .collect();
        for pad in [0xEC, 0x11].into_iter().cycle() {
            if codewords.len() >= capacity {
                break;
            }
            codewords.push(pad);
        }
        codewords
    }
}

/// Reed-Solomon ECC codewords for one block
pub fn rs_ecc(data: &[u8], num_ecc: usize) -> Vec<u8> {
    let mut generator = vec![1u8];
    for i in 0..num_ecc {
        let root = Gf256::exp(i);
        let mut next = vec![0u8; generator.len() + 1];
        for (j, &c) in generator.iter().enumerate() {
            next[j] ^= c;
            next[j + 1] ^= Gf256::mul(c, root);
        }
        generator = next;
    }

    let mut remainder = vec![0u8; num_ecc];
    for &d in data {
        let factor = d ^ remainder[0];
        remainder.rotate_left(1);
        remainder[num_ecc - 1] = 0;
        for (r, &g) in remainder.iter_mut().zip(&generator[1..]) {
            *r ^= Gf256::mul(g, factor);
        }
    }
    remainder
}

/// Split data into blocks, append ECC and interleave
pub fn interleave_with_ecc(data: &[u8], version: Version, level: ECLevel) -> Vec<u8> {
    let info = ec_block_info(version, level);
    assert_eq!(data.len(), info.data_codewords());

    let mut blocks = Vec::with_capacity(info.num_blocks);
    let mut offset = 0;
    for b in 0..info.num_blocks {
        let len = info.block_data_len(b);
        let block = &data[offset..offset + len];
        blocks.push((block.to_vec(), rs_ecc(block, info.ecc_per_block)));
        offset += len;
    }

    let mut out = Vec::with_capacity(info.total_codewords);
    let longest = info.block_data_len(info.num_blocks - 1);
    for i in 0..longest {
        for (block, _) in &blocks {
            if let Some(&c) = block.get(i) {
                out.push(c);
            }
        }
    }
    for i in 0..info.ecc_per_block {
        for (_, ecc) in &blocks {
            out.push(ecc[i]);
        }
    }
    out
}

/// Build the complete module grid for a data stream
pub fn build_symbol(bits: BitBuffer, version: Version, level: ECLevel, pattern: MaskPattern) -> BitMatrix {
    let info = ec_block_info(version, level);
    let data = bits.into_codewords(info.data_codewords());
    let codewords = interleave_with_ecc(&data, version, level);

    let size = version.size();
    let func = FunctionMask::new(version);
    let mut m = BitMatrix::new(size, size);

    // Finders with separators
    for (cx, cy) in [(3isize, 3isize), (size as isize - 4, 3), (3, size as isize - 4)] {
        for dy in -4..=4isize {
            for dx in -4..=4isize {
                let (x, y) = (cx + dx, cy + dy);
                if x < 0 || y < 0 || x >= size as isize || y >= size as isize {
                    continue;
                }
                let ring = dx.abs().max(dy.abs());
                m.set(x as usize, y as usize, matches!(ring, 0 | 1 | 3));
            }
        }
    }

    for i in 8..size - 8 {
        m.set(i, 6, i % 2 == 0);
        m.set(6, i, i % 2 == 0);
    }

    for (ax, ay) in alignment_pattern_centers(version) {
        for dy in -2..=2isize {
            for dx in -2..=2isize {
                let x = (ax as isize + dx) as usize;
                let y = (ay as isize + dy) as usize;
                m.set(x, y, dx.abs().max(dy.abs()) != 1);
            }
        }
    }

    let format = format_codeword((level.to_bits() << 3) | pattern.to_bits());
    for i in 0..15 {
        for (x, y) in format_bit_positions(size, i) {
            m.set(x, y, (format >> i) & 1 == 1);
        }
    }
    m.set(8, size - 8, true);

    if version.number() >= 7 {
        let word = version_codeword(version.number());
        for i in 0..18 {
            for (x, y) in version_bit_positions(size, i) {
                m.set(x, y, (word >> i) & 1 == 1);
            }
        }
    }

    let positions = BitstreamExtractor::data_module_positions(&func);
    for (index, &(x, y)) in positions.iter().enumerate() {
        let bit = codewords
            .get(index / 8)
            .is_some_and(|&c| (c >> (7 - index % 8)) & 1 == 1);
        m.set(x, y, bit);
    }
    mask(&mut m, pattern, &func);
    m
}

/// Byte-mode symbol for `payload`
pub fn encode_bytes(payload: &[u8], version: u8, level: ECLevel, pattern: MaskPattern) -> BitMatrix {
    let version = Version::new(version).unwrap();
    let mut bits = BitBuffer::new();
    bits.byte_segment(payload, version);
    build_symbol(bits, version, level, pattern)
}

/// Grid from `#`/`.` rows
pub fn parse_grid(rows: &[&str]) -> BitMatrix {
    let mut m = BitMatrix::new(rows[0].len(), rows.len());
    for (y, row) in rows.iter().enumerate() {
        for (x, c) in row.bytes().enumerate() {
            m.set(x, y, c == b'#');
        }
    }
    m
}

/// Luminance canvas; dark modules are 0, background 255
pub struct Canvas {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<u8>,
}

impl Canvas {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![255; width * height],
        }
    }

    /// Paint a symbol with its top-left module at pixel (x, y)
    pub fn draw(&mut self, symbol: &BitMatrix, x: usize, y: usize, scale: usize) -> &mut Self {
        for my in 0..symbol.height() {
            for mx in 0..symbol.width() {
                if !symbol.get(mx, my) {
                    continue;
                }
                for py in 0..scale {
                    for px in 0..scale {
                        self.pixels[(y + my * scale + py) * self.width + x + mx * scale + px] = 0;
                    }
                }
            }
        }
        self
    }

    /// Paint a symbol rotated by `degrees` about the canvas centre
    pub fn draw_rotated(&mut self, symbol: &BitMatrix, scale: usize, degrees: f32) -> &mut Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        let side = (symbol.width() * scale) as f32;
        let (cx, cy) = (self.width as f32 / 2.0, self.height as f32 / 2.0);
        for y in 0..self.height {
            for x in 0..self.width {
                let dx = x as f32 + 0.5 - cx;
                let dy = y as f32 + 0.5 - cy;
                let u = cos * dx + sin * dy + side / 2.0;
                let v = -sin * dx + cos * dy + side / 2.0;
                if u < 0.0 || v < 0.0 {
                    continue;
                }
                let (mx, my) = ((u / scale as f32) as usize, (v / scale as f32) as usize);
                if mx < symbol.width() && my < symbol.height() && symbol.get(mx, my) {
                    self.pixels[y * self.width + x] = 0;
                }
            }
        }
        self
    }

    /// Low-contrast rendering under a left-to-right brightening ramp
    pub fn shade(&mut self, ramp: u8) -> &mut Self {
        for y in 0..self.height {
            for x in 0..self.width {
                let g = (ramp as usize * x / self.width) as u8;
                let p = &mut self.pixels[y * self.width + x];
                *p = if *p > 127 {
                    (*p / 2).saturating_add(g).saturating_add(40)
                } else {
                    g / 2 + 20
                };
            }
        }
        self
    }
}

/// Canvas with one symbol and a 4-module quiet zone
pub fn render(symbol: &BitMatrix, scale: usize) -> Canvas {
    let side = (symbol.width() + 8) * scale;
    let mut canvas = Canvas::new(side, side);
    canvas.draw(symbol, 4 * scale, 4 * scale, scale);
    canvas
}
