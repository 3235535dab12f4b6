use crate::models::{BitMatrix, Version};

/// Function module mask for a specific QR version.
/// true = function module (not data), false = data module.
pub struct FunctionMask {
    mask: BitMatrix,
    version: Version,
}

impl FunctionMask {
    /// Classify every module of a `version` symbol
    pub fn new(version: Version) -> Self {
        let size = version.size();
        let mut mask = BitMatrix::new(size, size);

        // Finder patterns + separators (8x8 areas clipped to bounds)
        Self::mark_finder_area(&mut mask, 0, 0);
        Self::mark_finder_area(&mut mask, size - 7, 0);
        Self::mark_finder_area(&mut mask, 0, size - 7);

        // Timing patterns (row 6 and column 6)
        for i in 0..size {
            mask.set(6, i, true);
            mask.set(i, 6, true);
        }

        for (cx, cy) in alignment_pattern_centers(version) {
            for y in cy - 2..=cy + 2 {
                for x in cx - 2..=cx + 2 {
                    mask.set(x, y, true);
                }
            }
        }

        // Format info areas, dark module included
        for i in 0..9 {
            mask.set(8, i, true);
            mask.set(i, 8, true);
        }
        for i in 0..8 {
            mask.set(size - 1 - i, 8, true);
            mask.set(8, size - 1 - i, true);
        }

        if version.number() >= 7 {
            for dy in 0..6 {
                for dx in 0..3 {
                    mask.set(size - 11 + dx, dy, true);
                    mask.set(dy, size - 11 + dx, true);
                }
            }
        }

        Self { mask, version }
    }

    /// Side length in modules
    pub fn size(&self) -> usize {
        self.mask.width()
    }

    /// Version this mask was built for
    pub fn version(&self) -> Version {
        self.version
    }

    /// Whether (x, y) belongs to a function pattern
    pub fn is_function(&self, x: usize, y: usize) -> bool {
        self.mask.get(x, y)
    }

    /// Number of data-bearing modules
    pub fn data_modules_count(&self) -> usize {
        let size = self.size();
        size * size - self.mask.count_ones()
    }

    fn mark_finder_area(mask: &mut BitMatrix, x: usize, y: usize) {
        let size = mask.width();
        let start_x = x.saturating_sub(1);
        let start_y = y.saturating_sub(1);
        let end_x = (x + 8).min(size);
        let end_y = (y + 8).min(size);
        for yy in start_y..end_y {
            for xx in start_x..end_x {
                mask.set(xx, yy, true);
            }
        }
    }
}

/// Alignment pattern row/column coordinates for a given version.
pub fn alignment_pattern_positions(version: Version) -> Vec<usize> {
    let v = version.number() as usize;
    if v == 1 {
        return Vec::new();
    }
    let num_align = v / 7 + 2;
    let size = version.size();
    let step = if v == 32 {
        26
    } else {
        (v * 4 + num_align * 2 + 1) / (num_align * 2 - 2) * 2
    };

    let mut positions = vec![6usize; num_align];
    let mut pos = size - 7;
    for slot in positions.iter_mut().skip(1).rev() {
        *slot = pos;
        pos -= step;
    }
    positions
}

/// Alignment pattern centres (x, y), skipping the three finder corners
pub fn alignment_pattern_centers(version: Version) -> Vec<(usize, usize)> {
    let positions = alignment_pattern_positions(version);
    let last = positions.len().saturating_sub(1);
    let mut centers = Vec::new();
    for (i, &x) in positions.iter().enumerate() {
        for (j, &y) in positions.iter().enumerate() {
            let corner = (i == 0 && j == 0) || (i == 0 && j == last) || (i == last && j == 0);
            if !corner {
                centers.push((x, y));
            }
        }
    }
    centers
}
