/// Finder pattern detection using 1:1:3:1:1 ratio scanning with cross-checks
use crate::models::{BitMatrix, Point};

/// A confirmed finder pattern centre
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FinderPattern {
    /// Sub-pixel centre
    pub center: Point,
    /// Estimated module pitch in pixels
    pub module_size: f32,
    /// Number of scan rows that confirmed this pattern
    pub count: usize,
}

impl FinderPattern {
    /// Pattern confirmed by a single scan
    pub fn new(x: f32, y: f32, module_size: f32) -> Self {
        Self {
            center: Point::new(x, y),
            module_size,
            count: 1,
        }
    }

    /// Same pattern seen again: close in position and pitch
    fn matches(&self, other: &FinderPattern) -> bool {
        let size = other.module_size;
        (self.center.x - other.center.x).abs() <= size
            && (self.center.y - other.center.y).abs() <= size
            && (self.module_size - size).abs() <= self.module_size.max(1.0)
    }

    /// Fold another confirmation into the running average
    fn absorb(&mut self, other: &FinderPattern) {
        let n = self.count as f32;
        let total = n + other.count as f32;
        self.center.x = (self.center.x * n + other.center.x * other.count as f32) / total;
        self.center.y = (self.center.y * n + other.center.y * other.count as f32) / total;
        self.module_size =
            (self.module_size * n + other.module_size * other.count as f32) / total;
        self.count += other.count;
    }
}

#[derive(Clone, Copy)]
enum Axis {
    Horizontal,
    Vertical,
}

/// Row scanner producing deduplicated finder patterns
pub struct FinderDetector;

impl FinderDetector {
    /// Scan every row of the bitmap and return all confirmed patterns
    pub fn detect(matrix: &BitMatrix) -> Vec<FinderPattern> {
        let mut found: Vec<FinderPattern> = Vec::new();
        if matrix.width() == 0 || matrix.height() == 0 {
            return found;
        }

        for y in 0..matrix.height() {
            Self::scan_row(matrix, y, &mut found);
        }

        log::debug!("finder scan: {} patterns", found.len());
        found
    }

    fn scan_row(matrix: &BitMatrix, y: usize, found: &mut Vec<FinderPattern>) {
        let width = matrix.width();
        let mut runs = [0usize; 5];
        let mut colors = [false; 5];
        let mut filled = 0usize;
        let mut run_start = 0usize;
        let mut current = matrix.get(0, y);

        // The row end closes the final run
        for x in 1..=width {
            let color = if x < width { matrix.get(x, y) } else { !current };
            if color == current {
                continue;
            }

            runs.rotate_left(1);
            colors.rotate_left(1);
            runs[4] = x - run_start;
            colors[4] = current;
            filled = (filled + 1).min(5);
            run_start = x;
            current = color;

            let dark_light_dark = colors[0] && !colors[1] && colors[2] && !colors[3] && colors[4];
            if filled == 5 && dark_light_dark && Self::ratio_ok(&runs) {
                if let Some(pattern) = Self::confirm(matrix, &runs, x, y) {
                    Self::merge(found, pattern);
                }
            }
        }
    }

    /// 1:1:3:1:1 within half a module per run
    fn ratio_ok(runs: &[usize; 5]) -> bool {
        let total: usize = runs.iter().sum();
        if total < 7 {
            return false;
        }
        let module = total as f32 / 7.0;
        let tolerance = module / 2.0;
        let expected = [1.0, 1.0, 3.0, 1.0, 1.0];
        runs.iter()
            .zip(expected)
            .all(|(&run, e)| (module * e - run as f32).abs() < tolerance * e)
    }

    /// Vertical then horizontal re-check through the row candidate
    fn confirm(matrix: &BitMatrix, runs: &[usize; 5], end_x: usize, y: usize) -> Option<FinderPattern> {
        let total: usize = runs.iter().sum();
        let center_x = (end_x - runs[4] - runs[3]) as f32 - runs[2] as f32 / 2.0;

        let (center_y, vertical_total) = Self::cross_check(
            matrix,
            Axis::Vertical,
            center_x as usize,
            y,
            runs[2],
            total,
        )?;
        let (center_x, horizontal_total) = Self::cross_check(
            matrix,
            Axis::Horizontal,
            center_y as usize,
            center_x as usize,
            runs[2],
            total,
        )?;

        let module_size = (vertical_total + horizontal_total) as f32 / 14.0;
        Some(FinderPattern::new(center_x, center_y, module_size))
    }

    /// Count the five runs through `center` along one axis.
    ///
    /// Returns the refined centre coordinate on that axis and the run total.
    fn cross_check(
        matrix: &BitMatrix,
        axis: Axis,
        fixed: usize,
        center: usize,
        max_count: usize,
        original_total: usize,
    ) -> Option<(f32, usize)> {
        let len = match axis {
            Axis::Horizontal => matrix.width(),
            Axis::Vertical => matrix.height(),
        };
        let dark = |i: usize| match axis {
            Axis::Horizontal => matrix.get(i, fixed),
            Axis::Vertical => matrix.get(fixed, i),
        };

        let mut counts = [0usize; 5];

        // Walk back from the centre
        let mut i = center as isize;
        while i >= 0 && dark(i as usize) {
            counts[2] += 1;
            i -= 1;
        }
        if i < 0 {
            return None;
        }
        while i >= 0 && !dark(i as usize) && counts[1] <= max_count {
            counts[1] += 1;
            i -= 1;
        }
        if i < 0 || counts[1] > max_count {
            return None;
        }
        while i >= 0 && dark(i as usize) && counts[0] <= max_count {
            counts[0] += 1;
            i -= 1;
        }
        if counts[0] > max_count {
            return None;
        }

        // Walk forward
        let mut i = center + 1;
        while i < len && dark(i) {
            counts[2] += 1;
            i += 1;
        }
        if i == len {
            return None;
        }
        while i < len && !dark(i) && counts[3] <= max_count {
            counts[3] += 1;
            i += 1;
        }
        if i == len || counts[3] > max_count {
            return None;
        }
        while i < len && dark(i) && counts[4] <= max_count {
            counts[4] += 1;
            i += 1;
        }
        if counts[4] > max_count {
            return None;
        }

        let total: usize = counts.iter().sum();
        if 5 * total.abs_diff(original_total) >= 2 * original_total {
            return None;
        }
        if !Self::ratio_ok(&counts) {
            return None;
        }

        let center = (i - counts[4] - counts[3]) as f32 - counts[2] as f32 / 2.0;
        Some((center, total))
    }

    fn merge(found: &mut Vec<FinderPattern>, candidate: FinderPattern) {
        match found.iter_mut().find(|f| f.matches(&candidate)) {
            Some(existing) => existing.absorb(&candidate),
            None => found.push(candidate),
        }
    }
}

/// Keep the most confirmed patterns, at most `max_patterns`.
///
/// Single-row detections are dropped unless that would leave fewer than three.
pub fn strongest_patterns(patterns: &[FinderPattern], max_patterns: usize) -> Vec<FinderPattern> {
    let confirmed: Vec<FinderPattern> = patterns.iter().filter(|p| p.count >= 2).copied().collect();
    let mut selected = if confirmed.len() >= 3 {
        confirmed
    } else {
        patterns.to_vec()
    };
    selected.sort_by(|a, b| b.count.cmp(&a.count));
    selected.truncate(max_patterns);
    selected
}
