/// Alignment pattern search for QR versions 2+
///
/// The pattern is a 5x5 block: dark ring, light ring, dark centre module.
use crate::models::{BitMatrix, Point};

/// Largest number of mismatching template cells accepted
pub const MAX_TEMPLATE_MISMATCH: usize = 5;

/// Search for the alignment pattern centre around `predicted`.
///
/// Every pixel within `max(4, 4 * module_size)` of the prediction is scored
/// against the 25-cell template; the centroid of the best-scoring pixels is
/// returned when it mismatches at most [`MAX_TEMPLATE_MISMATCH`] cells.
pub fn find_alignment(matrix: &BitMatrix, predicted: Point, module_size: f32) -> Option<Point> {
    if !predicted.is_finite() || module_size <= 0.0 || matrix.width() == 0 || matrix.height() == 0 {
        return None;
    }

    let radius = (module_size * 4.0).max(4.0);
    let max_x = matrix.width() as f32 - 1.0;
    let max_y = matrix.height() as f32 - 1.0;
    let min_x = (predicted.x - radius).floor().max(0.0) as usize;
    let min_y = (predicted.y - radius).floor().max(0.0) as usize;
    let end_x = (predicted.x + radius).ceil().min(max_x);
    let end_y = (predicted.y + radius).ceil().min(max_y);
    if end_x < 0.0 || end_y < 0.0 {
        return None;
    }

    let mut best = usize::MAX;
    let mut sum = (0.0f32, 0.0f32);
    let mut ties = 0usize;
    for y in min_y..=end_y as usize {
        for x in min_x..=end_x as usize {
            let Some(mismatch) = template_mismatch(matrix, x, y, module_size) else {
                continue;
            };
            if mismatch < best {
                best = mismatch;
                sum = (x as f32, y as f32);
                ties = 1;
            } else if mismatch == best {
                sum.0 += x as f32;
                sum.1 += y as f32;
                ties += 1;
            }
        }
    }

    if ties == 0 || best > MAX_TEMPLATE_MISMATCH {
        log::trace!("no alignment pattern near ({:.1}, {:.1})", predicted.x, predicted.y);
        return None;
    }
    Some(Point::new(
        sum.0 / ties as f32 + 0.5,
        sum.1 / ties as f32 + 0.5,
    ))
}

/// Template cells disagreeing with the bitmap when centred on pixel (x, y)
fn template_mismatch(matrix: &BitMatrix, x: usize, y: usize, module_size: f32) -> Option<usize> {
    let mut mismatches = 0usize;
    for dy in -2i32..=2 {
        for dx in -2i32..=2 {
            let expected = dx.abs() == 2 || dy.abs() == 2 || (dx == 0 && dy == 0);
            let sx = (x as f32 + 0.5 + dx as f32 * module_size).floor();
            let sy = (y as f32 + 0.5 + dy as f32 * module_size).floor();
            if sx < 0.0 || sy < 0.0 {
                return None;
            }
            let (ix, iy) = (sx as usize, sy as usize);
            if ix >= matrix.width() || iy >= matrix.height() {
                return None;
            }
            if matrix.get(ix, iy) != expected {
                mismatches += 1;
            }
        }
    }
    Some(mismatches)
}
