/// Timing pattern agreement for a sampled module grid
///
/// Row 6 and column 6 alternate dark/light between the finders, starting
/// dark at module 8. A grid sampled at the wrong size loses that rhythm.
use crate::models::BitMatrix;

/// Fraction of timing modules (row 6 and column 6) that match the expected alternation
pub fn timing_agreement(grid: &BitMatrix) -> f32 {
    let size = grid.width().min(grid.height());
    if size < 17 {
        return 0.0;
    }

    let mut matches = 0usize;
    let mut total = 0usize;
    for i in 8..size - 8 {
        let expected = i % 2 == 0;
        matches += (grid.get(i, 6) == expected) as usize;
        matches += (grid.get(6, i) == expected) as usize;
        total += 2;
    }
    matches as f32 / total as f32
}
