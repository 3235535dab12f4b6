/// Finder triple grouping, ordering and scoring
use crate::detector::finder::FinderPattern;
use crate::models::Point;
use crate::utils::geometry::{abs_cos_at, cross};

/// Largest |cos| accepted at the top-left corner
pub const MAX_CORNER_COS: f32 = 0.3;
/// Largest ratio between the two legs from the top-left finder
pub const MAX_LEG_RATIO: f32 = 1.5;
/// Finders closer than this many module pitches overlap
const MIN_SEPARATION_MODULES: f32 = 7.0;

/// Three finders ordered as the corners of one candidate symbol
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FinderTriple {
    /// Indices into the pattern list, ascending
    pub indices: [usize; 3],
    /// Right-angle vertex
    pub top_left: Point,
    /// Clockwise neighbour of the top-left finder
    pub top_right: Point,
    /// Counter-clockwise neighbour of the top-left finder
    pub bottom_left: Point,
    /// Mean finder pitch
    pub module_size: f32,
    /// `2 * pitch_ratio + leg_ratio + |cos|`; lower is better
    pub score: f32,
}

impl FinderTriple {
    /// Finder centres in TL, TR, BL order
    pub fn centers(&self) -> [Point; 3] {
        [self.top_left, self.top_right, self.bottom_left]
    }

    /// Mean distance from the top-left finder to the other two
    pub fn mean_leg(&self) -> f32 {
        (self.top_left.distance(&self.top_right) + self.top_left.distance(&self.bottom_left)) / 2.0
    }
}

/// Pick the right-angle vertex as top-left and orient the other two.
///
/// Returns (top-left, top-right, bottom-left, |cos| at top-left).
pub fn order_finders(points: [Point; 3]) -> Option<(Point, Point, Point, f32)> {
    let mut best: Option<(usize, f32)> = None;
    for i in 0..3 {
        let Some(cos) = abs_cos_at(&points[i], &points[(i + 1) % 3], &points[(i + 2) % 3]) else {
            continue;
        };
        if best.is_none_or(|(_, c)| cos < c) {
            best = Some((i, cos));
        }
    }
    let (i, cos) = best?;

    let tl = points[i];
    let p1 = points[(i + 1) % 3];
    let p2 = points[(i + 2) % 3];
    // Image y grows downward, so TL -> TR -> BL turns positive
    let (tr, bl) = if cross(&tl, &p1, &p2) > 0.0 {
        (p1, p2)
    } else {
        (p2, p1)
    };
    Some((tl, tr, bl, cos))
}

/// Every plausible triple, best score first.
///
/// Ties keep the lexicographically smallest index triple first.
pub fn candidate_triples(patterns: &[FinderPattern], max_pitch_ratio: f32) -> Vec<FinderTriple> {
    let mut triples = Vec::new();
    let n = patterns.len();

    for i in 0..n {
        for j in (i + 1)..n {
            for k in (j + 1)..n {
                if let Some(triple) = score_triple(patterns, [i, j, k], max_pitch_ratio) {
                    triples.push(triple);
                }
            }
        }
    }

    triples.sort_by(|a, b| a.score.total_cmp(&b.score).then(a.indices.cmp(&b.indices)));
    log::debug!("{} finder patterns formed {} triples", n, triples.len());
    triples
}

fn score_triple(
    patterns: &[FinderPattern],
    indices: [usize; 3],
    max_pitch_ratio: f32,
) -> Option<FinderTriple> {
    let [a, b, c] = indices.map(|i| &patterns[i]);
    let sizes = [a.module_size, b.module_size, c.module_size];
    let min_size = sizes.iter().copied().fold(f32::INFINITY, f32::min);
    let max_size = sizes.iter().copied().fold(0.0f32, f32::max);
    if min_size <= 0.0 {
        return None;
    }
    let pitch_ratio = max_size / min_size;
    if pitch_ratio > max_pitch_ratio {
        return None;
    }

    let (top_left, top_right, bottom_left, cos) = order_finders([a.center, b.center, c.center])?;
    if cos > MAX_CORNER_COS {
        return None;
    }

    let d_tr = top_left.distance(&top_right);
    let d_bl = top_left.distance(&bottom_left);
    let min_leg = d_tr.min(d_bl);
    if min_leg < max_size * MIN_SEPARATION_MODULES {
        return None;
    }
    let leg_ratio = d_tr.max(d_bl) / min_leg;
    if leg_ratio > MAX_LEG_RATIO {
        return None;
    }

    Some(FinderTriple {
        indices,
        top_left,
        top_right,
        bottom_left,
        module_size: (a.module_size + b.module_size + c.module_size) / 3.0,
        score: 2.0 * pitch_ratio + leg_ratio + cos,
    })
}
