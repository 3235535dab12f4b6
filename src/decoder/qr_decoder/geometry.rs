use crate::detector::alignment::find_alignment;
use crate::detector::grouping::FinderTriple;
use crate::error::SymbolError;
use crate::models::{BitMatrix, Point, Version};
use crate::utils::geometry::PerspectiveTransform;

/// Walk step when measuring runs, in pixels
const RUN_STEP: f32 = 0.5;
/// Accepted ratio between the measured pitch and the finder estimate
const MAX_PITCH_MISMATCH: f32 = 2.0;
/// Farthest, in modules, a located alignment centre may sit from its prediction
const MAX_ALIGNMENT_OFFSET: f32 = 2.0;

/// A finder triple with its resolved sampling geometry
#[derive(Debug, Clone, Copy)]
pub struct SymbolCandidate {
    /// Ordered finders
    pub triple: FinderTriple,
    /// Version the transform was fitted for
    pub version: Version,
    /// Bottom-right alignment centre, when found
    pub alignment: Option<Point>,
    /// Module space to image space
    pub transform: PerspectiveTransform,
}

impl SymbolCandidate {
    /// Fit the module-to-image transform for `version`.
    ///
    /// Starts from the parallelogram through the three finder centres and,
    /// for versions with an alignment pattern, refits with the located
    /// bottom-right alignment centre as the fourth anchor.
    pub fn resolve(
        binary: &BitMatrix,
        triple: &FinderTriple,
        version: Version,
    ) -> Result<Self, SymbolError> {
        let dim = version.size() as f32;
        let tl = triple.top_left;
        let tr = triple.top_right;
        let bl = triple.bottom_left;
        let br = Point::new(tr.x + bl.x - tl.x, tr.y + bl.y - tl.y);

        let finder_src = [
            Point::new(3.5, 3.5),
            Point::new(dim - 3.5, 3.5),
            Point::new(3.5, dim - 3.5),
        ];
        let src = [finder_src[0], finder_src[1], finder_src[2], Point::new(dim - 3.5, dim - 3.5)];
        let mut transform = PerspectiveTransform::from_points(&src, &[tl, tr, bl, br])
            .ok_or(SymbolError::GeometryDegenerate)?;

        let mut alignment = None;
        if version.number() >= 2 {
            let anchor = Point::new(dim - 6.5, dim - 6.5);
            let pitch = triple.mean_leg() / (dim - 7.0);
            let found = transform.transform(anchor.x, anchor.y).and_then(|predicted| {
                let center = find_alignment(binary, predicted, pitch)?;
                if center.distance(&predicted) > MAX_ALIGNMENT_OFFSET * pitch {
                    log::trace!(
                        "alignment at ({:.1}, {:.1}) too far from ({:.1}, {:.1})",
                        center.x,
                        center.y,
                        predicted.x,
                        predicted.y
                    );
                    return None;
                }
                Some(center)
            });
            if let Some(center) = found {
                let src = [finder_src[0], finder_src[1], finder_src[2], anchor];
                if let Some(refit) = PerspectiveTransform::from_points(&src, &[tl, tr, bl, center]) {
                    transform = refit;
                    alignment = Some(center);
                }
            }
        }

        Ok(Self {
            triple: *triple,
            version,
            alignment,
            transform,
        })
    }

    /// Symbol corners in image space: TL, TR, BR, BL
    pub fn corners(&self) -> Result<[Point; 4], SymbolError> {
        let d = self.version.size() as f32;
        let map = |x: f32, y: f32| {
            self.transform
                .transform(x, y)
                .ok_or(SymbolError::GeometryDegenerate)
        };
        Ok([map(0.0, 0.0)?, map(d, 0.0)?, map(d, d)?, map(0.0, d)?])
    }
}

/// Distance from `p` toward `q` at which the walk leaves the outer dark
/// ring of the finder centred on `p`.
///
/// The walk crosses core, light ring and dark ring; `None` if it leaves the
/// image or passes `q` first.
pub fn run_length(binary: &BitMatrix, p: Point, q: Point) -> Option<f32> {
    let v = p.to(&q);
    let norm = (v.x * v.x + v.y * v.y).sqrt();
    if !norm.is_finite() || norm <= 0.0 {
        return None;
    }
    let (ux, uy) = (v.x / norm, v.y / norm);

    // 0: core, 1: light ring, 2: dark ring
    let mut state = 0u8;
    let mut t = 0.0f32;
    loop {
        let x = (p.x + ux * t).floor();
        let y = (p.y + uy * t).floor();
        if x < 0.0 || y < 0.0 || x >= binary.width() as f32 || y >= binary.height() as f32 {
            return None;
        }
        let dark = binary.get(x as usize, y as usize);
        match (state, dark) {
            (0, false) => state = 1,
            (1, true) => state = 2,
            (2, false) => return Some(t),
            _ => {}
        }
        t += RUN_STEP;
        if t > norm {
            return None;
        }
    }
}

/// Module pitch through the finder at `p`, measured along the direction to `q`.
///
/// Both half-widths together span 7 modules; a single side spans 3.5.
pub fn pitch_along(binary: &BitMatrix, p: Point, q: Point) -> Option<f32> {
    let forward = run_length(binary, p, q);
    let backward = run_length(binary, p, p.mirror(&q));
    match (forward, backward) {
        (Some(a), Some(b)) => Some((a + b) / 7.0),
        (Some(a), None) | (None, Some(a)) => Some(a / 3.5),
        (None, None) => None,
    }
}

/// Mean pitch along both finder-to-finder legs, measured at both ends
pub fn estimate_pitch(binary: &BitMatrix, triple: &FinderTriple) -> Result<f32, SymbolError> {
    let (tl, tr, bl) = (triple.top_left, triple.top_right, triple.bottom_left);
    let samples: Vec<f32> = [(tl, tr), (tr, tl), (tl, bl), (bl, tl)]
        .into_iter()
        .filter_map(|(p, q)| pitch_along(binary, p, q))
        .collect();
    if samples.is_empty() {
        return Err(SymbolError::GeometryDegenerate);
    }
    let pitch = samples.iter().sum::<f32>() / samples.len() as f32;

    let ratio = pitch / triple.module_size;
    if !(1.0 / MAX_PITCH_MISMATCH..=MAX_PITCH_MISMATCH).contains(&ratio) {
        log::trace!(
            "measured pitch {:.2} disagrees with finder pitch {:.2}",
            pitch,
            triple.module_size
        );
        return Err(SymbolError::GeometryDegenerate);
    }
    Ok(pitch)
}

/// Nearest version to `mean_leg / pitch + 7` modules
pub fn estimate_version(mean_leg: f32, pitch: f32) -> Result<Version, SymbolError> {
    let dimension = mean_leg / pitch + 7.0;
    let number = ((dimension - 17.0) / 4.0).round();
    if !(1.0..=40.0).contains(&number) {
        return Err(SymbolError::UnknownSizeClass);
    }
    Version::new(number as u8).ok_or(SymbolError::UnknownSizeClass)
}

/// The estimate followed by its valid neighbours
pub fn version_candidates(estimate: Version) -> Vec<Version> {
    let n = estimate.number();
    [Some(n), n.checked_sub(1), n.checked_add(1)]
        .into_iter()
        .flatten()
        .filter_map(Version::new)
        .collect()
}
