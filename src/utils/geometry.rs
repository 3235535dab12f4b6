/// Geometry utilities for perspective transformations and calculations
use crate::models::Point;

/// Perspective transformation matrix (3x3, a33 = 1)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerspectiveTransform {
    a11: f64,
    a12: f64,
    a13: f64,
    a21: f64,
    a22: f64,
    a23: f64,
    a31: f64,
    a32: f64,
}

impl PerspectiveTransform {
    /// Create transform mapping 4 source points onto 4 destination points
    pub fn from_points(src: &[Point; 4], dst: &[Point; 4]) -> Option<Self> {
        // Direct linear transform with a33 fixed to 1
        let mut a = [[0.0f64; 8]; 8];
        let mut b = [0.0f64; 8];

        for i in 0..4 {
            let (sx, sy) = (src[i].x as f64, src[i].y as f64);
            let (dx, dy) = (dst[i].x as f64, dst[i].y as f64);

            let row = i * 2;
            a[row] = [sx, sy, 1.0, 0.0, 0.0, 0.0, -dx * sx, -dx * sy];
            b[row] = dx;
            a[row + 1] = [0.0, 0.0, 0.0, sx, sy, 1.0, -dy * sx, -dy * sy];
            b[row + 1] = dy;
        }

        let s = solve_linear_system(&a, &b)?;
        if s.iter().any(|v| !v.is_finite()) {
            return None;
        }
        Some(Self {
            a11: s[0],
            a12: s[1],
            a13: s[2],
            a21: s[3],
            a22: s[4],
            a23: s[5],
            a31: s[6],
            a32: s[7],
        })
    }

    /// Transform a point; `None` when it maps to infinity
    pub fn transform(&self, x: f32, y: f32) -> Option<Point> {
        let (x, y) = (x as f64, y as f64);
        let denominator = self.a31 * x + self.a32 * y + 1.0;
        if denominator.abs() < 1e-10 {
            return None;
        }
        let p = Point::new(
            ((self.a11 * x + self.a12 * y + self.a13) / denominator) as f32,
            ((self.a21 * x + self.a22 * y + self.a23) / denominator) as f32,
        );
        p.is_finite().then_some(p)
    }
}

/// Solve 8x8 linear system using Gaussian elimination with partial pivoting
#[allow(clippy::needless_range_loop)]
fn solve_linear_system(a: &[[f64; 8]; 8], b: &[f64; 8]) -> Option<[f64; 8]> {
    let mut a = *a;
    let mut b = *b;
    let n = 8;

    for i in 0..n {
        let mut max_val = a[i][i].abs();
        let mut max_row = i;
        for k in (i + 1)..n {
            if a[k][i].abs() > max_val {
                max_val = a[k][i].abs();
                max_row = k;
            }
        }

        if max_val < 1e-12 {
            return None;
        }

        if max_row != i {
            a.swap(i, max_row);
            b.swap(i, max_row);
        }

        for k in (i + 1)..n {
            let factor = a[k][i] / a[i][i];
            b[k] -= factor * b[i];
            for j in i..n {
                a[k][j] -= factor * a[i][j];
            }
        }
    }

    let mut x = [0.0f64; 8];
    for i in (0..n).rev() {
        let mut sum = b[i];
        for j in (i + 1)..n {
            sum -= a[i][j] * x[j];
        }
        x[i] = sum / a[i][i];
    }

    Some(x)
}

/// Absolute cosine of the angle at `vertex` between the rays to `a` and `b`
pub fn abs_cos_at(vertex: &Point, a: &Point, b: &Point) -> Option<f32> {
    let v1 = vertex.to(a);
    let v2 = vertex.to(b);
    let denom = (v1.x * v1.x + v1.y * v1.y).sqrt() * (v2.x * v2.x + v2.y * v2.y).sqrt();
    if denom <= f32::EPSILON {
        return None;
    }
    Some(((v1.x * v2.x + v1.y * v2.y) / denom).abs())
}

/// Z component of (a - origin) x (b - origin)
pub fn cross(origin: &Point, a: &Point, b: &Point) -> f32 {
    let v1 = origin.to(a);
    let v2 = origin.to(b);
    v1.x * v2.y - v1.y * v2.x
}

/// Whether `p` lies inside the convex quadrilateral `quad` (either winding)
pub fn quad_contains(quad: &[Point; 4], p: &Point) -> bool {
    let mut sign = 0.0f32;
    for i in 0..4 {
        let c = cross(&quad[i], &quad[(i + 1) % 4], p);
        if c == 0.0 {
            continue;
        }
        if sign == 0.0 {
            sign = c.signum();
        } else if c.signum() != sign {
            return false;
        }
    }
    true
}
