/// 2D point with floating point coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    /// X coordinate
    pub x: f32,
    /// Y coordinate
    pub y: f32,
}

impl Point {
    /// Create a new point
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Calculate distance to another point
    pub fn distance(&self, other: &Point) -> f32 {
        self.distance_squared(other).sqrt()
    }

    /// Calculate squared distance (faster, no sqrt)
    pub fn distance_squared(&self, other: &Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Vector from `self` to `other`
    pub fn to(&self, other: &Point) -> Point {
        Point::new(other.x - self.x, other.y - self.y)
    }

    /// Point reflected through `self`
    pub fn mirror(&self, other: &Point) -> Point {
        Point::new(2.0 * self.x - other.x, 2.0 * self.y - other.y)
    }

    /// Both coordinates finite
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert!((a.distance(&b) - 5.0).abs() < 1e-6);
        assert_eq!(a.distance_squared(&b), 25.0);
    }

    #[test]
    fn test_mirror() {
        let c = Point::new(10.0, 10.0);
        assert_eq!(c.mirror(&Point::new(12.0, 7.0)), Point::new(8.0, 13.0));
    }
}
