//! A straight segment between two points, with the point-on-segment test
//! the rectangle clipping and closing logic relies on.

use crate::vector2::Vector2;
use crate::EPSILON;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineSegment {
    pub a: Vector2,
    pub b: Vector2,
}

impl LineSegment {
    pub fn new(a: Vector2, b: Vector2) -> Self {
        LineSegment { a, b }
    }

    pub fn length(&self) -> f64 {
        self.a.distance_to(&self.b)
    }

    /// True if `point` lies on the (infinite-precision) segment from `a`
    /// to `b`, within the crate's epsilon tolerance.
    pub fn contains_point(&self, point: Vector2) -> bool {
        if (self.b.x - self.a.x).abs() < EPSILON {
            return (point.x - self.a.x).abs() < EPSILON
                && point.y >= self.a.y.min(self.b.y)
                && point.y <= self.a.y.max(self.b.y);
        }

        let k = (self.b.y - self.a.y) / (self.b.x - self.a.x);
        let c = self.a.y - k * self.a.x;
        (point.y - (point.x * k + c)).abs() < EPSILON
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn horizontal_segment_contains_midpoint() {
        let seg = LineSegment::new(Vector2::new(0.0, 5.0), Vector2::new(10.0, 5.0));
        assert!(seg.contains_point(Vector2::new(5.0, 5.0)));
        assert!(!seg.contains_point(Vector2::new(5.0, 5.1)));
    }

    #[test]
    fn vertical_segment_contains_point_in_range() {
        let seg = LineSegment::new(Vector2::new(3.0, 0.0), Vector2::new(3.0, 10.0));
        assert!(seg.contains_point(Vector2::new(3.0, 7.0)));
        assert!(!seg.contains_point(Vector2::new(3.0, 11.0)));
    }
}
