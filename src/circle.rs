//! The circumscribed circle of three sites, used to detect circle events.

use crate::vector2::Vector2;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Circle {
    pub center: Vector2,
    pub radius: f64,
}

impl Circle {
    /// Builds the circle passing through three points. Returns `None` if
    /// the points are collinear (the determinant `a` vanishes), in which
    /// case no circumscribed circle exists.
    pub fn from_three_points(p1: Vector2, p2: Vector2, p3: Vector2) -> Option<Circle> {
        let (x1, y1) = (p1.x, p1.y);
        let (x2, y2) = (p2.x, p2.y);
        let (x3, y3) = (p3.x, p3.y);

        let a = x1 * (y2 - y3) - y1 * (x2 - x3) + x2 * y3 - x3 * y2;
        if a == 0.0 {
            return None;
        }

        let b = (x1 * x1 + y1 * y1) * (y3 - y2)
            + (x2 * x2 + y2 * y2) * (y1 - y3)
            + (x3 * x3 + y3 * y3) * (y2 - y1);
        let c = (x1 * x1 + y1 * y1) * (x2 - x3)
            + (x2 * x2 + y2 * y2) * (x3 - x1)
            + (x3 * x3 + y3 * y3) * (x1 - x2);

        let center = Vector2::new(-b / (2.0 * a), -c / (2.0 * a));
        let radius = center.distance_to(&p1);

        Some(Circle { center, radius })
    }

    /// The lowest point on the circle (`y` grows downward, so this is
    /// `center.y + radius`); this is the `y` at which the sweep line
    /// touches the circle and the corresponding circle event fires.
    pub fn bottom_point(&self) -> Vector2 {
        Vector2::new(self.center.x, self.center.y + self.radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collinear_points_have_no_circle() {
        let p1 = Vector2::new(0.0, 0.0);
        let p2 = Vector2::new(1.0, 0.0);
        let p3 = Vector2::new(2.0, 0.0);
        assert!(Circle::from_three_points(p1, p2, p3).is_none());
    }

    #[test]
    fn right_triangle_circumcenter() {
        let p1 = Vector2::new(0.0, 0.0);
        let p2 = Vector2::new(2.0, 0.0);
        let p3 = Vector2::new(0.0, 2.0);
        let circle = Circle::from_three_points(p1, p2, p3).unwrap();
        assert!((circle.center.x - 1.0).abs() < 1e-9);
        assert!((circle.center.y - 1.0).abs() < 1e-9);
        assert!((circle.radius - 2f64.sqrt()).abs() < 1e-9);
    }
}
