use macroquad::math::Vec3;

/// A plane given by its unit normal and the signed offset `d`, so that points
/// on the plane satisfy `normal · X + d = 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneCollider {
    pub normal: Vec3,
    pub d: f32,
}

impl PlaneCollider {
    pub fn new(normal: Vec3, d: f32) -> Self {
        Self { normal, d }
    }

    /// Plane through `point` facing `normal`.
    pub fn from_point_normal(point: Vec3, normal: Vec3) -> Self {
        let normal = normal.normalize_or_zero();
        Self {
            normal,
            d: -normal.dot(point),
        }
    }

    /// Signed distance of `point`, positive on the side the normal points to.
    pub fn distance(&self, point: Vec3) -> f32 {
        self.normal.dot(point) + self.d
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signed_distance() {
        let plane = PlaneCollider::from_point_normal(Vec3::new(0.0, -1.0, 0.0), Vec3::Y);
        assert_eq!(plane.d, 1.0);
        assert!((plane.distance(Vec3::new(3.0, 2.0, -4.0)) - 3.0).abs() < 1e-6);
        assert!((plane.distance(Vec3::new(0.0, -3.0, 0.0)) + 2.0).abs() < 1e-6);
    }
}
