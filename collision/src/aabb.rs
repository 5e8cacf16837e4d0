use macroquad::math::{Mat4, Vec3, Vec4};

/// Result of a ray/box test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Signed distance along the ray to the entry slab. Negative when the ray
    /// starts inside the box.
    pub distance: f32,
    /// Outward normal of the face closest to the contact point.
    pub normal: Vec3,
}

/// Axis-aligned box owned by a scene object.
///
/// The corners are homogeneous points (`w = 1`). `transform` keeps the last
/// matrix passed to [`BoxCollider::trans`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxCollider {
    pub min: Vec4,
    pub max: Vec4,
    pub transform: Mat4,
}

impl BoxCollider {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self {
            min: min.min(max).extend(1.0),
            max: min.max(max).extend(1.0),
            transform: Mat4::IDENTITY,
        }
    }

    /// Moves both corners by `m` and re-sorts them per axis.
    ///
    /// The result is the AABB of the two transformed corners, so a rotated box
    /// is only approximated. Calls compose: the matrix is applied to the
    /// current bounds, not to the bounds the box was created with.
    pub fn trans(&mut self, m: Mat4) {
        let a = m * self.min;
        let b = m * self.max;
        self.min = a.truncate().min(b.truncate()).extend(1.0);
        self.max = a.truncate().max(b.truncate()).extend(1.0);
        self.transform = m;
    }

    pub fn center(&self) -> Vec3 {
        (self.min.truncate() + self.max.truncate()) * 0.5
    }

    pub fn half_extents(&self) -> Vec3 {
        (self.max.truncate() - self.min.truncate()) * 0.5
    }

    /// Inclusive containment test.
    pub fn is_inside(&self, point: Vec3) -> bool {
        point.x <= self.max.x
            && point.x >= self.min.x
            && point.y <= self.max.y
            && point.y >= self.min.y
            && point.z <= self.max.z
            && point.z >= self.min.z
    }

    /// Outward normal of the face nearest to `point`. Ties go to the earlier
    /// axis (x, then y, then z).
    pub fn normal_at(&self, point: Vec3) -> Vec3 {
        let half = self.half_extents();
        let local = point - self.center();

        let mut normal = Vec3::ZERO;
        let mut nearest = f32::MAX;
        for axis in 0..3 {
            let distance = (half[axis] - local[axis].abs()).abs();
            if distance < nearest {
                nearest = distance;
                normal = Vec3::ZERO;
                normal[axis] = local[axis].signum();
            }
        }
        normal
    }

    /// Slab test. Returns the entry distance and face normal when the ray
    /// (or the line behind its origin, for origins inside the box) touches
    /// the box.
    pub fn intersects_ray(&self, origin: Vec3, dir: Vec3) -> Option<RayHit> {
        if dir == Vec3::ZERO {
            return self.is_inside(origin).then(|| RayHit {
                distance: 0.0,
                normal: self.normal_at(origin),
            });
        }

        let mut tmin = f32::NEG_INFINITY;
        let mut tmax = f32::INFINITY;
        for axis in 0..3 {
            if dir[axis] != 0.0 {
                let t1 = (self.min[axis] - origin[axis]) / dir[axis];
                let t2 = (self.max[axis] - origin[axis]) / dir[axis];
                tmin = tmin.max(t1.min(t2));
                tmax = tmax.min(t1.max(t2));
            } else if origin[axis] < self.min[axis] || origin[axis] > self.max[axis] {
                // Parallel to this slab and outside it.
                return None;
            }
        }

        if tmax >= 0.0 && tmax >= tmin {
            Some(RayHit {
                distance: tmin,
                normal: self.normal_at(origin + dir * tmin),
            })
        } else {
            None
        }
    }
}
