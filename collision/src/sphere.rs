use macroquad::math::{Mat3, Vec3};

use crate::{EPSILON, PlaneCollider, Triangle, TriangleMeshCollider};

/// A sphere given by its center and radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereCollider {
    pub center: Vec3,
    pub radius: f32,
}

impl SphereCollider {
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    // Sphere

    pub fn intersects_sphere(&self, other: &SphereCollider) -> bool {
        (other.center - self.center).length() < other.radius + self.radius
    }

    /// Unit vector pointing from this sphere towards `other`.
    pub fn sphere_normal(&self, other: &SphereCollider) -> Vec3 {
        (other.center - self.center).normalize_or_zero()
    }

    pub fn sphere_penetration(&self, other: &SphereCollider) -> f32 {
        other.radius + self.radius - (other.center - self.center).length()
    }

    // Plane

    /// Signed distance from the plane to the sphere's center.
    pub fn plane_distance(&self, plane: &PlaneCollider) -> f32 {
        plane.distance(self.center)
    }

    pub fn intersects_plane(&self, plane: &PlaneCollider) -> bool {
        self.plane_distance(plane).abs() <= self.radius
    }

    pub fn is_inside_plane(&self, plane: &PlaneCollider) -> bool {
        self.plane_distance(plane) < self.radius
    }

    pub fn is_outside_plane(&self, plane: &PlaneCollider) -> bool {
        self.plane_distance(plane) > self.radius
    }

    pub fn plane_normal(&self, plane: &PlaneCollider) -> Vec3 {
        plane.normal
    }

    /// Negative while the sphere reaches through the plane.
    pub fn plane_penetration(&self, plane: &PlaneCollider) -> f32 {
        plane.distance(self.center) - self.radius
    }

    // Triangle

    /// Separating axis test against the triangle's face, its three vertex
    /// regions and its three edge regions.
    pub fn intersects_triangle(&self, triangle: &Triangle) -> bool {
        let a = triangle.a - self.center;
        let b = triangle.b - self.center;
        let c = triangle.c - self.center;
        let rr = self.radius * self.radius;

        let v = (b - a).cross(c - a);
        let d = a.dot(v);
        let e = v.dot(v);
        let sep_plane = d * d > rr * e;

        let aa = a.dot(a);
        let ab = a.dot(b);
        let ac = a.dot(c);
        let bb = b.dot(b);
        let bc = b.dot(c);
        let cc = c.dot(c);
        let sep_a = (aa > rr) & (ab > aa) & (ac > aa);
        let sep_b = (bb > rr) & (ab > bb) & (bc > bb);
        let sep_c = (cc > rr) & (ac > cc) & (bc > cc);

        let ab_edge = b - a;
        let bc_edge = c - b;
        let ca_edge = a - c;
        let d1 = ab - aa;
        let d2 = bc - bb;
        let d3 = ac - cc;
        let e1 = ab_edge.dot(ab_edge);
        let e2 = bc_edge.dot(bc_edge);
        let e3 = ca_edge.dot(ca_edge);
        let q1 = a * e1 - ab_edge * d1;
        let q2 = b * e2 - bc_edge * d2;
        let q3 = c * e3 - ca_edge * d3;
        let qc = c * e1 - q1;
        let qa = a * e2 - q2;
        let qb = b * e3 - q3;
        let sep_ab = (q1.dot(q1) > rr * e1 * e1) & (q1.dot(qc) > 0.0);
        let sep_bc = (q2.dot(q2) > rr * e2 * e2) & (q2.dot(qa) > 0.0);
        let sep_ca = (q3.dot(q3) > rr * e3 * e3) & (q3.dot(qb) > 0.0);

        !(sep_plane | sep_a | sep_b | sep_c | sep_ab | sep_bc | sep_ca)
    }

    pub fn triangle_normal(&self, triangle: &Triangle) -> Vec3 {
        triangle.normal()
    }

    /// Depth measured against the triangle's plane. Contacts on a lone edge
    /// or vertex are not treated specially.
    pub fn triangle_penetration(&self, triangle: &Triangle) -> f32 {
        self.radius - triangle.plane().distance(self.center).abs()
    }

    // Triangle mesh

    /// Tests every triangle and records the first one hit in
    /// `mesh.last_collision`.
    pub fn intersects_mesh(&self, mesh: &mut TriangleMeshCollider<'_>) -> bool {
        mesh.last_collision = mesh
            .mesh
            .triangles
            .iter()
            .position(|t| self.intersects_triangle(t));
        mesh.last_collision.is_some()
    }

    /// Normal of the last triangle hit, or zero if nothing was hit yet.
    pub fn mesh_normal(&self, mesh: &TriangleMeshCollider<'_>) -> Vec3 {
        mesh.last_triangle()
            .map(|t| self.triangle_normal(t))
            .unwrap_or(Vec3::ZERO)
    }

    pub fn mesh_penetration(&self, mesh: &TriangleMeshCollider<'_>) -> f32 {
        mesh.last_triangle()
            .map(|t| self.triangle_penetration(t))
            .unwrap_or(0.0)
    }

    /// Point on the sphere closest to the mesh.
    pub fn mesh_collision_point(&self, mesh: &TriangleMeshCollider<'_>) -> Vec3 {
        self.center - self.mesh_normal(mesh) * self.radius
    }

    /// Orthonormal basis whose first column is the collision normal.
    pub fn collision_basis(&self, normal: Vec3) -> Mat3 {
        let x = normal.normalize_or_zero();
        // The normal is often the world up axis, so start from z.
        let mut y = x.cross(Vec3::Z);
        if y.length_squared() < EPSILON {
            y = x.cross(Vec3::Y);
        }
        let y = y.normalize_or_zero();
        let z = x.cross(y).normalize_or_zero();
        Mat3::from_cols(x, y, z)
    }

    // Ray

    /// Distance to the nearest non-negative intersection of the ray with the
    /// sphere. `dir` must be unit length.
    pub fn intersects_ray(&self, origin: Vec3, dir: Vec3) -> Option<f32> {
        let l = self.center - origin;
        let tca = l.dot(dir);
        let d2 = l.dot(l) - tca * tca;
        let rr = self.radius * self.radius;
        if d2 > rr {
            return None;
        }
        let thc = (rr - d2).sqrt();
        let (t0, t1) = (tca - thc, tca + thc);
        if t0 >= 0.0 {
            Some(t0)
        } else if t1 >= 0.0 {
            Some(t1)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TriangleMesh;

    fn floor_triangle() -> Triangle {
        Triangle::new(
            Vec3::new(-1.0, 0.0, -1.0),
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(1.0, 0.0, -1.0),
        )
    }

    #[test]
    fn test_sphere_sphere() {
        let s = SphereCollider::new(Vec3::ZERO, 1.0);
        let other = SphereCollider::new(Vec3::new(1.5, 0.0, 0.0), 1.0);
        assert!(s.intersects_sphere(&other));
        assert!((s.sphere_penetration(&other) - 0.5).abs() < 1e-6);
        assert_eq!(s.sphere_normal(&other), Vec3::X);

        let far = SphereCollider::new(Vec3::new(2.0, 0.0, 0.0), 1.0);
        assert!(!s.intersects_sphere(&far), "touching spheres do not intersect");
    }

    #[test]
    fn test_sphere_plane() {
        let plane = PlaneCollider::new(Vec3::Y, 0.0);
        let resting = SphereCollider::new(Vec3::new(0.0, 0.5, 0.0), 1.0);
        assert!(resting.intersects_plane(&plane));
        assert!(resting.is_inside_plane(&plane));
        assert!((resting.plane_penetration(&plane) + 0.5).abs() < 1e-6);
        assert_eq!(resting.plane_normal(&plane), Vec3::Y);

        let above = SphereCollider::new(Vec3::new(0.0, 3.0, 0.0), 1.0);
        assert!(!above.intersects_plane(&plane));
        assert!(above.is_outside_plane(&plane));

        let below = SphereCollider::new(Vec3::new(0.0, -3.0, 0.0), 1.0);
        assert!(!below.intersects_plane(&plane));
        assert!(below.is_inside_plane(&plane));
    }

    #[test]
    fn test_sphere_triangle_face_contact() {
        let t = floor_triangle();
        let s = SphereCollider::new(Vec3::new(0.0, 0.4, 0.0), 0.5);
        assert!(s.intersects_triangle(&t));
        assert!((s.triangle_penetration(&t) - 0.1).abs() < 1e-5);
        assert!(!SphereCollider::new(Vec3::new(0.0, 0.6, 0.0), 0.5).intersects_triangle(&t));
    }

    #[test]
    fn test_sphere_triangle_separated_by_vertex_and_edge() {
        let t = floor_triangle();
        // In the plane but beyond vertex b.
        let past_vertex = SphereCollider::new(Vec3::new(0.0, 0.0, 1.8), 0.5);
        assert!(!past_vertex.intersects_triangle(&t));
        // In the plane but beyond edge c -> a.
        let past_edge = SphereCollider::new(Vec3::new(0.0, 0.0, -1.8), 0.5);
        assert!(!past_edge.intersects_triangle(&t));
        // Overlapping the edge.
        let on_edge = SphereCollider::new(Vec3::new(0.0, 0.0, -1.3), 0.5);
        assert!(on_edge.intersects_triangle(&t));
    }

    #[test]
    fn test_sphere_mesh_records_hit() {
        let mesh = TriangleMesh::new(vec![
            Triangle::new(
                Vec3::new(10.0, 0.0, 0.0),
                Vec3::new(11.0, 0.0, 0.0),
                Vec3::new(10.0, 0.0, 1.0),
            ),
            floor_triangle(),
        ]);
        let mut collider = TriangleMeshCollider::new(&mesh);
        let s = SphereCollider::new(Vec3::new(0.0, 0.25, 0.0), 0.5);
        assert!(s.intersects_mesh(&mut collider));
        assert_eq!(collider.last_collision, Some(1));
        assert_eq!(s.mesh_normal(&collider), Vec3::Y);
        assert!((s.mesh_penetration(&collider) - 0.25).abs() < 1e-5);
        let point = s.mesh_collision_point(&collider);
        assert!((point - Vec3::new(0.0, -0.25, 0.0)).length() < 1e-5);

        let away = SphereCollider::new(Vec3::new(0.0, 5.0, 0.0), 0.5);
        assert!(!away.intersects_mesh(&mut collider));
        assert_eq!(collider.last_collision, None);
        assert_eq!(away.mesh_normal(&collider), Vec3::ZERO);
    }

    #[test]
    fn test_collision_basis_is_orthonormal() {
        let s = SphereCollider::new(Vec3::ZERO, 1.0);
        for normal in [Vec3::Y, Vec3::Z, Vec3::new(1.0, 2.0, -0.5)] {
            let basis = s.collision_basis(normal);
            let (x, y, z) = (basis.x_axis, basis.y_axis, basis.z_axis);
            assert!((x - normal.normalize()).length() < 1e-5, "first column is the normal");
            for v in [x, y, z] {
                assert!((v.length() - 1.0).abs() < 1e-5);
            }
            assert!(x.dot(y).abs() < 1e-5 && x.dot(z).abs() < 1e-5 && y.dot(z).abs() < 1e-5);
        }
    }

    #[test]
    fn test_ray_sphere() {
        let s = SphereCollider::new(Vec3::new(0.0, 0.0, 5.0), 1.0);
        let t = s.intersects_ray(Vec3::ZERO, Vec3::Z).expect("ray hits sphere ahead");
        assert!((t - 4.0).abs() < 1e-5);

        let from_inside = s
            .intersects_ray(Vec3::new(0.0, 0.0, 5.0), Vec3::Z)
            .expect("inside origin hits the far side");
        assert!((from_inside - 1.0).abs() < 1e-5);

        assert!(s.intersects_ray(Vec3::ZERO, Vec3::NEG_Z).is_none(), "sphere behind ray");
        assert!(s.intersects_ray(Vec3::new(0.0, 2.0, 0.0), Vec3::Z).is_none());
    }
}
