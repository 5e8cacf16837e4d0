use macroquad::math::Vec3;

use crate::PlaneCollider;

/// Floats per vertex in an interleaved mesh buffer: position (3), texture
/// coordinate (2) and normal (3).
pub const VERTEX_STRIDE: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub a: Vec3,
    pub b: Vec3,
    pub c: Vec3,
}

impl Triangle {
    pub fn new(a: Vec3, b: Vec3, c: Vec3) -> Self {
        Self { a, b, c }
    }

    /// Loads triangle `index` from an index buffer and an interleaved vertex
    /// buffer. Returns `None` if any referenced element lies outside the buffers.
    pub fn from_buffers(index: usize, indices: &[u32], vertices: &[f32]) -> Option<Self> {
        let corner = |k: usize| -> Option<Vec3> {
            let vertex = *indices.get(index * 3 + k)? as usize;
            let base = vertex * VERTEX_STRIDE;
            let position = vertices.get(base..base + 3)?;
            Some(Vec3::new(position[0], position[1], position[2]))
        };
        Some(Self::new(corner(0)?, corner(1)?, corner(2)?))
    }

    pub fn area(&self) -> f32 {
        0.5 * (self.b - self.a).cross(self.c - self.a).length()
    }

    /// Unit normal following the winding `a -> b -> c`. Zero for degenerate
    /// triangles.
    pub fn normal(&self) -> Vec3 {
        (self.b - self.a).cross(self.c - self.a).normalize_or_zero()
    }

    pub fn plane(&self) -> PlaneCollider {
        let normal = self.normal();
        PlaneCollider::new(normal, -normal.dot(self.a))
    }
}

/// Triangle soup, usually built from a render mesh's buffers.
#[derive(Debug, Clone, Default)]
pub struct TriangleMesh {
    pub triangles: Vec<Triangle>,
}

impl TriangleMesh {
    pub fn new(triangles: Vec<Triangle>) -> Self {
        Self { triangles }
    }

    /// Loads every complete triangle of the index buffer. Triangles that
    /// reference missing vertices are skipped.
    pub fn from_buffers(indices: &[u32], vertices: &[f32]) -> Self {
        let triangles = (0..indices.len() / 3)
            .filter_map(|i| Triangle::from_buffers(i, indices, vertices))
            .collect();
        Self { triangles }
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }
}

/// Borrowed view of a mesh used as a collider. Remembers which triangle was
/// hit last so normal and depth queries can refer back to it.
#[derive(Debug, Clone)]
pub struct TriangleMeshCollider<'a> {
    pub mesh: &'a TriangleMesh,
    pub last_collision: Option<usize>,
}

impl<'a> TriangleMeshCollider<'a> {
    pub fn new(mesh: &'a TriangleMesh) -> Self {
        Self {
            mesh,
            last_collision: None,
        }
    }

    pub fn last_triangle(&self) -> Option<&'a Triangle> {
        self.last_collision.and_then(|i| self.mesh.triangles.get(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad_buffers() -> (Vec<u32>, Vec<f32>) {
        #[rustfmt::skip]
        let vertices = vec![
            0.0, 0.0, 0.0,  0.0, 0.0,  0.0, 1.0, 0.0,
            1.0, 0.0, 0.0,  1.0, 0.0,  0.0, 1.0, 0.0,
            1.0, 0.0, 1.0,  1.0, 1.0,  0.0, 1.0, 0.0,
            0.0, 0.0, 1.0,  0.0, 1.0,  0.0, 1.0, 0.0,
        ];
        (vec![0, 2, 1, 0, 3, 2], vertices)
    }

    #[test]
    fn test_load_from_buffers_skips_texture_and_normal() {
        let (indices, vertices) = quad_buffers();
        let t = Triangle::from_buffers(0, &indices, &vertices).expect("triangle 0 exists");
        assert_eq!(t.a, Vec3::ZERO);
        assert_eq!(t.b, Vec3::new(1.0, 0.0, 1.0));
        assert_eq!(t.c, Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_out_of_range_triangle_is_none() {
        let (indices, vertices) = quad_buffers();
        assert!(Triangle::from_buffers(2, &indices, &vertices).is_none());
        assert!(Triangle::from_buffers(0, &[0, 1, 9], &vertices).is_none());
    }

    #[test]
    fn test_mesh_from_buffers() {
        let (indices, vertices) = quad_buffers();
        let mesh = TriangleMesh::from_buffers(&indices, &vertices);
        assert_eq!(mesh.len(), 2);
        let total: f32 = mesh.triangles.iter().map(Triangle::area).sum();
        assert!((total - 1.0).abs() < 1e-6, "unit quad has area 1, got {total}");
    }

    #[test]
    fn test_normal_and_plane() {
        let t = Triangle::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0), Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(t.normal(), Vec3::Y);
        let lifted = Triangle::new(t.a + Vec3::Y, t.b + Vec3::Y, t.c + Vec3::Y);
        let plane = lifted.plane();
        assert_eq!(plane.d, -1.0);
        assert!(plane.distance(Vec3::new(5.0, 1.0, -3.0)).abs() < 1e-6);
    }

    #[test]
    fn test_degenerate_triangle_has_zero_normal() {
        let t = Triangle::new(Vec3::ZERO, Vec3::X, Vec3::X * 2.0);
        assert_eq!(t.normal(), Vec3::ZERO);
        assert_eq!(t.area(), 0.0);
    }
}
