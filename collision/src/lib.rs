//! Closed-form collision primitives: boxes, planes, spheres and triangles.
//!
//! Everything here is a read-mostly value type. Queries are total: degenerate
//! input yields "no collision" rather than an error.

mod aabb;
mod plane;
mod sphere;
mod triangle;

pub use aabb::{BoxCollider, RayHit};
pub use plane::PlaneCollider;
pub use sphere::SphereCollider;
pub use triangle::{Triangle, TriangleMesh, TriangleMeshCollider, VERTEX_STRIDE};

/// Tolerance used when comparing lengths against zero.
pub const EPSILON: f32 = 1e-6;
