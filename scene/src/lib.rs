mod bvh;
mod triangle;

use math::hcm::{Point3, Vec3};

pub use bvh::TriangleScene;
pub use triangle::{intersect_triangle, TriangleHit};

/// Closest intersection of a ray with a scene built over a mesh.
/// - `primitive_id`: index of the hit triangle in the source mesh.
/// - `u`, `v`: barycentric coordinates of the hit, such that `p = p0 + u*(p1-p0) + v*(p2-p0)`.
/// - `t`: ray parameter of the hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub primitive_id: usize,
    pub u: f32,
    pub v: f32,
    pub t: f32,
}

/// Answers closest-hit ray queries against a prebuilt, read-only scene. Implementations must be
/// shareable across threads: a bake may cast rays from several workers at once.
pub trait IntersectionService: Send + Sync {
    fn summary(&self) -> String;
    /// Casts a ray `origin + t * direction` with `t` in `[t_min, t_max)`. Returns `None` on a miss.
    fn cast_ray(&self, origin: Point3, direction: Vec3, t_min: f32, t_max: f32) -> Option<RayHit>;
}
