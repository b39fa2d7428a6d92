use math::float::{barycentric_coords, barycentric_lerp, is_degenerate_uv, signed_area};
use math::hcm::{vec2, Mat3, Point3, Vec2, Vec3};
use mesh::Triangle;

use crate::sampler::Barycentric;

/// A triangle whose texture coordinates enclose no area has no tangent direction.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
#[error("triangle is degenerate in uv space (signed area = {area})")]
pub struct DegenerateTriangle {
    pub area: f32,
}

/// World-space attributes of a sample point on a low-poly triangle.
#[derive(Debug, Clone, Copy)]
pub struct SurfaceSample {
    pub position: Point3,
    /// Interpolated vertex normal, normalized.
    pub normal: Vec3,
    pub uv: Vec2,
}

/// Orthonormal basis aligned with the uv parameterization at a surface point.
#[derive(Debug, Clone, Copy)]
pub struct TangentFrame {
    pub tangent: Vec3,
    pub bitangent: Vec3,
    pub normal: Vec3,
}

impl TangentFrame {
    /// The basis as a matrix with columns (tangent, bitangent, normal).
    pub fn basis(&self) -> Mat3 {
        Mat3::from_cols(self.tangent, self.bitangent, self.normal)
    }

    /// Expresses a world-space direction in this frame. The basis is orthonormal, so its transpose
    /// is its inverse.
    pub fn to_local(&self, world: Vec3) -> Vec3 {
        self.basis().transpose() * world
    }
}

/// Builds tangent frames at sample points of one low-poly triangle.
///
/// The tangent follows the direction of increasing `u` on the surface: the sample's uv is shifted
/// by `(uv_epsilon, 0)`, the shifted point's barycentric coordinates are solved in uv space, and
/// the world point they map to gives the tangent direction `p' - p`.
pub struct TangentFrameBuilder {
    triangle: Triangle,
    uv_epsilon: f32,
}

impl TangentFrameBuilder {
    /// Fails if the triangle is too thin in uv space (see `math::float::is_degenerate_uv`).
    pub fn new(triangle: Triangle, uv_epsilon: f32) -> Result<Self, DegenerateTriangle> {
        let (uv0, uv1, uv2) = triangle.uvs;
        if is_degenerate_uv(uv0, uv1, uv2) {
            return Err(DegenerateTriangle {
                area: signed_area(uv0, uv1, uv2),
            });
        }
        Ok(Self {
            triangle,
            uv_epsilon,
        })
    }

    /// Interpolates position, normal and uv at `bc`. Returns `None` if the vertex normals cancel
    /// out at that point.
    pub fn surface_at(&self, bc: Barycentric) -> Option<SurfaceSample> {
        let weights = bc.as_tuple();
        let normal = barycentric_lerp(self.triangle.normals, weights).try_hat()?;
        Some(SurfaceSample {
            position: barycentric_lerp(self.triangle.positions, weights),
            normal,
            uv: barycentric_lerp(self.triangle.uvs, weights),
        })
    }

    /// Builds the frame at `sample`. Returns `None` if the surface direction of increasing `u` is
    /// parallel to the sample normal.
    pub fn frame_at(&self, sample: &SurfaceSample) -> Option<TangentFrame> {
        let shifted_uv = sample.uv + vec2(self.uv_epsilon, 0.0);
        let shifted_bc = barycentric_coords(shifted_uv, self.triangle.uvs)?;
        let shifted_position = barycentric_lerp(self.triangle.positions, shifted_bc);
        let bitangent = sample
            .normal
            .cross(shifted_position - sample.position)
            .try_hat()?;
        let tangent = bitangent.cross(sample.normal);
        Some(TangentFrame {
            tangent,
            bitangent,
            normal: sample.normal,
        })
    }
}
