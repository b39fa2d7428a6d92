use crate::hcm::Vec2;

/// UV-space triangles whose area magnitude is below this fraction of their longest squared edge
/// are considered degenerate. The threshold sits well above f32 rounding residue, so triangles
/// with nearly collinear corners are rejected along with exactly collinear ones.
pub const MIN_UV_AREA_RATIO: f32 = 1e-5;

/// Whether the 2D triangle (p0, p1, p2) is too thin to solve barycentric coordinates against (see
/// `MIN_UV_AREA_RATIO`). Triangles with NaN corners are degenerate.
/// ```
/// use math::{float::is_degenerate_uv, hcm::vec2};
/// assert!(!is_degenerate_uv(vec2(0.0, 0.0), vec2(1e-3, 0.0), vec2(0.0, 1e-3)));
/// assert!(is_degenerate_uv(vec2(0.0, 0.0), vec2(0.5, 0.5), vec2(1.0, 1.0 + 1e-7)));
/// ```
pub fn is_degenerate_uv(p0: Vec2, p1: Vec2, p2: Vec2) -> bool {
    let longest = (p1 - p0)
        .norm_squared()
        .max((p2 - p1).norm_squared())
        .max((p0 - p2).norm_squared());
    !(signed_area(p0, p1, p2).abs() > MIN_UV_AREA_RATIO * longest)
}

/// Computes the barycentric interpolation given 3 attribute values and 3 barycentric coordinates.
/// The attribute can be of various types: `Point3` (difference type `Vec3`), `Vec3` and `Vec2`.
///
/// Only the first two coordinates are read; the third weight is always the exact complement
/// `1 - bc0 - bc1`, even if the caller's `bc2` drifted away from it.
/// ```
/// use math::float::barycentric_lerp;
/// let x = barycentric_lerp((1.0f32, 2.0, 4.0), (0.25, 0.25, 0.5));
/// assert_eq!(x, 0.25 + 0.5 + 2.0);
/// ```
pub fn barycentric_lerp<T, U>(values: (T, T, T), bc_coeffs: (f32, f32, f32)) -> T
where
    T: Copy + std::ops::Sub<T, Output = U>,
    U: Copy
        + std::ops::Mul<f32, Output = U>
        + std::ops::Add<T, Output = T>
        + std::ops::Add<U, Output = U>,
{
    let (a, b, c) = values;
    let (bc0, bc1, _) = bc_coeffs;
    //   bc0 * a + bc1 * b + (1 - bc0 - bc1) * c
    // = bc0 * (a-c) + bc1 * (b-c) + c
    (a - c) * bc0 + (b - c) * bc1 + c
}

/// Signed area of the 2D triangle (p0, p1, p2): positive if the corners wind counter-clockwise.
/// ```
/// use math::{float::signed_area, hcm::vec2};
/// let a = signed_area(vec2(0.0, 0.0), vec2(1.0, 0.0), vec2(0.0, 1.0));
/// assert_eq!(a, 0.5);
/// let b = signed_area(vec2(0.0, 0.0), vec2(0.0, 1.0), vec2(1.0, 0.0));
/// assert_eq!(b, -0.5);
/// ```
pub fn signed_area(p0: Vec2, p1: Vec2, p2: Vec2) -> f32 {
    0.5 * (p1 - p0).perp_dot(p2 - p0)
}

/// Solves the barycentric coordinates of `p` with regard to the 2D triangle `corners` using
/// signed-area ratios. The coordinates are unbounded: points outside the triangle get negative
/// weights. Returns `None` if the triangle is degenerate (see `is_degenerate_uv`).
pub fn barycentric_coords(p: Vec2, corners: (Vec2, Vec2, Vec2)) -> Option<(f32, f32, f32)> {
    let (p0, p1, p2) = corners;
    if is_degenerate_uv(p0, p1, p2) {
        return None;
    }
    let total = signed_area(p0, p1, p2);
    Some((
        signed_area(p, p1, p2) / total,
        signed_area(p0, p, p2) / total,
        signed_area(p0, p1, p) / total,
    ))
}

pub fn min_max(a: f32, b: f32) -> (f32, f32) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}
