use geometry::ray::Ray;
use math::hcm::Point3;

/// Ray parameter and barycentric coordinates of a ray-triangle hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangleHit {
    pub t: f32,
    pub u: f32,
    pub v: f32,
}

#[rustfmt::skip]
/// Computes a double-sided ray-triangle intersection. The `u`, `v` of the resulting hit (if any)
/// are computed such that `p = p0 + u*(p1-p0) + v*(p2-p0)` where `p` is the point of intersection.
/// Points on an edge count as inside.
pub fn intersect_triangle(p0: Point3, p1: Point3, p2: Point3, r: &Ray) -> Option<TriangleHit> {
    let normal = (p1 - p0).cross(p2 - p0);
    if normal.is_zero() {
        // Degenerate triangle.
        return None;
    }
    // The equation for the plane of the triangle would be:
    // (p - p0).dot(normal) = 0. Plugging in the ray equation $p = o + td$, we have
    // (o + td - p0).dot(normal) = 0  =>  t*dot(d, normal) = dot(p0-o, normal)
    let denom = normal.dot(r.dir);
    if denom == 0.0 {
        return None;
    }
    let t = r.truncated_t(normal.dot(p0 - r.origin) / denom)?;
    let p = r.position_at(t);
    // Each sub-triangle opposite a corner has positive area (w.r.t. `normal`) iff p lies on the
    // inner side of that corner's opposite edge.
    let b0 = (p1 - p).cross(p2 - p).dot(normal);
    let b1 = (p2 - p).cross(p0 - p).dot(normal);
    let b2 = (p0 - p).cross(p1 - p).dot(normal);
    if !(b0 >= 0.0 && b1 >= 0.0 && b2 >= 0.0) {
        return None;
    }
    let total_area = b0 + b1 + b2;
    if !(total_area > 0.0) {
        return None;
    }
    Some(TriangleHit { t, u: b1 / total_area, v: b2 / total_area })
}

#[cfg(test)]
mod test {
    use super::*;
    use math::hcm::{point3, vec3};

    fn unit_triangle() -> (Point3, Point3, Point3) {
        (point3(0.0, 0.0, 0.0), point3(1.0, 0.0, 0.0), point3(0.0, 1.0, 0.0))
    }

    #[test]
    fn hit_from_both_sides() {
        let (p0, p1, p2) = unit_triangle();
        let above = Ray::new(point3(0.25, 0.5, 2.0), vec3(0.0, 0.0, -1.0)).with_extent(0.0, 10.0);
        let hit = intersect_triangle(p0, p1, p2, &above).unwrap();
        assert!((hit.t - 2.0).abs() < 1e-6);
        assert!((hit.u - 0.25).abs() < 1e-6 && (hit.v - 0.5).abs() < 1e-6);

        let below = Ray::new(point3(0.25, 0.5, -1.0), vec3(0.0, 0.0, 1.0)).with_extent(0.0, 10.0);
        let hit = intersect_triangle(p0, p1, p2, &below).unwrap();
        assert!((hit.t - 1.0).abs() < 1e-6);
    }

    #[test]
    fn miss_outside_and_beyond_extent() {
        let (p0, p1, p2) = unit_triangle();
        let outside = Ray::new(point3(0.8, 0.8, 1.0), vec3(0.0, 0.0, -1.0)).with_extent(0.0, 10.0);
        assert!(intersect_triangle(p0, p1, p2, &outside).is_none());
        let short = Ray::new(point3(0.2, 0.2, 1.0), vec3(0.0, 0.0, -1.0)).with_extent(0.0, 0.5);
        assert!(intersect_triangle(p0, p1, p2, &short).is_none());
        let parallel = Ray::new(point3(-1.0, 0.2, 0.0), vec3(1.0, 0.0, 0.0)).with_extent(0.0, 10.0);
        assert!(intersect_triangle(p0, p1, p2, &parallel).is_none());
    }

    #[test]
    fn hit_at_origin_of_ray() {
        let (p0, p1, p2) = unit_triangle();
        let on_surface = Ray::new(point3(0.3, 0.3, 0.0), vec3(0.0, 0.0, 1.0)).with_extent(0.0, 1.0);
        let hit = intersect_triangle(p0, p1, p2, &on_surface).unwrap();
        assert_eq!(hit.t, 0.0);
    }
}
