use std::fmt::{Display, Formatter, Result};

use crate::ray::Ray;
use math::{
    float::min_max,
    hcm::{Point3, Vec3},
};

/// 3D bounding-box type. Boundary check is closed (`[min, max]`) on all axes.
/// - Build one from 2 `Point3`s;
/// - Expand it by `b.union()` or `union(b1, b2)`;
/// - Check if it `intersect()`s with a `Ray`.
#[derive(Debug, Clone, Copy)]
pub struct BBox {
    min: Point3,
    max: Point3,
}

impl BBox {
    pub fn empty() -> BBox {
        BBox {
            min: Point3::new(f32::INFINITY, f32::INFINITY, f32::INFINITY),
            max: Point3::new(-f32::INFINITY, -f32::INFINITY, -f32::INFINITY),
        }
    }
    pub fn new(p0: Point3, p1: Point3) -> BBox {
        let (xmin, xmax) = min_max(p0.x, p1.x);
        let (ymin, ymax) = min_max(p0.y, p1.y);
        let (zmin, zmax) = min_max(p0.z, p1.z);
        BBox {
            min: Point3::new(xmin, ymin, zmin),
            max: Point3::new(xmax, ymax, zmax),
        }
    }

    pub fn union(self, p: Point3) -> BBox {
        let mut result = self;
        for i in 0..3 {
            result.min[i] = self.min[i].min(p[i]);
            result.max[i] = self.max[i].max(p[i]);
        }
        result
    }

    pub fn midpoint(self) -> Point3 {
        (self.max - self.min) * 0.5 + self.min
    }

    pub fn diag(&self) -> Vec3 {
        self.max - self.min
    }

    /// Computes the surface area of the bounding box.
    pub fn area(&self) -> f32 {
        let Vec3 { x, y, z } = self.diag();
        if x.is_sign_positive() && y.is_sign_positive() && z.is_sign_positive() {
            (x * y + y * z + z * x) * 2.0
        } else {
            0.0
        }
    }

    /// Slab test against the ray's `[t_min, t_max]` extent. Flat boxes (a triangle lying in an
    /// axis-aligned plane) still register hits.
    pub fn intersect(&self, r: &Ray) -> bool {
        let (mut t_min, mut t_max) = (r.t_min, r.t_max);
        for axis in 0..3 {
            let inv_dir = 1.0 / r.dir[axis];
            let t0 = (self.min[axis] - r.origin[axis]) * inv_dir;
            let t1 = (self.max[axis] - r.origin[axis]) * inv_dir;
            if t0.is_nan() || t1.is_nan() {
                // Ray runs inside the slab's boundary plane (0 * inf). Keep it when the origin is
                // within the slab.
                if r.origin[axis] < self.min[axis] || r.origin[axis] > self.max[axis] {
                    return false;
                }
                continue;
            }
            let (t0, t1) = min_max(t0, t1);
            // Shrinks [t_min, t_max] by intersecting it with [t0, t1].
            t_min = t_min.max(t0);
            t_max = t_max.min(t1);
            if t_max < t_min {
                return false;
            }
        }
        true
    }

}

impl Display for BBox {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "box[{} -> {}]", self.min, self.max)
    }
}

pub fn union(b0: BBox, b1: BBox) -> BBox {
    b0.union(b1.min).union(b1.max)
}

#[cfg(test)]
mod test {
    use super::*;
    use math::hcm::{point3, vec3};

    #[test]
    fn flat_box_is_hit() {
        // A box with zero extent along z, as for a triangle in the plane z = 0.
        let b = BBox::new(point3(0.0, 0.0, 0.0), point3(1.0, 1.0, 0.0));
        let down = Ray::new(point3(0.5, 0.5, 1.0), vec3(0.0, 0.0, -1.0)).with_extent(0.0, 10.0);
        assert!(b.intersect(&down));
        let beside = Ray::new(point3(1.5, 0.5, 1.0), vec3(0.0, 0.0, -1.0)).with_extent(0.0, 10.0);
        assert!(!b.intersect(&beside));
        let short = down.with_extent(0.0, 0.5);
        assert!(!b.intersect(&short));
    }

    #[test]
    fn ray_parallel_to_slab() {
        let b = BBox::new(point3(0.0, 0.0, 0.0), point3(1.0, 1.0, 1.0));
        let inside = Ray::new(point3(-1.0, 0.5, 0.5), vec3(1.0, 0.0, 0.0));
        assert!(b.intersect(&inside));
        let outside = Ray::new(point3(-1.0, 1.5, 0.5), vec3(1.0, 0.0, 0.0));
        assert!(!b.intersect(&outside));
    }

    #[test]
    fn union_spans_both() {
        let b0 = BBox::new(point3(0.0, 0.0, 0.0), point3(1.0, 1.0, 1.0));
        let b1 = BBox::new(point3(-1.0, 0.5, 2.0), point3(0.5, 3.0, 2.5));
        let u = union(b0, b1);
        assert_eq!(u.diag(), vec3(2.0, 3.0, 2.5));
        assert_eq!(u.midpoint(), point3(0.0, 1.5, 1.25));
        assert_eq!(union(BBox::empty(), b0).area(), b0.area());
    }
}
