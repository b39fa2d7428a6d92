use std::fmt::{Display, Formatter, Result};

use math::hcm;

/// Represents a ray:
///
///   origin + t * direction
///
/// where t lies in the extent `[t_min, t_max)`.
///
/// A bake casts rays from the surface of the low-poly mesh, so the extent starts at 0 (hits on the
/// surface itself count) and ends at a finite search distance.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: hcm::Point3,
    pub dir: hcm::Vec3,
    pub t_min: f32,
    pub t_max: f32,
}

impl Ray {
    pub fn new(origin: hcm::Point3, dir: hcm::Vec3) -> Self {
        Ray {
            origin,
            dir,
            t_min: 0.0,
            t_max: f32::INFINITY,
        }
    }
    pub fn set_extent(&mut self, t_max: f32) {
        self.t_max = t_max;
    }

    pub fn with_extent(self, t_min: f32, t_max: f32) -> Self {
        Ray {
            t_min,
            t_max,
            ..self
        }
    }
    /// Returns `None` if the given `t` is outside the ray's extent [`r.t_min`, `r.t_max`).
    /// `Some(t)` otherwise.
    pub fn truncated_t(&self, t: f32) -> Option<f32> {
        if t < self.t_min || t >= self.t_max || t.is_nan() {
            None
        } else {
            Some(t)
        }
    }

    pub fn position_at(&self, t: f32) -> hcm::Point3 {
        self.origin + t * self.dir
    }
}

impl Display for Ray {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let precision = f.precision().unwrap_or(2);
        write!(
            f,
            "{:.precision$} + t{:.precision$}, t in [{}, {})",
            self.origin,
            self.dir,
            self.t_min,
            self.t_max,
            precision = precision
        )
    }
}

#[cfg(test)]
mod test {
    use super::Ray;
    use math::hcm::{point3, vec3};

    #[test]
    fn extent_is_half_open() {
        let r = Ray::new(point3(0.0, 0.0, 0.0), vec3(0.0, 0.0, 1.0)).with_extent(0.0, 2.0);
        assert_eq!(r.truncated_t(0.0), Some(0.0));
        assert_eq!(r.truncated_t(1.5), Some(1.5));
        assert_eq!(r.truncated_t(2.0), None);
        assert_eq!(r.truncated_t(-1e-3), None);
        assert_eq!(r.truncated_t(f32::NAN), None);
    }
}
