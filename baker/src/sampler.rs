use itertools::Itertools;

/// Barycentric weights of a sample over a triangle. `c` is always the exact complement
/// `1 - a - b`; the weights need not all be positive (see `samples()`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Barycentric {
    pub a: f32,
    pub b: f32,
    pub c: f32,
}

impl Barycentric {
    pub fn new(a: f32, b: f32) -> Self {
        Barycentric { a, b, c: 1.0 - a - b }
    }
    pub fn as_tuple(self) -> (f32, f32, f32) {
        (self.a, self.b, self.c)
    }
}

/// Enumerates the sample points of one triangle in barycentric space.
///
/// `a` and `b` both range over `[-margin, 1 + margin]` with increments of `step`; a pair is kept
/// if `c = 1 - a - b` also lies within `[-margin, 1 + margin]`. The margin lets samples fall
/// slightly outside the triangle so that texels along UV seams still get covered when the step is
/// coarse compared to the texel size.
///
/// A non-positive or non-finite `step` yields nothing, as does a step so small that an axis of
/// the grid would have more than `MAX_GRID_SIZE` values.
/// ```
/// let count = baker::sampler::samples(0.5, 0.0).count();
/// // (0, 0), (0, 0.5), (0, 1), (0.5, 0), (0.5, 0.5), (1, 0)
/// assert_eq!(count, 6);
/// ```
pub fn samples(step: f32, margin: f32) -> impl Iterator<Item = Barycentric> {
    let count = grid_size(step, margin);
    let grid = move |i: usize| -margin + i as f32 * step;
    (0..count)
        .cartesian_product(0..count)
        .map(move |(i, j)| Barycentric::new(grid(i), grid(j)))
        .filter(move |s| s.c >= -margin && s.c <= 1.0 + margin)
}

/// Upper bound on the number of grid values along each barycentric axis.
pub const MAX_GRID_SIZE: usize = 100_000;

/// Number of grid values `-margin + i * step` not exceeding `1 + margin`, or 0 if the step is
/// unusable or the count would exceed `MAX_GRID_SIZE`.
pub(crate) fn grid_size(step: f32, margin: f32) -> usize {
    if !(step > 0.0 && step.is_finite() && margin.is_finite()) {
        return 0;
    }
    let extent = 1.0 + 2.0 * margin;
    if extent < 0.0 {
        return 0;
    }
    // Tolerates rounding in the division, e.g. 1.02 / 0.01 = 101.99999.
    let intervals = (extent / step + 1e-4).floor();
    if !(intervals < MAX_GRID_SIZE as f32) {
        return 0;
    }
    intervals as usize + 1
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn grid_includes_both_ends() {
        assert_eq!(grid_size(0.01, 0.01), 103);
        assert_eq!(grid_size(0.25, 0.0), 5);
        assert_eq!(grid_size(0.3, 0.0), 4);
        assert_eq!(grid_size(0.0, 0.0), 0);
        assert_eq!(grid_size(f32::NAN, 0.0), 0);
    }

    #[test]
    fn oversized_grid_is_empty() {
        assert_eq!(grid_size(1e-30, 0.01), 0);
        assert_eq!(grid_size(1e-7, 0.0), 0);
        assert_eq!(samples(1e-30, 0.01).take(3).count(), 0);
        assert_eq!(grid_size(1e-3, 0.0), 1001);
    }

    #[test]
    fn corners_are_sampled() {
        let all = samples(0.25, 0.0).collect::<Vec<_>>();
        assert!(all.contains(&Barycentric::new(0.0, 0.0)));
        assert!(all.contains(&Barycentric::new(1.0, 0.0)));
        assert!(all.contains(&Barycentric::new(0.0, 1.0)));
        // 5 + 4 + 3 + 2 + 1
        assert_eq!(all.len(), 15);
    }
}
