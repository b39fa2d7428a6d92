use math::hcm::{Vec2, Vec3};

/// Pixel value of texels that no sample reached: the encoded tangent-space +Z axis.
pub const BACKGROUND: [f32; 4] = [0.5, 0.5, 1.0, 1.0];

/// Running sum of the tangent-space normals written to one texel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Texel {
    pub sum: Vec3,
    pub weight: f32,
}

impl Texel {
    const EMPTY: Texel = Texel {
        sum: Vec3::ZERO,
        weight: 0.0,
    };

    /// The mean of the written normals, remapped from [-1, 1] to [0, 1], with an opaque alpha.
    fn resolve(&self) -> [f32; 4] {
        if self.weight > 0.0 {
            let mean = self.sum / self.weight;
            [encode(mean.x), encode(mean.y), encode(mean.z), 1.0]
        } else {
            BACKGROUND
        }
    }
}

/// Maps a signed unit-range component to the [0, 1] texture encoding.
pub fn encode(c: f32) -> f32 {
    0.5 * c + 0.5
}

/// A `width * height` grid of texel accumulators, row-major, row 0 at the top (v = 1).
pub struct AccumulationBuffer {
    width: usize,
    height: usize,
    texels: Vec<Texel>,
}

impl AccumulationBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            texels: vec![Texel::EMPTY; width * height],
        }
    }

    /// Returns the grid coordinates `(column, row)` of the texel containing `uv`:
    /// `column = floor(u * width)`, `row = floor((1 - v) * height)`.
    ///
    /// Coordinates up to one texel outside the grid (such as `u == 1` exactly, or samples in the
    /// sampler's margin) are clamped to the border. Farther ones give `None`.
    pub fn texel_of(&self, uv: Vec2) -> Option<(usize, usize)> {
        let col = clamp_to_grid((uv.u * self.width as f32).floor(), self.width)?;
        let row = clamp_to_grid(((1.0 - uv.v) * self.height as f32).floor(), self.height)?;
        Some((col, row))
    }

    /// Adds a tangent-space normal to the texel at `(x, y)`.
    pub fn accumulate(&mut self, x: usize, y: usize, normal: Vec3) {
        assert!(x < self.width && y < self.height, "texel ({}, {}) out of grid", x, y);
        let texel = &mut self.texels[y * self.width + x];
        texel.sum += normal;
        texel.weight += 1.0;
    }

    pub fn texel(&self, x: usize, y: usize) -> Texel {
        self.texels[y * self.width + x]
    }

    /// Number of texels with at least one sample.
    pub fn covered_count(&self) -> usize {
        self.texels.iter().filter(|t| t.weight > 0.0).count()
    }

    /// Adds every texel of `other` into `self`. Both buffers must have the same dimensions.
    pub fn merge(&mut self, other: &AccumulationBuffer) {
        assert_eq!((self.width, self.height), (other.width, other.height));
        for (texel, other) in self.texels.iter_mut().zip(other.texels.iter()) {
            texel.sum += other.sum;
            texel.weight += other.weight;
        }
    }

    /// Converts the accumulated sums into the final pixels. Consumes the buffer: nothing can be
    /// written to it afterwards.
    pub fn resolve(self) -> Raster {
        Raster {
            width: self.width,
            height: self.height,
            pixels: self.texels.iter().map(Texel::resolve).collect(),
        }
    }
}

fn clamp_to_grid(coord: f32, size: usize) -> Option<usize> {
    // Also rejects NaN.
    if size == 0 || !(coord >= -1.0 && coord <= size as f32) {
        return None;
    }
    Some((coord.max(0.0) as usize).min(size - 1))
}

/// Baked RGBA image, row-major, row 0 at the top.
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<[f32; 4]>,
}

impl Raster {
    pub fn get(&self, x: usize, y: usize) -> [f32; 4] {
        self.pixels[y * self.width + x]
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use math::hcm::vec2;

    #[test]
    fn texel_mapping_flips_v() {
        let buffer = AccumulationBuffer::new(4, 2);
        assert_eq!(buffer.texel_of(vec2(0.0, 1.0)), Some((0, 0)));
        assert_eq!(buffer.texel_of(vec2(0.3, 0.2)), Some((1, 1)));
        assert_eq!(buffer.texel_of(vec2(0.99, 0.51)), Some((3, 0)));
    }

    #[test]
    fn texel_mapping_clamps_near_border() {
        let buffer = AccumulationBuffer::new(4, 2);
        assert_eq!(buffer.texel_of(vec2(1.0, 0.0)), Some((3, 1)));
        assert_eq!(buffer.texel_of(vec2(-0.01, 1.01)), Some((0, 0)));
        assert_eq!(buffer.texel_of(vec2(1.3, 0.5)), None);
        assert_eq!(buffer.texel_of(vec2(0.5, -2.0)), None);
        assert_eq!(buffer.texel_of(vec2(f32::NAN, 0.5)), None);
    }

    #[test]
    fn empty_buffer_resolves_to_background() {
        let raster = AccumulationBuffer::new(3, 3).resolve();
        assert!(raster.pixels.iter().all(|&p| p == BACKGROUND));
    }
}
