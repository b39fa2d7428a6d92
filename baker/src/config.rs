use crate::sampler::{grid_size, MAX_GRID_SIZE};

/// Errors that prevent a bake from starting.
#[derive(Debug, thiserror::Error)]
pub enum BakeError {
    #[error("invalid bake configuration: {0}")]
    InvalidConfig(String),
    #[error("the low-poly mesh has no texture coordinates")]
    MissingUvs,
}

/// Bake-time parameters.
///
/// `width`, `height` and `sampling_step` have no defaults: the sampling density that gives full
/// texel coverage depends on both the output resolution and the size of the triangles in uv space.
#[derive(Debug, Clone, PartialEq)]
pub struct BakeConfig {
    pub width: usize,
    pub height: usize,
    /// Increment of the barycentric sampling grid.
    pub sampling_step: f32,
    /// How far outside a triangle (in barycentric units) samples are still taken.
    pub margin: f32,
    /// Offset in u used to find the tangent direction. Must be positive: a negative offset
    /// mirrors the tangent and bitangent.
    pub uv_epsilon: f32,
    pub ray_t_min: f32,
    pub ray_t_max: f32,
    pub multi_thread: bool,
}

impl BakeConfig {
    pub fn new(width: usize, height: usize, sampling_step: f32) -> Self {
        Self {
            width,
            height,
            sampling_step,
            margin: 0.01,
            uv_epsilon: 0.01,
            ray_t_min: 0.0,
            ray_t_max: 100.0,
            multi_thread: true,
        }
    }

    pub fn with_margin(self, margin: f32) -> Self {
        Self { margin, ..self }
    }
    pub fn with_uv_epsilon(self, uv_epsilon: f32) -> Self {
        Self { uv_epsilon, ..self }
    }
    pub fn with_ray_extent(self, ray_t_min: f32, ray_t_max: f32) -> Self {
        Self {
            ray_t_min,
            ray_t_max,
            ..self
        }
    }
    pub fn with_multi_thread(self, multi_thread: bool) -> Self {
        Self {
            multi_thread,
            ..self
        }
    }

    pub fn validate(&self) -> Result<(), BakeError> {
        let invalid = |reason: String| Err(BakeError::InvalidConfig(reason));
        if self.width == 0 || self.height == 0 {
            return invalid(format!("empty output size {}x{}", self.width, self.height));
        }
        if !(self.margin >= 0.0 && self.margin.is_finite()) {
            return invalid(format!("margin {} is negative", self.margin));
        }
        if !(self.sampling_step > 0.0 && self.sampling_step.is_finite()) {
            return invalid(format!("sampling step {} is not positive", self.sampling_step));
        }
        if grid_size(self.sampling_step, self.margin) == 0 {
            return invalid(format!(
                "sampling step {} needs more than {} grid values per axis",
                self.sampling_step, MAX_GRID_SIZE
            ));
        }
        if !(self.uv_epsilon > 0.0 && self.uv_epsilon.is_finite()) {
            return invalid(format!("uv epsilon {} is not positive", self.uv_epsilon));
        }
        if !(self.ray_t_min < self.ray_t_max) {
            return invalid(format!(
                "empty ray extent [{}, {})",
                self.ray_t_min, self.ray_t_max
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = BakeConfig::new(512, 256, 0.01);
        assert!(config.validate().is_ok());
        assert_eq!(config.ray_t_max, 100.0);
        assert!(config.multi_thread);
    }

    #[test]
    fn rejects_bad_values() {
        let bad = vec![
            BakeConfig::new(0, 256, 0.01),
            BakeConfig::new(16, 16, 0.0),
            BakeConfig::new(16, 16, -0.1),
            BakeConfig::new(16, 16, f32::NAN),
            BakeConfig::new(16, 16, 1e-30),
            BakeConfig::new(16, 16, 1e-7),
            BakeConfig::new(16, 16, 0.01).with_margin(-0.5),
            BakeConfig::new(16, 16, 0.01).with_uv_epsilon(0.0),
            BakeConfig::new(16, 16, 0.01).with_uv_epsilon(-0.01),
            BakeConfig::new(16, 16, 0.01).with_ray_extent(1.0, 1.0),
        ];
        for config in bad.iter() {
            assert!(
                matches!(config.validate(), Err(BakeError::InvalidConfig(_))),
                "{:?}",
                config
            );
        }
    }
}
