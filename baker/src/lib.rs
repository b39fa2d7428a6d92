/// Accumulation of tangent-space normals into a texel grid, and the resolve pass producing the
/// final RGBA raster.
pub mod accumulate;
mod bake;
/// The double-sided ray-cast policy matching a low-poly sample with the high-poly surface.
pub mod cast;
mod config;
/// Tangent frames at sample points of a uv-mapped triangle.
pub mod frame;
/// Barycentric sampling grid over a triangle.
pub mod sampler;

pub use accumulate::{AccumulationBuffer, Raster};
pub use bake::{bake, bake_with_progress, BakeStats};
pub use config::{BakeConfig, BakeError};
